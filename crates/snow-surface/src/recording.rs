use crate::color::Color;
use crate::primitives::{Point, Rect};
use crate::surface::{Canvas, DrawSurface, Viewport};

/// One recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize(Viewport),
    ClearRect(Rect),
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    SetFill(Color),
    FillCircle { center: Point, radius: f32 },
    FillPolygon(Vec<Point>),
    FillRect(Rect),
}

impl DrawCommand {
    pub fn is_fill(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillCircle { .. } | DrawCommand::FillPolygon(_) | DrawCommand::FillRect(_)
        )
    }
}

/// A [`DrawSurface`] that only records what was asked of it
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    pixel_size: [u32; 2],
    circle_segments: Option<u32>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn fill_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_fill()).count()
    }

    /// Last circle quality requested, if any
    pub fn circle_segments(&self) -> Option<u32> {
        self.circle_segments
    }
}

impl DrawSurface for RecordingSurface {
    fn pixel_size(&self) -> [u32; 2] {
        self.pixel_size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.pixel_size = viewport.physical_size();
        self.commands.push(DrawCommand::Resize(viewport));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClearRect(rect));
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetFill(color));
    }

    fn fill_circle(&mut self, center: Point, radius: f32) {
        self.commands.push(DrawCommand::FillCircle { center, radius });
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        self.commands.push(DrawCommand::FillPolygon(points.to_vec()));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::FillRect(rect));
    }

    fn set_circle_segments(&mut self, segments: u32) {
        self.circle_segments = Some(segments);
    }
}

/// Canvas whose context is a [`RecordingSurface`]; `available: false` simulates
/// a host without 2D context support.
#[derive(Clone, Copy, Debug)]
pub struct RecordingCanvas {
    pub available: bool,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self { available: true }
    }
}

impl Canvas for RecordingCanvas {
    type Context = RecordingSurface;

    fn context_2d(&mut self) -> Option<RecordingSurface> {
        self.available.then(RecordingSurface::new)
    }
}
