use crate::color::Color;
use crate::mesh::Mesh;
use crate::primitives::{Point, Rect};
use crate::surface::{Canvas, DrawSurface, Viewport};
use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

/// Default number of segments used to approximate a circle
pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 16;

/// Saved drawing state
#[derive(Clone, Copy, Debug)]
struct State {
    transform: Affine2,
    fill: Color,
}

/// A [`DrawSurface`] that tessellates every fill into a triangle mesh.
///
/// Vertices are emitted in physical pixels. `clear_rect` can only drop the
/// whole mesh: a clear that covers the full backing store empties it, smaller
/// clears are ignored since retained triangles cannot be partially erased.
pub struct MeshSurface {
    mesh: Mesh,
    state: State,
    stack: Vec<State>,
    base: Affine2,
    pixel_size: [u32; 2],
    circle_segments: u32,
}

impl MeshSurface {
    pub fn new() -> Self {
        Self::with_circle_segments(DEFAULT_CIRCLE_SEGMENTS)
    }

    pub fn with_circle_segments(circle_segments: u32) -> Self {
        Self {
            mesh: Mesh::new(),
            state: State {
                transform: Affine2::IDENTITY,
                fill: Color::transparent(),
            },
            stack: Vec::new(),
            base: Affine2::IDENTITY,
            pixel_size: [0, 0],
            circle_segments: circle_segments.max(3),
        }
    }

    pub fn circle_segments(&self) -> u32 {
        self.circle_segments
    }

    /// Tessellated output since the last full clear
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    fn map(&self, p: Vec2) -> [f32; 2] {
        self.state.transform.transform_point2(p).to_array()
    }

    fn covers_backing_store(&self, rect: Rect) -> bool {
        let a = self.state.transform.transform_point2(Vec2::new(rect.left(), rect.top()));
        let b = self
            .state
            .transform
            .transform_point2(Vec2::new(rect.right(), rect.bottom()));
        let (min, max) = (a.min(b), a.max(b));
        min.x <= 0.0
            && min.y <= 0.0
            && max.x >= self.pixel_size[0] as f32
            && max.y >= self.pixel_size[1] as f32
    }
}

impl Default for MeshSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for MeshSurface {
    fn pixel_size(&self) -> [u32; 2] {
        self.pixel_size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.pixel_size = viewport.physical_size();
        self.base = Affine2::from_scale(Vec2::splat(viewport.scale_factor));
        self.state.transform = self.base;
        self.stack.clear();
        self.mesh.clear();
    }

    fn clear_rect(&mut self, rect: Rect) {
        if self.covers_backing_store(rect) {
            self.mesh.clear();
        } else {
            log::trace!("MeshSurface ignores partial clear {:?}", rect);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn fill_circle(&mut self, center: Point, radius: f32) {
        if radius <= 0.0 || self.state.fill.a <= 0.0 {
            return;
        }

        let c = Vec2::from(center);
        let segments = self.circle_segments;
        let ring: Vec<[f32; 2]> = (0..segments)
            .map(|i| {
                let angle = i as f32 / segments as f32 * TAU;
                self.map(c + Vec2::new(angle.cos(), angle.sin()) * radius)
            })
            .collect();

        let center = self.map(c);
        self.mesh.push_fan(center, &ring, self.state.fill);
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        if points.len() < 3 || self.state.fill.a <= 0.0 {
            return;
        }

        let centroid = points
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + Vec2::from(*p))
            / points.len() as f32;
        let ring: Vec<[f32; 2]> = points.iter().map(|p| self.map(Vec2::from(*p))).collect();

        let center = self.map(centroid);
        self.mesh.push_fan(center, &ring, self.state.fill);
    }

    fn fill_rect(&mut self, rect: Rect) {
        if self.state.fill.a <= 0.0 {
            return;
        }

        let ring = [
            self.map(Vec2::new(rect.right(), rect.top())),
            self.map(Vec2::new(rect.right(), rect.bottom())),
            self.map(Vec2::new(rect.left(), rect.bottom())),
            self.map(Vec2::new(rect.left(), rect.top())),
        ];
        let center = self.map(Vec2::new(
            (rect.left() + rect.right()) * 0.5,
            (rect.top() + rect.bottom()) * 0.5,
        ));
        self.mesh.push_fan(center, &ring, self.state.fill);
    }

    fn set_circle_segments(&mut self, segments: u32) {
        self.circle_segments = segments.max(3);
    }
}

/// Hands out [`MeshSurface`] contexts with a fixed circle quality
#[derive(Clone, Copy, Debug)]
pub struct MeshCanvas {
    pub circle_segments: u32,
}

impl Default for MeshCanvas {
    fn default() -> Self {
        Self {
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }
}

impl Canvas for MeshCanvas {
    type Context = MeshSurface;

    fn context_2d(&mut self) -> Option<MeshSurface> {
        Some(MeshSurface::with_circle_segments(self.circle_segments))
    }
}
