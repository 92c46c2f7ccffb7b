//! The 2D drawing contract the snowfall engine renders through
//!
//! This mirrors the subset of a canvas 2D context the effect needs: clearing,
//! a save/restore transform stack, translate/rotate, and three fill
//! primitives (circle, polygon, rectangle). Coordinates passed to the fill
//! calls are in the current user space; the base transform maps logical
//! pixels to physical pixels.

use crate::color::Color;
use crate::primitives::{Point, Rect};

/// Logical viewport size plus the display's device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Backing store size: `logical size × device pixel ratio`
    pub fn physical_size(&self) -> [u32; 2] {
        [
            (self.width * self.scale_factor).max(0.0) as u32,
            (self.height * self.scale_factor).max(0.0) as u32,
        ]
    }

    /// Logical bounds as a rectangle anchored at the origin
    pub fn rect(&self) -> Rect {
        Rect::from_min_size([0.0, 0.0], [self.width, self.height])
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// A raster 2D drawing context
pub trait DrawSurface {
    /// Backing store size in physical pixels
    fn pixel_size(&self) -> [u32; 2];

    /// Resize the backing store to `viewport × scale_factor` and reset the base
    /// transform to `scale(scale_factor)`. The transform is set, never accumulated.
    fn resize(&mut self, viewport: Viewport);

    /// Clear `rect` (in user space) to transparent
    fn clear_rect(&mut self, rect: Rect);

    /// Push the current transform and fill color
    fn save(&mut self);

    /// Pop the last saved transform and fill color; no-op on an empty stack
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);

    fn rotate(&mut self, radians: f32);

    fn set_fill_color(&mut self, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f32);

    /// Fill a closed polygon. Implementations may assume the outline is
    /// star-shaped around its centroid.
    fn fill_polygon(&mut self, points: &[Point]);

    fn fill_rect(&mut self, rect: Rect);

    /// How finely circles are approximated; surfaces with exact curves ignore it
    fn set_circle_segments(&mut self, _segments: u32) {}
}

/// Something that can hand out a 2D drawing context, like a canvas element.
///
/// Returning `None` means no context is available, which is a fatal
/// construction error for the engine.
pub trait Canvas {
    type Context: DrawSurface;

    fn context_2d(&mut self) -> Option<Self::Context>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size_scales() {
        let vp = Viewport::new(800.0, 600.0, 2.0);
        assert_eq!(vp.physical_size(), [1600, 1200]);
        assert_eq!(vp.rect().right(), 800.0);
    }
}
