use glam::Vec2;

/// A point in 2D space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Axis-aligned rectangle defined by min (top-left) and max (bottom-right) corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Rect {
    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: [f32; 2], size: [f32; 2]) -> Self {
        Self {
            min,
            max: [min[0] + size[0], min[1] + size[1]],
        }
    }

    /// Build from edge coordinates, the way a client bounding box reports them
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            min: [left, top],
            max: [right, bottom],
        }
    }

    pub fn left(&self) -> f32 {
        self.min[0]
    }

    pub fn top(&self) -> f32 {
        self.min[1]
    }

    pub fn right(&self) -> f32 {
        self.max[0]
    }

    pub fn bottom(&self) -> f32 {
        self.max[1]
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    pub fn origin(&self) -> Point {
        Point::new(self.min[0], self.min[1])
    }

    /// Inclusive on every edge
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min[0]
            && point.x <= self.max[0]
            && point.y >= self.min[1]
            && point.y <= self.max[1]
    }

    /// Nearest point inside the rectangle
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.min(self.max[0]).max(self.min[0]),
            y: point.y.min(self.max[1]).max(self.min[1]),
        }
    }

    /// The same rectangle with its height cut to `fraction` of the original, anchored at the top
    pub fn top_band(&self, fraction: f32) -> Rect {
        Rect {
            min: self.min,
            max: [self.max[0], self.min[1] + self.height() * fraction],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let r = Rect::from_ltrb(0.0, 0.0, 100.0, 50.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(100.0, 50.0)));
        assert!(!r.contains(Point::new(100.1, 10.0)));
        assert!(!r.contains(Point::new(10.0, -0.1)));
    }

    #[test]
    fn test_clamp() {
        let r = Rect::from_min_size([10.0, 20.0], [30.0, 40.0]);
        assert_eq!(r.clamp(Point::new(0.0, 100.0)), Point::new(10.0, 60.0));
        assert_eq!(r.clamp(Point::new(15.0, 25.0)), Point::new(15.0, 25.0));
    }

    #[test]
    fn test_top_band() {
        let r = Rect::from_ltrb(0.0, 100.0, 50.0, 200.0);
        let band = r.top_band(0.3);
        assert_eq!(band.top(), 100.0);
        assert!((band.bottom() - 130.0).abs() < 1e-4);
        assert_eq!(band.width(), 50.0);
    }
}
