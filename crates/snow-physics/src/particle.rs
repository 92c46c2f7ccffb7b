//! Particle types for the snowfall simulation

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque particle identity, unique for the lifetime of a simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flake-{}", self.0)
    }
}

/// Flake outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Filled disc
    #[default]
    #[serde(alias = "circle")]
    Round,
    /// Five-point star
    Star,
    /// Plus-shaped cross
    Cross,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Round, Shape::Star, Shape::Cross];
}

/// One falling snow element
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    /// Position in surface space (logical pixels)
    pub position: Vec2,
    /// Radius-equivalent size
    pub size: f32,
    /// Fall speed (pixels per normalized frame)
    pub speed: f32,
    /// Horizontal drift (pixels per normalized frame)
    pub wind: f32,
    /// Opacity in [0, 1]
    pub opacity: f32,
    /// Rotation in radians
    pub rotation: f32,
    /// Rotation speed (radians per normalized frame)
    pub rotation_speed: f32,
    pub shape: Shape,
}

impl Particle {
    /// A particle at rest at `position` with unit size and full opacity
    pub fn new(id: ParticleId, position: Vec2) -> Self {
        Self {
            id,
            position,
            size: 1.0,
            speed: 0.0,
            wind: 0.0,
            opacity: 1.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            shape: Shape::Round,
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_id() {
        assert_eq!(ParticleId(42).to_string(), "flake-42");
    }

    #[test]
    fn test_new_particle_is_at_rest() {
        let p = Particle::new(ParticleId(1), Vec2::new(3.0, 4.0));
        assert_eq!(p.x(), 3.0);
        assert_eq!(p.y(), 4.0);
        assert_eq!(p.speed, 0.0);
        assert_eq!(p.shape, Shape::Round);
    }
}
