//! Per-frame motion step
//!
//! Motion is normalized to a 16ms baseline so `speed`, `wind` and
//! `rotation_speed` keep the same visual rate at any frame rate.

use glam::Vec2;

use crate::constants::{FRAME_BASELINE_MS, RESPAWN_Y};
use crate::particle::Particle;

/// What happened to a particle during a motion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved within the surface (possibly wrapped horizontally)
    Moved,
    /// Fell past the bottom edge and was put back above the top
    Respawned,
}

/// Convert an elapsed time into normalized frames
#[inline]
pub fn frame_scale(delta_ms: f32) -> f32 {
    delta_ms / FRAME_BASELINE_MS
}

/// Advance one particle by `delta_ms`.
///
/// `bounds` is the surface size. A particle whose new `y` exceeds the height is
/// moved to `y = RESPAWN_Y` at `x = respawn_x()`, which must return a value in
/// `[0, width)`. Horizontal overflow snaps to the opposite edge.
pub fn step(
    particle: &mut Particle,
    delta_ms: f32,
    bounds: Vec2,
    respawn_x: impl FnOnce() -> f32,
) -> StepOutcome {
    let scale = frame_scale(delta_ms);

    particle.position.y += particle.speed * scale;
    particle.position.x += particle.wind * scale;
    particle.rotation += particle.rotation_speed * scale;

    let mut outcome = StepOutcome::Moved;
    if particle.position.y > bounds.y {
        particle.position.y = RESPAWN_Y;
        particle.position.x = respawn_x();
        outcome = StepOutcome::Respawned;
    }

    wrap_horizontal(particle, bounds.x);
    outcome
}

/// Snap a particle that left the surface sideways to the opposite edge
#[inline]
pub fn wrap_horizontal(particle: &mut Particle, width: f32) {
    if particle.position.x > width {
        particle.position.x = 0.0;
    }
    if particle.position.x < 0.0 {
        particle.position.x = width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleId;
    use proptest::prelude::*;

    fn flake(x: f32, y: f32, speed: f32, wind: f32) -> Particle {
        let mut p = Particle::new(ParticleId(0), Vec2::new(x, y));
        p.speed = speed;
        p.wind = wind;
        p
    }

    #[test]
    fn test_motion_is_normalized_to_16ms() {
        let mut p = flake(10.0, 10.0, 2.0, 1.0);
        p.rotation_speed = 0.01;
        step(&mut p, 32.0, Vec2::new(100.0, 100.0), || 0.0);
        assert_eq!(p.position, Vec2::new(12.0, 14.0));
        assert!((p.rotation - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_respawn_below_bottom() {
        let mut p = flake(50.0, 99.0, 2.0, 0.0);
        let outcome = step(&mut p, 16.0, Vec2::new(100.0, 100.0), || 33.0);
        assert_eq!(outcome, StepOutcome::Respawned);
        assert_eq!(p.position, Vec2::new(33.0, RESPAWN_Y));
    }

    #[test]
    fn test_particle_on_bottom_edge_stays() {
        let mut p = flake(50.0, 98.0, 2.0, 0.0);
        let outcome = step(&mut p, 16.0, Vec2::new(100.0, 100.0), || 33.0);
        assert_eq!(outcome, StepOutcome::Moved);
        assert_eq!(p.position.y, 100.0);
    }

    #[test]
    fn test_wrap_right_edge_to_zero() {
        let mut p = flake(99.5, 10.0, 0.0, 1.0);
        step(&mut p, 16.0, Vec2::new(100.0, 100.0), || 0.0);
        assert_eq!(p.position.x, 0.0);
    }

    #[test]
    fn test_wrap_left_edge_to_width() {
        let mut p = flake(0.5, 10.0, 0.0, -1.0);
        step(&mut p, 16.0, Vec2::new(100.0, 100.0), || 0.0);
        assert_eq!(p.position.x, 100.0);
    }

    proptest! {
        #[test]
        fn prop_vertical_position_stays_in_range(
            x in 0.0f32..800.0,
            y in -10.0f32..600.0,
            speed in 0.5f32..2.0,
            wind in -2.0f32..2.0,
            delta in 0.0f32..64.0,
            respawn in 0.0f32..800.0,
        ) {
            let bounds = Vec2::new(800.0, 600.0);
            let mut p = flake(x, y, speed, wind);
            let before = p.position.y + speed * frame_scale(delta);
            let outcome = step(&mut p, delta, bounds, || respawn);

            prop_assert!(p.position.y >= RESPAWN_Y && p.position.y <= bounds.y);
            if before > bounds.y {
                prop_assert_eq!(outcome, StepOutcome::Respawned);
                prop_assert_eq!(p.position.y, RESPAWN_Y);
            }
            prop_assert!(p.position.x >= 0.0 && p.position.x <= bounds.x);
        }
    }
}
