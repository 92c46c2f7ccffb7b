//! Flake outlines and the per-particle draw routine

use snow_physics::{Particle, Shape, CROSS_ARM_RATIO, STAR_INNER_RATIO, STAR_SPIKES};
use snow_surface::{Color, DrawSurface, Point, Rect};
use std::f32::consts::PI;

/// Star outline centered on the origin, alternating outer and inner points
pub fn star_outline(size: f32) -> [Point; STAR_SPIKES * 2] {
    let mut points = [Point::ZERO; STAR_SPIKES * 2];
    for (i, point) in points.iter_mut().enumerate() {
        let radius = if i % 2 == 0 {
            size
        } else {
            size * STAR_INNER_RATIO
        };
        let angle = PI * i as f32 / STAR_SPIKES as f32;
        *point = Point::new(angle.cos() * radius, angle.sin() * radius);
    }
    points
}

/// Horizontal and vertical bars of a cross, centered on the origin
pub fn cross_arms(size: f32) -> [Rect; 2] {
    let thin = size * CROSS_ARM_RATIO;
    let offset = size / 3.0;
    [
        Rect::from_min_size([-size, -offset], [size * 2.0, thin]),
        Rect::from_min_size([-offset, -size], [thin, size * 2.0]),
    ]
}

/// Draw one flake with `color`, replacing its alpha with the particle's opacity.
///
/// Leaves the surface transform as it found it.
pub fn draw_particle<S: DrawSurface + ?Sized>(surface: &mut S, particle: &Particle, color: Color) {
    surface.save();
    surface.translate(particle.x(), particle.y());
    surface.rotate(particle.rotation);
    surface.set_fill_color(color.with_alpha(particle.opacity));

    match particle.shape {
        Shape::Round => surface.fill_circle(Point::ZERO, particle.size),
        Shape::Star => surface.fill_polygon(&star_outline(particle.size)),
        Shape::Cross => {
            for arm in cross_arms(particle.size) {
                surface.fill_rect(arm);
            }
        }
    }

    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use snow_physics::ParticleId;
    use snow_surface::{snow, DrawCommand, RecordingSurface};

    #[test]
    fn test_star_alternates_radii() {
        let star = star_outline(4.0);
        assert_eq!(star.len(), 10);
        assert!((star[0].x - 4.0).abs() < 1e-5);
        let inner = Vec2::from(star[1]).length();
        assert!((inner - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_cross_arms_are_centered_bars() {
        let [h, v] = cross_arms(3.0);
        assert_eq!(h.left(), -3.0);
        assert_eq!(h.width(), 6.0);
        assert_eq!(v.top(), -3.0);
        assert_eq!(v.height(), 6.0);
        assert!((h.height() - 1.98).abs() < 1e-5);
    }

    #[test]
    fn test_draw_wraps_in_save_restore() {
        let mut surface = RecordingSurface::new();
        let mut p = Particle::new(ParticleId(1), Vec2::new(5.0, 6.0));
        p.opacity = 0.5;
        p.shape = Shape::Cross;

        draw_particle(&mut surface, &p, snow::WHITE);

        let cmds = surface.commands();
        assert_eq!(cmds.first(), Some(&DrawCommand::Save));
        assert_eq!(cmds.last(), Some(&DrawCommand::Restore));
        assert_eq!(cmds[1], DrawCommand::Translate(5.0, 6.0));
        assert_eq!(cmds[3], DrawCommand::SetFill(snow::WHITE.with_alpha(0.5)));
        assert_eq!(surface.fill_count(), 2);
    }
}
