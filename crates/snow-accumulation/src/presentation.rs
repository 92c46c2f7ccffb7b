//! Drawing stuck particles on top of their regions

use crate::stuck::StuckParticle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snow_physics::Millis;
use snow_surface::{snow, Color, DrawSurface, Point};
use std::collections::HashMap;

/// Opacity of a stuck particle at `now`: fully opaque until its fade starts,
/// then linear down to zero over `fade_duration`.
pub fn fade_opacity(stuck: &StuckParticle, now: Millis, fade_duration: Millis) -> f32 {
    let progress = stuck.fade_progress(now, fade_duration);
    (1.0 - progress).clamp(0.0, 1.0) as f32
}

/// Piles stuck particles into columns instead of drawing them where they hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PileLayout {
    /// Column width in pixels
    pub bucket_width: f32,
    /// Levels per column; later particles share the top level
    pub max_levels: usize,
    /// Vertical distance between levels as a multiple of the particle size
    pub level_spacing: f32,
    /// Horizontal jitter as a multiple of the particle size (at least one pixel)
    pub jitter: f32,
}

impl Default for PileLayout {
    fn default() -> Self {
        Self {
            bucket_width: 16.0,
            max_levels: 6,
            level_spacing: 1.4,
            jitter: 0.4,
        }
    }
}

impl PileLayout {
    /// Region-local draw positions, one per input particle in input order.
    ///
    /// Levels are assigned oldest first. Jitter is drawn from an RNG seeded with
    /// the particle id so a particle keeps its position across frames.
    pub fn positions(&self, particles: &[StuckParticle]) -> Vec<Point> {
        let mut order: Vec<usize> = (0..particles.len()).collect();
        order.sort_by_key(|&i| particles[i].stuck_time);

        let mut levels: HashMap<i64, usize> = HashMap::new();
        let mut positions = vec![Point::ZERO; particles.len()];

        for i in order {
            let p = &particles[i].particle;
            let bucket = (p.x() / self.bucket_width.max(1.0)).floor() as i64;
            let count = levels.entry(bucket).or_insert(0);
            let level = (*count).min(self.max_levels.saturating_sub(1));
            *count += 1;

            let mut rng = StdRng::seed_from_u64(p.id.0);
            let offset = rng.random_range(-1i32..=1) as f32;

            positions[i] = Point::new(
                p.x() + offset * p.size.max(1.0) * self.jitter,
                p.size + level as f32 * p.size * self.level_spacing,
            );
        }

        positions
    }
}

/// Custom per-particle drawing: `(surface, particle, position in surface space, now)`
pub type PaintOverride = Box<dyn Fn(&mut dyn DrawSurface, &StuckParticle, Point, Millis)>;

/// Draws one region's stuck particles
pub struct AccumulationPainter {
    color: Color,
    fade_duration: Millis,
    layout: Option<PileLayout>,
    paint_override: Option<PaintOverride>,
}

impl Default for AccumulationPainter {
    fn default() -> Self {
        Self::new(snow::WHITE, 2000)
    }
}

impl AccumulationPainter {
    pub fn new(color: Color, fade_duration: Millis) -> Self {
        Self {
            color,
            fade_duration,
            layout: None,
            paint_override: None,
        }
    }

    pub fn with_pile_layout(mut self, layout: PileLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Replace the default disc with custom drawing
    pub fn with_override(
        mut self,
        paint: impl Fn(&mut dyn DrawSurface, &StuckParticle, Point, Millis) + 'static,
    ) -> Self {
        self.paint_override = Some(Box::new(paint));
        self
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_fade_duration(&mut self, fade_duration: Millis) {
        self.fade_duration = fade_duration;
    }

    /// Draw `particles` relative to the region's top-left corner `origin`
    pub fn paint(
        &self,
        surface: &mut dyn DrawSurface,
        origin: Point,
        particles: &[StuckParticle],
        now: Millis,
    ) {
        if particles.is_empty() {
            return;
        }

        let local: Vec<Point> = match &self.layout {
            Some(layout) => layout.positions(particles),
            None => particles.iter().map(|s| s.particle.position.into()).collect(),
        };

        for (stuck, at) in particles.iter().zip(local) {
            let at = Point::new(origin.x + at.x, origin.y + at.y);

            if let Some(paint) = &self.paint_override {
                paint(surface, stuck, at, now);
                continue;
            }

            let opacity = fade_opacity(stuck, now, self.fade_duration);
            if opacity <= 0.0 {
                continue;
            }

            surface.save();
            surface.translate(at.x, at.y);
            surface.rotate(stuck.particle.rotation);
            surface.set_fill_color(self.color.with_alpha(opacity));
            surface.fill_circle(Point::ZERO, stuck.particle.size);
            surface.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use snow_physics::{Particle, ParticleId};
    use snow_surface::{DrawCommand, RecordingSurface};
    use std::cell::Cell;
    use std::rc::Rc;

    fn stuck(id: u64, x: f32, stuck_time: Millis) -> StuckParticle {
        let mut particle = Particle::new(ParticleId(id), Vec2::new(x, 5.0));
        particle.size = 2.0;
        StuckParticle::new(particle, "card", stuck_time, 1000)
    }

    #[test]
    fn test_fade_opacity_curve() {
        let s = stuck(1, 0.0, 0);
        assert_eq!(fade_opacity(&s, 500, 2000), 1.0);
        assert_eq!(fade_opacity(&s, 1000, 2000), 1.0);
        assert!((fade_opacity(&s, 2000, 2000) - 0.5).abs() < 1e-6);
        assert_eq!(fade_opacity(&s, 5000, 2000), 0.0);
    }

    #[test]
    fn test_pile_stacks_oldest_first() {
        let layout = PileLayout::default();
        let flakes = [stuck(1, 4.0, 20), stuck(2, 5.0, 10), stuck(3, 40.0, 30)];
        let pos = layout.positions(&flakes);

        // Same bucket: the older flake sits on level 0
        assert_eq!(pos[1].y, 2.0);
        assert!((pos[0].y - (2.0 + 2.0 * 1.4)).abs() < 1e-5);
        assert_eq!(pos[2].y, 2.0);

        for (p, s) in pos.iter().zip(&flakes) {
            assert!((p.x - s.particle.x()).abs() <= 0.8 + 1e-5);
        }
    }

    #[test]
    fn test_pile_caps_levels() {
        let layout = PileLayout::default();
        let flakes: Vec<_> = (0..10).map(|i| stuck(i, 1.0, i)).collect();
        let top = 2.0 + 5.0 * 2.0 * 1.4;
        let pos = layout.positions(&flakes);
        assert!((pos[9].y - top).abs() < 1e-4);
        assert!((pos[6].y - top).abs() < 1e-4);
    }

    #[test]
    fn test_pile_jitter_is_stable() {
        let layout = PileLayout::default();
        let flakes = [stuck(7, 30.0, 0)];
        assert_eq!(layout.positions(&flakes), layout.positions(&flakes));
    }

    #[test]
    fn test_default_paint_offsets_by_origin() {
        let painter = AccumulationPainter::new(snow::WHITE, 2000);
        let mut surface = RecordingSurface::new();
        painter.paint(&mut surface, Point::new(100.0, 50.0), &[stuck(1, 10.0, 0)], 0);

        let cmds = surface.commands();
        assert!(cmds.contains(&DrawCommand::Translate(110.0, 55.0)));
        assert!(cmds.contains(&DrawCommand::FillCircle {
            center: Point::ZERO,
            radius: 2.0
        }));
    }

    #[test]
    fn test_fully_faded_particles_are_skipped() {
        let painter = AccumulationPainter::new(snow::WHITE, 2000);
        let mut surface = RecordingSurface::new();
        painter.paint(&mut surface, Point::ZERO, &[stuck(1, 10.0, 0)], 10_000);
        assert_eq!(surface.fill_count(), 0);
    }

    #[test]
    fn test_override_replaces_default() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let painter = AccumulationPainter::default().with_override(move |surface, _, at, _| {
            seen.set(seen.get() + 1);
            surface.fill_rect(snow_surface::Rect::from_min_size([at.x, at.y], [1.0, 1.0]));
        });

        let mut surface = RecordingSurface::new();
        painter.paint(&mut surface, Point::ZERO, &[stuck(1, 0.0, 0), stuck(2, 1.0, 0)], 0);
        assert_eq!(calls.get(), 2);
        assert!(surface
            .commands()
            .iter()
            .all(|c| matches!(c, DrawCommand::FillRect(_))));
    }
}
