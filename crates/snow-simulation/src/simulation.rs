//! CPU snowfall simulation
//!
//! [`Simulator`] owns the falling particles and the drawing context they are
//! rendered into. Motion and drawing are split ([`Simulator::advance`],
//! [`Simulator::render`], [`Simulator::maybe_spawn`]) so a driver can run
//! collision checks between the motion update and the redraw; [`Simulator::tick`]
//! runs all three back to back.

use crate::error::SimulationError;
use crate::params::{SnowConfig, SnowConfigPatch};
use crate::render::draw_particle;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snow_physics::{
    motion, Millis, Particle, ParticleId, Shape, FALL_SPEED_SPREAD, INITIAL_FILL_RATIO,
    MIN_FALL_SPEED, MIN_OPACITY, OPACITY_SPREAD, RESPAWN_Y, ROTATION_SPEED_SPREAD, SPAWN_CHANCE,
};
use snow_surface::{snow, Canvas, Color, DrawSurface, Viewport};

/// Explicit values for a new particle; `None` fields are randomized
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSeed {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub size: Option<f32>,
    pub speed: Option<f32>,
    pub wind: Option<f32>,
    pub opacity: Option<f32>,
    pub rotation: Option<f32>,
    pub rotation_speed: Option<f32>,
    pub shape: Option<Shape>,
}

impl ParticleSeed {
    /// A seed pinned to `(x, y)`
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn with_motion(mut self, speed: f32, wind: f32) -> Self {
        self.speed = Some(speed);
        self.wind = Some(wind);
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Falling snow particles plus the surface they are drawn on
pub struct Simulator<S: DrawSurface> {
    surface: S,
    config: SnowConfig,
    particles: Vec<Particle>,
    rng: StdRng,
    viewport: Viewport,
    next_id: u64,

    running: bool,
    last_frame: Option<Millis>,
    resize_attached: bool,
}

impl<S: DrawSurface> Simulator<S> {
    /// Acquire a drawing context from `canvas`.
    ///
    /// Fails with [`SimulationError::ContextUnavailable`] when the canvas
    /// has no 2D context to offer.
    pub fn new<C>(canvas: &mut C, config: SnowConfig) -> Result<Self, SimulationError>
    where
        C: Canvas<Context = S>,
    {
        Self::with_seed(canvas, config, rand::random())
    }

    /// Like [`Simulator::new`] with a fixed RNG seed
    pub fn with_seed<C>(canvas: &mut C, config: SnowConfig, seed: u64) -> Result<Self, SimulationError>
    where
        C: Canvas<Context = S>,
    {
        let mut surface = canvas
            .context_2d()
            .ok_or(SimulationError::ContextUnavailable)?;
        surface.set_circle_segments(config.performance.circle_segments());

        Ok(Self {
            surface,
            config,
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            viewport: Viewport::default(),
            next_id: 0,
            running: false,
            last_frame: None,
            resize_attached: false,
        })
    }

    /// Size the surface to `viewport` and seed `floor(intensity × 0.3)` particles
    pub fn initialize(&mut self, viewport: Viewport) {
        self.resize_attached = true;
        self.apply_viewport(viewport);

        self.particles.clear();
        let initial = (self.config.intensity as f32 * INITIAL_FILL_RATIO).floor() as usize;
        for _ in 0..initial {
            self.add_particle(ParticleSeed::default());
        }

        log::info!(
            "Simulator initialized: {}x{} @{}x, {} particles",
            viewport.width,
            viewport.height,
            viewport.scale_factor,
            initial
        );
    }

    /// Re-capture surface dimensions; ignored after [`Simulator::destroy`]
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.resize_attached {
            return;
        }
        self.apply_viewport(viewport);
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.surface.resize(viewport);
    }

    pub fn start(&mut self, now: Millis) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_frame = Some(now);
        log::info!("Simulator started");
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.last_frame = None;
        log::info!("Simulator stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time since the previous frame, or `None` while stopped.
    ///
    /// The first frame after [`Simulator::start`] measures from the start time.
    pub fn frame_delta(&mut self, now: Millis) -> Option<f32> {
        if !self.running {
            return None;
        }
        let last = self.last_frame.replace(now).unwrap_or(now);
        Some(now.saturating_sub(last) as f32)
    }

    /// Frame callback: tick by the elapsed time if running
    pub fn frame(&mut self, now: Millis) -> bool {
        match self.frame_delta(now) {
            Some(delta) => {
                self.tick(delta);
                true
            }
            None => false,
        }
    }

    /// Advance, redraw, then maybe spawn one particle
    pub fn tick(&mut self, delta_ms: f32) {
        self.advance(delta_ms);
        self.render();
        self.maybe_spawn();
    }

    /// Move every particle by `delta_ms`, respawning and wrapping as needed
    pub fn advance(&mut self, delta_ms: f32) {
        let bounds = self.bounds();
        let rng = &mut self.rng;
        for particle in &mut self.particles {
            motion::step(particle, delta_ms, bounds, || random_x(rng, bounds.x));
        }
    }

    /// Clear the surface without drawing anything
    pub fn clear(&mut self) {
        self.surface.clear_rect(self.viewport.rect());
    }

    /// Clear the surface and draw every particle
    pub fn render(&mut self) {
        let Self {
            surface,
            particles,
            rng,
            config,
            viewport,
            ..
        } = self;

        surface.clear_rect(viewport.rect());
        for particle in particles.iter() {
            let color = pick_color(rng, &config.palette);
            draw_particle(&mut *surface, particle, color);
        }
    }

    /// With a 30% chance, add one particle while under the intensity cap
    pub fn maybe_spawn(&mut self) -> Option<ParticleId> {
        if self.particles.len() >= self.config.intensity as usize {
            return None;
        }
        if self.rng.random::<f32>() >= SPAWN_CHANCE {
            return None;
        }
        Some(self.add_particle(ParticleSeed::default()))
    }

    /// Add a particle, randomizing every field `seed` leaves empty
    pub fn add_particle(&mut self, seed: ParticleSeed) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;

        let width = self.viewport.width;
        let rng = &mut self.rng;
        let config = &self.config;

        let x = seed.x.unwrap_or_else(|| random_x(rng, width));
        let mut particle = Particle::new(id, Vec2::new(x, seed.y.unwrap_or(RESPAWN_Y)));
        particle.size = seed.size.unwrap_or_else(|| {
            let (min, max) = (config.size.min, config.size.max);
            min + rng.random::<f32>() * (max - min).max(0.0)
        });
        particle.speed = seed
            .speed
            .unwrap_or_else(|| rng.random::<f32>() * FALL_SPEED_SPREAD + MIN_FALL_SPEED);
        particle.opacity = seed
            .opacity
            .unwrap_or_else(|| rng.random::<f32>() * OPACITY_SPREAD + MIN_OPACITY);
        particle.wind = seed
            .wind
            .unwrap_or_else(|| (rng.random::<f32>() - 0.5) * config.wind_strength);
        particle.rotation = seed.rotation.unwrap_or(0.0);
        particle.rotation_speed = seed
            .rotation_speed
            .unwrap_or_else(|| (rng.random::<f32>() - 0.5) * ROTATION_SPEED_SPREAD);
        particle.shape = seed.shape.unwrap_or_else(|| pick_shape(rng, &config.shapes));

        self.particles.push(particle);
        id
    }

    /// Remove a particle from the active set; unknown ids are ignored
    pub fn recycle(&mut self, id: ParticleId) -> bool {
        let before = self.particles.len();
        self.particles.retain(|p| p.id != id);
        self.particles.len() != before
    }

    /// Merge a partial config; in-flight particles keep their values
    pub fn update_config(&mut self, patch: &SnowConfigPatch) {
        self.config.merge(patch);
        self.apply_performance();
    }

    /// Replace the whole config snapshot
    pub fn set_config(&mut self, config: SnowConfig) {
        self.config = config;
        self.apply_performance();
    }

    fn apply_performance(&mut self) {
        self.surface
            .set_circle_segments(self.config.performance.circle_segments());
    }

    /// Stop, detach resize handling and drop every particle
    pub fn destroy(&mut self) {
        self.stop();
        self.resize_attached = false;
        self.particles.clear();
        log::info!("Simulator destroyed");
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Logical surface size the particles move within
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.viewport.width, self.viewport.height)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

fn random_x(rng: &mut StdRng, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    rng.random_range(0.0..width)
}

fn pick_color(rng: &mut StdRng, palette: &[Color]) -> Color {
    if palette.is_empty() {
        return snow::WHITE;
    }
    palette[rng.random_range(0..palette.len())]
}

fn pick_shape(rng: &mut StdRng, shapes: &[Shape]) -> Shape {
    if shapes.is_empty() {
        return Shape::default();
    }
    shapes[rng.random_range(0..shapes.len())]
}
