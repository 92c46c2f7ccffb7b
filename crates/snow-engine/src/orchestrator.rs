//! Per-frame driver for the snowfall effect
//!
//! Two triggers run the engine, both on the caller's thread:
//! - [`Orchestrator::frame`] on every display frame: motion, then collisions,
//!   then redraw
//! - [`Orchestrator::advance_timers`] whenever the host loop wakes up: runs
//!   the fade sweep on a fixed 100ms interval
//!
//! Both are no-ops while the orchestrator is stopped, so a late callback after
//! [`Orchestrator::stop`] cannot touch state.

use crate::error::EngineError;
use crate::timer::IntervalTimer;
use snow_accumulation::{SnowStore, StuckParticle};
use snow_physics::{Millis, Particle};
use snow_regions::RegionTracker;
use snow_simulation::Simulator;
use snow_surface::{Canvas, DrawSurface, Point, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

/// Called once per collision with the region id and the new stuck record
pub type CollisionCallback = Box<dyn FnMut(&str, &StuckParticle)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// What one call to [`Orchestrator::frame`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether particles moved this frame
    pub advanced: bool,
    /// Particles that stuck to a region this frame
    pub collisions: usize,
    /// Falling particles after the frame
    pub particles: usize,
}

pub struct Orchestrator<S: DrawSurface> {
    simulator: Simulator<S>,
    tracker: RegionTracker,
    store: Rc<RefCell<SnowStore>>,
    fade_timer: IntervalTimer,
    on_collision: Option<CollisionCallback>,
    state: LoopState,
    synced_revision: u64,
}

impl<S: DrawSurface> Orchestrator<S> {
    /// Build a simulator on `canvas` configured from `store`
    pub fn new<C>(canvas: &mut C, store: Rc<RefCell<SnowStore>>) -> Result<Self, EngineError>
    where
        C: Canvas<Context = S>,
    {
        let config = store.borrow().config().clone();
        let simulator = Simulator::new(canvas, config)?;
        Ok(Self::with_simulator(simulator, store))
    }

    /// Drive an existing simulator; its config is replaced by the store's
    pub fn with_simulator(mut simulator: Simulator<S>, store: Rc<RefCell<SnowStore>>) -> Self {
        let (config, revision) = {
            let store = store.borrow();
            (store.config().clone(), store.config_revision())
        };
        simulator.set_config(config);

        Self {
            simulator,
            tracker: RegionTracker::new(),
            store,
            fade_timer: IntervalTimer::default(),
            on_collision: None,
            state: LoopState::Stopped,
            synced_revision: revision,
        }
    }

    pub fn set_collision_callback(&mut self, callback: impl FnMut(&str, &StuckParticle) + 'static) {
        self.on_collision = Some(Box::new(callback));
    }

    pub fn clear_collision_callback(&mut self) {
        self.on_collision = None;
    }

    /// Size the surface and seed the initial particles
    pub fn initialize(&mut self, viewport: Viewport) {
        self.simulator.initialize(viewport);
    }

    /// Resize the surface and re-snapshot every region box
    pub fn resize(&mut self, viewport: Viewport) {
        self.simulator.resize(viewport);
        self.tracker.refresh_all();
    }

    pub fn start(&mut self, now: Millis) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.simulator.start(now);
        self.fade_timer.start(now);
        log::info!("Snowfall running");
    }

    /// Cancel the frame loop and the fade timer
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.simulator.stop();
        self.fade_timer.stop();
        log::info!("Snowfall stopped");
    }

    /// Stop and release every falling particle
    pub fn destroy(&mut self) {
        self.stop();
        self.simulator.destroy();
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Run one display frame at `now`
    pub fn frame(&mut self, now: Millis) -> FrameReport {
        if self.state != LoopState::Running {
            return FrameReport::default();
        }
        self.sync_config();

        let Some(delta) = self.simulator.frame_delta(now) else {
            return FrameReport::default();
        };

        let (enabled, accumulation) = {
            let store = self.store.borrow();
            (store.is_enabled(), store.config().accumulation)
        };
        if !enabled {
            self.simulator.clear();
            return FrameReport {
                particles: self.simulator.particles().len(),
                ..Default::default()
            };
        }

        self.simulator.advance(delta);
        let collisions = if accumulation { self.collide(now) } else { 0 };
        self.simulator.render();
        self.simulator.maybe_spawn();

        FrameReport {
            advanced: true,
            collisions,
            particles: self.simulator.particles().len(),
        }
    }

    /// Run the fade sweep if its timer is due; returns how many stuck particles faded out
    pub fn advance_timers(&mut self, now: Millis) -> usize {
        if self.state != LoopState::Running || !self.fade_timer.poll(now) {
            return 0;
        }
        self.store.borrow_mut().sweep_faded(now)
    }

    /// When [`Orchestrator::advance_timers`] next has work, if running
    pub fn next_deadline(&self) -> Option<Millis> {
        self.fade_timer.next_deadline()
    }

    /// Turn every particle inside a landing zone into a stuck particle
    fn collide(&mut self, now: Millis) -> usize {
        let hits: Vec<(String, Particle)> = self
            .simulator
            .particles()
            .iter()
            .filter_map(|p| {
                let region = self.tracker.resolve_hit(p.x(), p.y())?;
                let landing = self.tracker.landing_point(region, p.x(), p.y());
                let origin = self
                    .tracker
                    .box_of(region)
                    .map_or(Point::ZERO, |rect| rect.origin());

                let mut snapshot = p.clone();
                snapshot.position.x = landing.x - origin.x;
                snapshot.position.y = landing.y - origin.y;
                Some((region.to_string(), snapshot))
            })
            .collect();

        if hits.is_empty() {
            return 0;
        }

        let fade_delay = self.store.borrow().config().fade_delay_ms;
        let count = hits.len();
        for (region, particle) in hits {
            let id = particle.id;
            let stuck = StuckParticle::new(particle, region.as_str(), now, fade_delay);
            log::debug!("{} stuck to '{}'", id, region);

            match self.on_collision.as_mut() {
                Some(callback) => {
                    let record = stuck.clone();
                    self.store.borrow_mut().add_stuck(stuck);
                    callback(&region, &record);
                }
                None => self.store.borrow_mut().add_stuck(stuck),
            }

            self.simulator.recycle(id);
        }
        count
    }

    /// Push the store's config into the simulator after it changed
    fn sync_config(&mut self) {
        let store = self.store.borrow();
        if store.config_revision() == self.synced_revision {
            return;
        }
        self.synced_revision = store.config_revision();
        self.simulator.set_config(store.config().clone());
        log::debug!("Config revision {} applied", self.synced_revision);
    }

    pub fn tracker(&self) -> &RegionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut RegionTracker {
        &mut self.tracker
    }

    pub fn simulator(&self) -> &Simulator<S> {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator<S> {
        &mut self.simulator
    }

    pub fn store(&self) -> &Rc<RefCell<SnowStore>> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snow_regions::{AccumulationArea, RegionOptions};
    use snow_simulation::{ParticleSeed, PerformanceTier, SnowConfig, SnowConfigPatch};
    use snow_surface::{DrawCommand, RecordingCanvas, RecordingSurface, Rect};

    fn engine(config: SnowConfig) -> Orchestrator<RecordingSurface> {
        let store = Rc::new(RefCell::new(SnowStore::new(config)));
        let simulator =
            Simulator::with_seed(&mut RecordingCanvas::default(), SnowConfig::default(), 11).unwrap();
        let mut engine = Orchestrator::with_simulator(simulator, store);
        engine.initialize(Viewport::new(400.0, 400.0, 1.0));
        engine
    }

    fn quiet() -> SnowConfig {
        SnowConfig {
            intensity: 0,
            ..Default::default()
        }
    }

    fn still(x: f32, y: f32) -> ParticleSeed {
        ParticleSeed::at(x, y).with_motion(0.0, 0.0)
    }

    #[test]
    fn test_store_performance_tier_reaches_surface() {
        let mut engine = engine(quiet());
        engine.start(0);
        engine
            .store()
            .borrow_mut()
            .update_config(&SnowConfigPatch::default().with_performance(PerformanceTier::Low));

        engine.frame(16);
        assert_eq!(engine.simulator().surface().circle_segments(), Some(8));
    }

    #[test]
    fn test_missing_context_is_engine_error() {
        let store = Rc::new(RefCell::new(SnowStore::default()));
        let result = Orchestrator::new(&mut RecordingCanvas { available: false }, store);
        assert!(matches!(result, Err(EngineError::Simulation(_))));
    }

    #[test]
    fn test_stopped_engine_does_nothing() {
        let mut engine = engine(quiet());
        engine.simulator_mut().add_particle(still(10.0, 10.0));
        assert_eq!(engine.frame(16), FrameReport::default());
        assert_eq!(engine.advance_timers(1000), 0);
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut engine = engine(quiet());
        engine.start(0);
        engine.start(50);
        assert_eq!(engine.next_deadline(), Some(100));
        assert!(engine.simulator().is_running());

        engine.stop();
        engine.stop();
        assert_eq!(engine.state(), LoopState::Stopped);
        assert!(!engine.simulator().is_running());
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn test_collision_becomes_region_local_stuck_particle() {
        let mut engine = engine(quiet());
        engine.tracker_mut().register(
            "card",
            Rect::from_ltrb(100.0, 200.0, 200.0, 300.0),
            RegionOptions::default(),
        );
        let id = engine.simulator_mut().add_particle(still(150.0, 210.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        engine.set_collision_callback(move |region, stuck| {
            sink.borrow_mut().push((region.to_string(), stuck.id()));
        });

        engine.start(1000);
        let report = engine.frame(1016);

        assert_eq!(report.collisions, 1);
        assert!(engine.simulator().particles().iter().all(|p| p.id != id));
        assert_eq!(*seen.borrow(), vec![("card".to_string(), id)]);

        let store = engine.store().borrow();
        let stuck = &store.stuck("card")[0];
        assert_eq!(stuck.particle.position.x, 50.0);
        assert_eq!(stuck.particle.position.y, 10.0);
        assert_eq!(stuck.stuck_time, 1016);
        assert_eq!(stuck.fade_start, 1016 + 5000);
    }

    #[test]
    fn test_collisions_resolve_before_redraw() {
        let mut engine = engine(quiet());
        engine.tracker_mut().register(
            "card",
            Rect::from_ltrb(0.0, 100.0, 400.0, 200.0),
            RegionOptions::default().with_area(AccumulationArea::All),
        );
        // Falls into the region during this frame's motion step
        engine
            .simulator_mut()
            .add_particle(ParticleSeed::at(50.0, 95.0).with_motion(10.0, 0.0));
        engine.simulator_mut().surface_mut().take_commands();

        engine.start(0);
        let report = engine.frame(16);

        assert_eq!(report.collisions, 1);
        let fills = engine.simulator().surface().fill_count();
        assert_eq!(fills, 0);
    }

    #[test]
    fn test_accumulation_off_skips_collisions() {
        let mut engine = engine(quiet());
        engine
            .store()
            .borrow_mut()
            .update_config(&SnowConfigPatch::default().with_accumulation(false));
        engine.tracker_mut().register(
            "card",
            Rect::from_ltrb(0.0, 0.0, 400.0, 400.0),
            RegionOptions::default().with_area(AccumulationArea::All),
        );
        engine.simulator_mut().add_particle(still(10.0, 10.0));

        engine.start(0);
        let report = engine.frame(16);
        assert_eq!(report.collisions, 0);
        assert_eq!(report.particles, 1);
    }

    #[test]
    fn test_disabled_store_pauses_frames() {
        let mut engine = engine(quiet());
        let id = engine.simulator_mut().add_particle(ParticleSeed::at(10.0, 10.0).with_motion(1.0, 0.0));
        engine.store().borrow_mut().set_enabled(false);
        engine.simulator_mut().surface_mut().take_commands();

        engine.start(0);
        let report = engine.frame(16);

        assert!(!report.advanced);
        let p = engine.simulator().particles().iter().find(|p| p.id == id).unwrap();
        assert_eq!(p.y(), 10.0);
        assert!(matches!(
            engine.simulator().surface().commands(),
            [DrawCommand::ClearRect(_)]
        ));
    }

    #[test]
    fn test_store_config_reaches_simulator() {
        let mut engine = engine(quiet());
        engine.start(0);
        engine
            .store()
            .borrow_mut()
            .update_config(&SnowConfigPatch::default().with_intensity(77));
        engine.frame(16);
        assert_eq!(engine.simulator().config().intensity, 77);
    }

    #[test]
    fn test_fade_sweep_runs_on_its_own_interval() {
        let mut engine = engine(quiet());
        engine
            .store()
            .borrow_mut()
            .update_config(&SnowConfigPatch::default().with_fade(0, 0));
        engine.tracker_mut().register(
            "card",
            Rect::from_ltrb(0.0, 0.0, 400.0, 400.0),
            RegionOptions::default().with_area(AccumulationArea::All),
        );
        engine.simulator_mut().add_particle(still(10.0, 10.0));

        engine.start(0);
        engine.frame(16);
        assert_eq!(engine.store().borrow().total_snow_count(), 1);

        assert_eq!(engine.advance_timers(50), 0);
        assert_eq!(engine.advance_timers(100), 1);
        assert_eq!(engine.store().borrow().total_snow_count(), 0);
    }
}
