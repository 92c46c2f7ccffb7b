//! Snowfall demo
//!
//! Snow falls over a few cards and piles up on them until it fades.
//!
//! Keys: Space toggles snow, A toggles accumulation, C clears stuck snow,
//! 1-4 pick an intensity, T cycles color themes, P cycles presets, Esc quits.

mod scene;

use anyhow::Context;
use scene::Scene;
use snow_accumulation::SnowStore;
use snow_engine::{load_settings_file, save_settings_file, Clock, MonotonicClock, Orchestrator};
use snow_renderer::Renderer;
use snow_simulation::{Intensity, SnowConfigPatch, Theme};
use snow_surface::{mocha, MeshCanvas, MeshSurface, Viewport};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const SETTINGS_FILE: &str = "snowfall-settings.json";

fn settings_path() -> PathBuf {
    std::env::var_os("SNOWFALL_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}

fn viewport_of(window: &Window) -> Viewport {
    let size = window.inner_size();
    let scale = window.scale_factor() as f32;
    Viewport::new(size.width as f32 / scale, size.height as f32 / scale, scale)
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,

    store: Rc<RefCell<SnowStore>>,
    engine: Orchestrator<MeshSurface>,
    scene: Scene,
    clock: MonotonicClock,
    collisions: Rc<Cell<usize>>,

    theme: Theme,
    preset_cursor: usize,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl GpuState {
    async fn new(window: Arc<Window>, store: Rc<RefCell<SnowStore>>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("creating window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(&device, config.format);
        log::info!("✓ Renderer initialized");

        let viewport = viewport_of(&window);
        let segments = store.borrow().config().performance.circle_segments();
        let mut canvas = MeshCanvas {
            circle_segments: segments,
        };
        let mut engine = Orchestrator::new(&mut canvas, store.clone())?;

        let scene = Scene::new(viewport);
        scene.register(engine.tracker_mut());
        engine.initialize(viewport);

        let collisions = Rc::new(Cell::new(0));
        let counter = collisions.clone();
        engine.set_collision_callback(move |region, stuck| {
            counter.set(counter.get() + 1);
            log::trace!("{} landed on '{}'", stuck.id(), region);
        });

        let clock = MonotonicClock::new();
        engine.start(clock.now());
        log::info!("✓ Snowfall initialized");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            store,
            engine,
            scene,
            clock,
            collisions,
            theme: Theme::Default,
            preset_cursor: 0,
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        })
    }

    fn resize(&mut self, window: &Window) {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);

        let viewport = viewport_of(window);
        self.scene.resize(viewport);
        self.engine.resize(viewport);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let mut store = self.store.borrow_mut();
        match key {
            KeyCode::Space => store.toggle(),
            KeyCode::KeyA => {
                let on = !store.config().accumulation;
                store.update_config(&SnowConfigPatch::default().with_accumulation(on));
                log::info!("Accumulation {}", if on { "on" } else { "off" });
            }
            KeyCode::KeyC => store.clear_all(),
            KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Digit4 => {
                let level = match key {
                    KeyCode::Digit1 => Intensity::Light,
                    KeyCode::Digit2 => Intensity::Medium,
                    KeyCode::Digit3 => Intensity::Heavy,
                    _ => Intensity::Blizzard,
                };
                store.update_config(&level.patch());
                log::info!("Intensity {:?}", level);
            }
            KeyCode::KeyT => {
                self.theme = self.theme.next();
                store.update_config(&self.theme.patch());
                log::info!("Theme {:?}", self.theme);
            }
            KeyCode::KeyP => {
                let names: Vec<String> = store.presets().iter().map(|p| p.name.clone()).collect();
                if let Some(name) = names.get(self.preset_cursor % names.len().max(1)) {
                    store.apply_preset(name);
                }
                self.preset_cursor = self.preset_cursor.wrapping_add(1);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> Result<(f32, usize, usize), wgpu::SurfaceError> {
        let now_instant = Instant::now();
        let frame_time = (now_instant - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now_instant;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }
        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = if avg_frame_time > 0.0 { 1000.0 / avg_frame_time } else { 0.0 };

        let now = self.clock.now();
        let report = self.engine.frame(now);
        self.engine.advance_timers(now);

        let stuck = {
            let store = self.store.borrow();
            self.scene.draw(self.engine.tracker(), &store, now);
            store.total_snow_count()
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Snow Encoder"),
            });

        let snow = self.engine.simulator().surface().mesh();
        self.renderer.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            [self.config.width, self.config.height],
            &[self.scene.backdrop(), self.scene.overlay(), snow],
            Some(mocha::BASE),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok((fps, report.particles, stuck))
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    store: Rc<RefCell<SnowStore>>,
}

impl App {
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.engine.destroy();
            log::info!("{} collisions this session", gpu_state.collisions.get());
        }
        if let Err(e) = save_settings_file(&self.store.borrow(), settings_path()) {
            log::warn!("Could not save settings: {}", e);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Snowfall")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(GpuState::new(window.clone(), self.store.clone())) {
            Ok(state) => self.gpu_state = Some(state),
            Err(e) => {
                log::error!("Could not initialize snowfall: {:#}", e);
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.shutdown(event_loop);
                return;
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.handle_key(key);
                }
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    gpu_state.resize(window);
                }
            }

            WindowEvent::RedrawRequested => {
                let mut out_of_memory = false;
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render() {
                        Ok((fps, falling, stuck)) => {
                            window.set_title(&format!(
                                "Snowfall - {:.0} FPS - {} falling - {} stuck",
                                fps, falling, stuck
                            ));
                        }
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(window)
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => out_of_memory = true,
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
                if out_of_memory {
                    self.shutdown(event_loop);
                    return;
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting snowfall demo...");

    let mut store = SnowStore::default();
    if let Err(e) = load_settings_file(&mut store, settings_path()) {
        log::warn!("Ignoring saved settings: {}", e);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        gpu_state: None,
        store: Rc::new(RefCell::new(store)),
    };

    event_loop.run_app(&mut app)?;
    Ok(())
}
