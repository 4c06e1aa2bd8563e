use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{SimConfig, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::error::SetupError;
use crate::gpu::{GpuContext, GpuKernels, KernelSource};
use crate::simulation::mouse::to_surface_coords;
use crate::simulation::{MouseState, SimulationLoop};

/// Application state
pub struct App {
    config: SimConfig,
    window: Option<Arc<Window>>,
    sim: Option<SimulationLoop<GpuKernels>>,
    mouse: MouseState,
    /// Last cursor position in window pixels (top-left origin)
    cursor: Option<(f64, f64)>,
    start: Instant,
    fps_counter: FpsCounter,
    setup_error: Option<SetupError>,
}

impl App {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            window: None,
            sim: None,
            mouse: MouseState::default(),
            cursor: None,
            start: Instant::now(),
            fps_counter: FpsCounter::new(),
            setup_error: None,
        }
    }

    /// Fatal error that prevented the loop from starting, if any
    pub fn setup_error(&self) -> Option<&SetupError> {
        self.setup_error.as_ref()
    }

    /// Milliseconds since setup finished
    fn timestamp(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SetupError> {
        log::info!("Initializing wave simulation...");
        log::info!(
            "Grid size: {}x{} ({} channels)",
            self.config.cols,
            self.config.rows,
            self.config.channels.count()
        );

        let window_attrs = Window::default_attributes()
            .with_title("GPU Waves - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        let kernels = GpuKernels::new(
            gpu,
            &self.config,
            &KernelSource::bundled_update(),
            &KernelSource::bundled_present(),
        )?;

        log::info!("Creating grid textures...");
        let a = kernels.create_target("grid-texture-a", &self.config)?;
        let b = kernels.create_target("grid-texture-b", &self.config)?;

        let sim = SimulationLoop::new(kernels, a, b, &self.config)?;

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Drag: Disturb the surface");
        log::info!("  Space: Pause/resume");
        log::info!("  R: Reset to initial condition");
        log::info!("  Escape: Quit");

        // Frame timestamps start at the first redraw, not at process start
        self.start = Instant::now();
        window.request_redraw();
        self.window = Some(window);
        self.sim = Some(sim);
        Ok(())
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        let now = self.timestamp();
        let Some(sim) = &mut self.sim else {
            return;
        };

        match key_code {
            KeyCode::Space => {
                if sim.is_running() {
                    sim.stop();
                } else {
                    sim.resume(now);
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            KeyCode::KeyR => sim.reset(),
            _ => {}
        }
    }

    /// Cursor position in surface pixels with a bottom-left origin
    fn surface_cursor(&self) -> Option<(i32, i32)> {
        let (x, y) = self.cursor?;
        let sim = self.sim.as_ref()?;
        let (_, height) = sim.kernels().gpu().surface_size();
        Some(to_surface_coords(x, y, height))
    }

    fn render(&mut self) {
        let now = self.timestamp();
        let Some(sim) = &mut self.sim else {
            return;
        };

        // Re-arm only while running; a stopped loop stays idle until resumed
        if !sim.step(now, &mut self.mouse) {
            return;
        }

        if let Some(fps) = self.fps_counter.tick() {
            log::debug!("{:.0} FPS at frame {}", fps, sim.frame_number());
            if let Some(window) = &self.window {
                window.set_title(&format!("GPU Waves - {:.0} FPS", fps));
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.setup_error.is_some() {
            return;
        }

        if let Err(err) = self.setup(event_loop) {
            log::error!("Setup failed: {}", err);
            self.setup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                if let Some(sim) = &mut self.sim {
                    sim.stop();
                }
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            if let Some(sim) = &mut self.sim {
                                sim.stop();
                            }
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x, position.y));
                if let Some((x, y)) = self.surface_cursor() {
                    self.mouse.move_to(x, y);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    if let Some((x, y)) = self.surface_cursor() {
                        self.mouse.press(x, y);
                    }
                }
                ElementState::Released => self.mouse.release(),
            },
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.mouse.release();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(sim) = &mut self.sim {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    sim.kernels_mut().resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => self.render(),
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
