//! Orrery - an animated solar system
//!
//! A sun, planets and moons orbiting in a window, with orbit camera controls.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use glam::Vec3;
use orrery::config::AppConfig;
use orrery::input::{InputAction, InputMapper};
use orrery::systems::{FrameLoop, FrameOutcome, RenderError, RenderSystem, WindowSystem};
use orrery_core::{scene_builder, BuildError, SphereGeometry, SystemDescriptor, World};
use orrery_input::OrbitController;
use orrery_render::camera::Camera;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    geometry: Arc<SphereGeometry>,
    world: World,
    camera: Camera,
    controller: OrbitController,
    frame_loop: FrameLoop,
    window: Option<WindowSystem>,
    renderer: Option<RenderSystem>,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, BuildError> {
        let system = Self::load_system(&config);

        let geometry = Arc::new(SphereGeometry::new(
            config.rendering.sphere_width_segments,
            config.rendering.sphere_height_segments,
        ));
        let world = scene_builder::build(&system, geometry.clone())?;

        let camera = Camera::new(
            Vec3::from(config.camera.start_position),
            Vec3::from(config.camera.target),
        );

        let controls = &config.controls;
        let controller = OrbitController::new()
            .with_rotate_sensitivity(controls.rotate_sensitivity)
            .with_pan_sensitivity(controls.pan_sensitivity)
            .with_zoom_speed(controls.zoom_speed)
            .with_damping_factor(controls.damping_factor)
            .with_damping(controls.damping_enabled)
            .with_distance_limits(controls.min_distance, controls.max_distance);

        let frame_loop = FrameLoop::new().with_paused(config.scene.start_paused);

        Ok(Self {
            config,
            geometry,
            world,
            camera,
            controller,
            frame_loop,
            window: None,
            renderer: None,
        })
    }

    /// Read the configured RON system, or the built-in one
    fn load_system(config: &AppConfig) -> SystemDescriptor {
        let Some(path) = &config.scene.path else {
            return SystemDescriptor::default();
        };

        match SystemDescriptor::load(path) {
            Ok(system) => {
                log::info!("Loaded system '{}' from {}", system.name, path.display());
                system
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system from {}: {}. Using built-in system.",
                    path.display(),
                    e
                );
                SystemDescriptor::default()
            }
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => {
                self.frame_loop.stop();
                event_loop.exit();
            }
            InputAction::ResetCamera => {
                self.controller.stop();
                self.camera.reset();
                log::info!("Camera reset to starting position");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ToggleDamping => {
                let enabled = self.controller.toggle_damping();
                log::info!("Orbit damping: {}", if enabled { "ON" } else { "OFF" });
            }
            InputAction::TogglePause => {
                let paused = self.frame_loop.toggle_pause();
                self.update_title(paused);
            }
        }
    }

    fn update_title(&self, paused: bool) {
        if let Some(window) = &self.window {
            let tick = self
                .config
                .debug
                .show_tick_in_title
                .then(|| self.world.tick());
            window.update_title(paused, tick);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &mut self.window) else {
            return;
        };

        let result = self.frame_loop.tick(
            &mut self.world,
            &mut self.controller,
            &mut self.camera,
            renderer,
            window,
        );

        match result {
            Ok(FrameOutcome::Rendered) => {
                if self.config.debug.show_tick_in_title {
                    self.update_title(self.frame_loop.is_paused());
                }
            }
            Ok(FrameOutcome::Stopped) => event_loop.exit(),
            Err(RenderError::SurfaceLost) => {
                renderer.recover_surface();
                window.request_redraw();
            }
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.frame_loop.stop();
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("{}", e);
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match RenderSystem::new(
            window.window().clone(),
            &self.world,
            &self.geometry,
            &self.config.rendering,
            &self.config.camera,
            self.config.window.vsync,
        ) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialise rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = renderer.size();
        log::info!("Rendering '{}' at {}x{}", self.world.name(), width, height);

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.update_title(self.frame_loop.is_paused());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    renderer.resize(physical_size, window.scale_factor());
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    renderer.resize(window.window().inner_size(), scale_factor);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state, event.repeat) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.process_scroll(delta);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.controller.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting Orrery");

    if let Err(e) = &loaded {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let mut app = App::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut app)?;

    Ok(())
}
