//! Nighthaul - a night-driving demo: a truck, two HDR headlights and a
//! bloom pipeline.

mod camera_rig;
mod config;
mod events;
mod lights;
mod render;
mod rig;
mod scene;
mod session;
mod state;
mod vehicle;

use anyhow::Result;
use camera_rig::{CameraMode, ChaseCamera};
use config::GameConfig;
use engine_core::Time;
use glam::Vec3;
use input::InputState;
use lights::LightingState;
use renderer::{Camera, Renderer};
use scene::{Prop, SceneMeshes};
use session::SessionState;
use state::BloomSettings;
use std::path::PathBuf;
use std::sync::Arc;
use vehicle::Vehicle;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

/// Free camera spawn: up and behind the truck, looking down the arena.
const FREE_CAMERA_START: Vec3 = Vec3::new(0.0, 20.0, 45.0);

/// The one context object owning all per-frame mutable state. Passed (as
/// `&mut self`) into update, event handling and rendering; nothing lives
/// in globals.
pub struct GameState {
    time: Time,
    input: InputState,

    renderer: Renderer,
    meshes: SceneMeshes,
    props: Vec<Prop>,

    truck: Vehicle,
    camera: Camera,
    chase_camera: ChaseCamera,
    camera_mode: CameraMode,
    lighting: LightingState,
    bloom: BloomSettings,
    overlay_enabled: bool,

    session_path: PathBuf,
    running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window, &config.sky_dir).await?;
        let meshes = SceneMeshes::new(&renderer.device);
        let props = scene::scatter_props();

        let mut camera = Camera::new(FREE_CAMERA_START, 0.0, -15.0);
        camera.sensitivity *= config.sensitivity;

        let session_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("session.txt");
        let mut overlay_enabled = false;
        if config.restore_session {
            let session = SessionState::load(&session_path);
            let [r, g, b] = session.clear_color;
            renderer.clear_color = wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            };
            overlay_enabled = session.overlay_enabled;
            if let Some(position) = session.camera_position {
                camera.transform.position = position;
            }
            if let Some(front) = session.camera_front {
                let pitch = front.y.clamp(-1.0, 1.0).asin();
                let yaw = (-front.x).atan2(-front.z);
                camera.set_yaw_pitch(yaw, pitch);
            }
        }

        Ok(Self {
            time: Time::new(),
            input: InputState::new(),
            renderer,
            meshes,
            props,
            truck: Vehicle::default(),
            camera,
            chase_camera: ChaseCamera::default(),
            camera_mode: CameraMode::VehicleChase,
            lighting: LightingState::new(),
            bloom: BloomSettings::default(),
            overlay_enabled,
            session_path,
            running: true,
        })
    }

    fn update(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();

        if self.input.is_quit_pressed() {
            self.shutdown();
            return;
        }
        if self.input.is_camera_toggle_pressed() {
            self.camera_mode = self.camera_mode.toggled();
            log::info!("Camera mode: {:?}", self.camera_mode);
        }
        if self.input.is_bloom_toggle_pressed() {
            self.bloom.enabled = !self.bloom.enabled;
            log::info!(
                "Bloom {}",
                if self.bloom.enabled { "on" } else { "off" }
            );
        }
        if self.input.is_overlay_toggle_pressed() {
            self.overlay_enabled = !self.overlay_enabled;
            // The overlay needs a visible cursor; driving wants it locked.
            let window = &self.renderer.window;
            if self.overlay_enabled {
                let _ = window.set_cursor_grab(CursorGrabMode::None);
                window.set_cursor_visible(true);
                self.input.set_cursor_locked(false);
            } else {
                let _ = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                window.set_cursor_visible(false);
                self.input.set_cursor_locked(true);
            }
            log::info!(
                "Debug overlay {}",
                if self.overlay_enabled { "on" } else { "off" }
            );
        }
        self.bloom.adjust_exposure(
            self.input.is_exposure_up_held(),
            self.input.is_exposure_down_held(),
            dt,
        );

        match self.camera_mode {
            CameraMode::WorldFree => {
                let look = self.input.mouse_delta();
                if look != glam::Vec2::ZERO {
                    self.camera.process_mouse(look.x, look.y);
                }
                self.camera.process_scroll(self.input.scroll_delta());
                self.camera
                    .process_fly(self.input.get_movement_input(), 0.0, dt);
            }
            CameraMode::VehicleChase => {
                self.truck.update(self.input.drive_intent(), dt);
                self.chase_camera.update(
                    rig::vehicle_frame(self.truck.model_matrix()),
                    self.truck.forward,
                );
            }
        }

        // Clear input for next frame
        self.input.begin_frame();
    }

    fn render(&mut self) -> Result<()> {
        render::run(self)
    }

    /// Persist session state and stop the loop.
    fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let session = SessionState {
            clear_color: [
                self.renderer.clear_color.r as f32,
                self.renderer.clear_color.g as f32,
                self.renderer.clear_color.b as f32,
            ],
            overlay_enabled: self.overlay_enabled,
            camera_position: Some(self.camera.position()),
            camera_front: Some(self.camera.forward()),
        };
        session.save(&self.session_path);
        log::info!(
            "Shutting down after {} frames ({:.1}s)",
            self.time.frame_count(),
            self.time.elapsed_seconds()
        );
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new() -> Self {
        Self {
            state: None,
            init_error: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Nighthaul")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window_width,
                    config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    self.init_error = Some(e.into());
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(GameState::new(window.clone(), config)) {
                Ok(mut state) => {
                    // A restored overlay session starts with the cursor free.
                    if !state.overlay_enabled {
                        let _ = window
                            .set_cursor_grab(CursorGrabMode::Locked)
                            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                        window.set_cursor_visible(false);
                        state.input.set_cursor_locked(true);
                    }
                    self.state = Some(state);
                    window.request_redraw();
                }
                Err(e) => {
                    self.init_error = Some(e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Nighthaul");
    log::info!("Controls: W/S throttle+brake, A/D steer, C camera, B bloom, Q/E exposure, F1 overlay, Esc quit");

    let event_loop = EventLoop::new()?;
    // Poll continuously so input and redraw are processed as fast as
    // possible instead of waiting on events.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    // Fatal initialization failure exits nonzero; a clean close exits 0.
    if let Some(e) = app.init_error {
        return Err(e);
    }
    Ok(())
}
