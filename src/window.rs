//! The winit host loop.
//!
//! Supplies one monotonically increasing timestamp per redraw to the frame
//! driver. While the animation clock is negative the loop sleeps until the
//! start time instead of spinning.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::camera::OrbitCamera;
use crate::config::AnimationConfig;
use crate::driver::Tick;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::scene::Scene;

/// Longest sleep while waiting for the start time.
const MAX_WAIT: Duration = Duration::from_millis(500);
/// Radians per pixel of mouse drag.
const ROTATE_SPEED: f32 = 0.005;
/// Zoom fraction per scroll line.
const ZOOM_SPEED: f32 = 0.1;

/// Build the scene for `config`, open a window and animate until closed.
///
/// Configuration, font and sampling failures are returned before any window
/// is created.
pub fn run(config: AnimationConfig) -> Result<(), RunError> {
    let scene = Scene::from_config(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    scene: Scene,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    epoch: Instant,
    next_redraw: Option<Instant>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<RunError>,
}

impl App {
    fn new(scene: Scene) -> Self {
        Self {
            scene,
            window: None,
            gpu_state: None,
            epoch: Instant::now(),
            next_redraw: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let title = format!(
            "{} \u{2192} {}",
            self.scene.config().old_text(),
            self.scene.config().new_text()
        );
        let window_attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let mut gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.scene))?;
        if self.scene.config().options.debug {
            gpu_state.debug_camera = Some(OrbitCamera::new(
                glam::Vec3::ZERO,
                self.scene.config().camera_start,
            ));
        }

        // First frame before the clock starts, so the window is never blank.
        let frame = self.scene.driver().frame();
        if let Err(e) = gpu_state.render(&frame) {
            log::warn!("Initial render failed: {:?}", e);
        }

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        // Setup time is not animation time: seed from the wall clock at the
        // first tick rather than when the scene was built.
        if self.scene.resync_to_local_time() {
            self.epoch = Instant::now();
        }
        let timestamp = self.epoch.elapsed().as_secs_f64();

        match self.scene.driver_mut().step(timestamp, gpu_state) {
            Ok(Tick::Advanced { .. }) => {
                self.next_redraw = None;
                event_loop.set_control_flow(ControlFlow::Poll);
            }
            Ok(Tick::Waiting { remaining }) => {
                let wait = Duration::from_secs_f64(remaining).min(MAX_WAIT);
                let deadline = Instant::now() + wait;
                self.next_redraw = Some(deadline);
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(camera) = self
                            .gpu_state
                            .as_mut()
                            .and_then(|gpu| gpu.debug_camera.as_mut())
                        {
                            camera.rotate(dx * ROTATE_SPEED, dy * ROTATE_SPEED);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(camera) = self
                    .gpu_state
                    .as_mut()
                    .and_then(|gpu| gpu.debug_camera.as_mut())
                {
                    camera.zoom(scroll * ZOOM_SPEED);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let due = self
            .next_redraw
            .map_or(true, |deadline| Instant::now() >= deadline);
        if due {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}
