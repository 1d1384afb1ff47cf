//! Window and device event handling for GameState.

use winit::event::{DeviceEvent, MouseScrollDelta, WindowEvent};

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                true
            }
            WindowEvent::Resized(size) => {
                // Only the surface follows the window; the offscreen scene
                // keeps its startup size.
                self.renderer.resize(size);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                self.input.process_scroll(lines);
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    match e.downcast_ref::<renderer::RendererError>() {
                        Some(renderer::RendererError::Surface(
                            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                        )) => {
                            // Reconfigure and pick the frame back up on the
                            // next redraw.
                            let size = self.renderer.size;
                            self.renderer.resize(size);
                        }
                        _ => log::error!("Render error: {}", e),
                    }
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }

    /// Handle device events (raw mouse motion for the free camera).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.is_cursor_locked() {
                self.input.process_mouse_motion(delta);
            }
        }
    }
}
