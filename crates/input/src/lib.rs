//! Input handling for keyboard and mouse.
//!
//! Window/device events are folded into an [`InputState`] once per frame;
//! the simulation only ever sees the [`DriveIntent`] snapshot and the raw
//! mouse/scroll deltas, never winit types.

use glam::Vec2;
use std::collections::HashSet;

/// Per-frame driving intent consumed by the vehicle kinematics.
///
/// Built from [`InputState::drive_intent`] once per frame so the kinematics
/// stay testable without a window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveIntent {
    /// Accelerate (W held).
    pub throttle: bool,
    /// Brake / reverse (S held).
    pub brake: bool,
    /// Steering axis: +1 left (A), -1 right (D), 0 neither or both.
    pub steer_axis: f32,
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta (drained at frame start).
    accumulated_delta: Vec2,

    /// Scroll wheel delta this frame (positive = up).
    scroll_delta: f32,
    accumulated_scroll: f32,

    /// Whether the cursor is captured/locked.
    cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.scroll_delta = self.accumulated_scroll;
        self.accumulated_scroll = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process mouse movement.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Process a scroll wheel event (line delta, positive = up).
    pub fn process_scroll(&mut self, delta: f32) {
        self.accumulated_scroll += delta;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Get the scroll wheel delta for this frame.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    /// Snapshot the driving intent for this frame (W/S throttle/brake, A/D steer).
    pub fn drive_intent(&self) -> DriveIntent {
        let mut steer_axis = 0.0;
        if self.is_key_held(KeyCode::KeyA) {
            steer_axis += 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) {
            steer_axis -= 1.0;
        }
        DriveIntent {
            throttle: self.is_key_held(KeyCode::KeyW),
            brake: self.is_key_held(KeyCode::KeyS),
            steer_axis,
        }
    }

    /// Get free-camera movement input as a normalized vector (WASD).
    pub fn get_movement_input(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW) {
            movement.y += 1.0;
        }
        if self.is_key_held(KeyCode::KeyS) {
            movement.y -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) {
            movement.x -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) {
            movement.x += 1.0;
        }

        if movement.length_squared() > 0.0 {
            movement = movement.normalize();
        }

        movement
    }

    /// Check if the camera mode toggle was pressed (C).
    pub fn is_camera_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyC)
    }

    /// Check if the overlay/UI toggle was pressed (F1).
    pub fn is_overlay_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::F1)
    }

    /// Check if the bloom toggle was pressed (B).
    pub fn is_bloom_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyB)
    }

    /// Check if exposure-decrease is held (Q).
    pub fn is_exposure_down_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyQ)
    }

    /// Check if exposure-increase is held (E).
    pub fn is_exposure_up_held(&self) -> bool {
        self.is_key_held(KeyCode::KeyE)
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_intent_from_keys() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        let intent = input.drive_intent();
        assert!(intent.throttle);
        assert!(!intent.brake);
        assert_eq!(intent.steer_axis, 1.0);

        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        assert_eq!(input.drive_intent().steer_axis, 0.0);
    }

    #[test]
    fn pressed_is_one_frame_only() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyB, ElementState::Pressed);
        assert!(input.is_bloom_toggle_pressed());
        input.begin_frame();
        assert!(!input.is_bloom_toggle_pressed());
        assert!(input.is_key_held(KeyCode::KeyB));
    }

    #[test]
    fn mouse_and_scroll_deltas_drain_per_frame() {
        let mut input = InputState::new();
        input.process_mouse_motion((3.0, -2.0));
        input.process_mouse_motion((1.0, 1.0));
        input.process_scroll(1.0);
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, -1.0));
        assert_eq!(input.scroll_delta(), 1.0);
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
