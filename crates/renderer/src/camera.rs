//! Free-fly world camera.

use bytemuck::{Pod, Zeroable};
use engine_core::Transform;
use glam::{Mat4, Vec3};

/// Fly camera with yaw/pitch look, WASD translation and scroll zoom.
///
/// The orientation quaternion is rebuilt from yaw and pitch on every look
/// change, so front/right/up always form an orthonormal basis.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Field of view in degrees, driven by scroll zoom.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Mouse sensitivity for look controls.
    pub sensitivity: f32,
    /// Fly speed in units per second.
    pub speed: f32,
    /// Current pitch (up/down rotation) in radians.
    pitch: f32,
    /// Current yaw (left/right rotation) in radians.
    yaw: f32,
}

/// Scroll zoom bounds, in degrees.
const FOV_MIN: f32 = 1.0;
const FOV_MAX: f32 = 45.0;

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: FOV_MAX,
            near: 0.1,
            far: 400.0,
            aspect: 4.0 / 3.0,
            sensitivity: 0.1,
            speed: 25.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking along the yaw/pitch angles
    /// (degrees).
    pub fn new(position: Vec3, yaw_degrees: f32, pitch_degrees: f32) -> Self {
        let mut camera = Self {
            transform: Transform::from_position(position),
            ..Default::default()
        };
        camera.set_yaw_pitch(yaw_degrees.to_radians(), pitch_degrees.to_radians());
        camera
    }

    /// Update aspect ratio.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Process mouse movement for look controls.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        let yaw = self.yaw - (delta_x * self.sensitivity).to_radians();
        let pitch = self.pitch - (delta_y * self.sensitivity).to_radians();
        self.set_yaw_pitch(yaw, pitch);
    }

    /// Process scroll wheel zoom, clamping the field of view.
    pub fn process_scroll(&mut self, delta: f32) {
        self.fov_degrees = (self.fov_degrees - delta).clamp(FOV_MIN, FOV_MAX);
    }

    /// Free-fly: move in camera space (forward/right/up), normalized so
    /// diagonals are not faster.
    pub fn process_fly(&mut self, move_xy: glam::Vec2, move_y: f32, dt: f32) {
        let forward = self.transform.forward();
        let right = self.transform.right();
        let up = self.transform.up();

        let mut velocity = Vec3::ZERO;
        velocity += forward * move_xy.y;
        velocity += right * move_xy.x;
        velocity += up * move_y;

        if velocity.length_squared() > 0.0 {
            velocity = velocity.normalize() * self.speed * dt;
            self.transform.translate(velocity);
        }
    }

    /// Set yaw and pitch (radians) and rebuild the rotation. Pitch is
    /// clamped short of straight up/down to avoid gimbal flip.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        let max_pitch = 89.0f32.to_radians();
        self.yaw = yaw;
        self.pitch = pitch.clamp(-max_pitch, max_pitch);
        self.transform.rotation =
            glam::Quat::from_rotation_y(self.yaw) * glam::Quat::from_rotation_x(self.pitch);
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.transform.position;
        let target = eye + self.transform.forward();
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Get camera forward direction.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Get current yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get current pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Camera uniform data for GPU. Fed from whichever camera is active this
/// frame (free camera matrices or the chase camera's look-at).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn set_matrices(&mut self, view: Mat4, proj: Mat4, position: Vec3) {
        self.view = view.to_cols_array_2d();
        self.proj = proj.to_cols_array_2d();
        self.view_proj = (proj * view).to_cols_array_2d();
        self.position = [position.x, position.y, position.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_clamped_at_89_degrees() {
        let mut camera = Camera::default();
        camera.process_mouse(0.0, -10000.0);
        assert!(camera.pitch() <= 89.0f32.to_radians() + 1e-6);
        camera.process_mouse(0.0, 10000.0);
        assert!(camera.pitch() >= -89.0f32.to_radians() - 1e-6);
    }

    #[test]
    fn zoom_clamps_fov() {
        let mut camera = Camera::default();
        camera.process_scroll(100.0);
        assert_eq!(camera.fov_degrees, 1.0);
        camera.process_scroll(-100.0);
        assert_eq!(camera.fov_degrees, 45.0);
    }

    #[test]
    fn basis_stays_orthonormal_after_look() {
        let mut camera = Camera::new(Vec3::ZERO, -135.0, -35.0);
        camera.process_mouse(37.0, -12.5);
        let f = camera.transform.forward();
        let r = camera.transform.right();
        let u = camera.transform.up();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
    }
}
