//! Transform component and utilities for spatial positioning.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotate around the Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_y(angle) * self.rotation;
    }
}

/// Transform a direction by a matrix (translation excluded) and normalize.
///
/// Used wherever a heading has to be a consequence of a model matrix rather
/// than an independently stored vector.
pub fn rotate_direction(matrix: Mat4, local: Vec3) -> Vec3 {
    matrix.transform_vector3(local).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_is_identity() {
        let t = Transform::default();
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn forward_right_up_orthonormal() {
        let mut t = Transform::default();
        t.rotate_y(0.7);
        let f = t.forward();
        let r = t.right();
        let u = t.up();
        assert!((f.length() - 1.0).abs() < 1e-6);
        assert!(f.dot(r).abs() < 1e-6);
        assert!(f.dot(u).abs() < 1e-6);
        assert!(r.dot(u).abs() < 1e-6);
    }

    #[test]
    fn rotate_direction_ignores_translation() {
        let m = Mat4::from_translation(Vec3::new(100.0, -5.0, 3.0));
        let d = rotate_direction(m, Vec3::X);
        assert!((d - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn rotate_direction_normalizes() {
        let m = Mat4::from_scale(Vec3::splat(7.5));
        let d = rotate_direction(m, Vec3::new(0.0, 0.0, -3.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
    }
}
