//! Transform constants for the truck rig.
//!
//! The truck mesh is modelled with non-canonical axes, so two fixed
//! corrective rotations are baked into its model matrix. Everything hanging
//! off the truck (headlights, windshield, chase camera) has to agree with
//! those corrections, so they all live here as one table instead of being
//! scattered through the components.

use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Corrective pitch: the mesh is authored lying on its back.
pub const MESH_PITCH: f32 = -FRAC_PI_2;
/// Corrective roll applied after the pitch correction.
pub const MESH_ROLL: f32 = FRAC_PI_2;

/// The truck's forward axis in mesh-local space. World forward is always
/// derived by pushing this through the model matrix.
pub const FORWARD_LOCAL: Vec3 = Vec3::X;

/// Downward tilt of both headlights, radians (aimed at the road).
pub const HEADLIGHT_TILT: f32 = -0.3;
/// Headlight mount points in the corrected vehicle frame.
pub const HEADLIGHT_MOUNT_LEFT: Vec3 = Vec3::new(-4.0, 7.0, -17.0);
pub const HEADLIGHT_MOUNT_RIGHT: Vec3 = Vec3::new(4.0, 7.0, -17.0);

/// Chase camera offset behind and above the cab, in the corrected vehicle
/// frame.
pub const CHASE_OFFSET: Vec3 = Vec3::new(0.0, 11.0, -9.0);

/// Windshield corners in the corrected vehicle frame, ordered bottom-left,
/// bottom-right, top-right, top-left.
pub const WINDSHIELD_CORNERS: [Vec3; 4] = [
    Vec3::new(-3.0, 9.0, -13.5),
    Vec3::new(3.0, 9.0, -13.5),
    Vec3::new(3.0, 13.0, -11.5),
    Vec3::new(-3.0, 13.0, -11.5),
];
/// Flat windshield tint (RGBA, alpha-blended over the scene).
pub const WINDSHIELD_TINT: [f32; 4] = [0.7, 0.7, 0.9, 0.2];

/// Build the truck model matrix from position and steering angle: translate,
/// steer about the vertical axis, then the two mesh corrections.
pub fn vehicle_model_matrix(position: Vec3, steering: f32) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_rotation_y(steering)
        * Mat4::from_rotation_x(MESH_PITCH)
        * Mat4::from_rotation_z(MESH_ROLL)
}

/// The corrected vehicle frame: the model matrix with the mesh corrections
/// undone, leaving translation plus steering only. Mount points, windshield
/// corners and the chase offset are all authored in this frame.
pub fn vehicle_frame(model: Mat4) -> Mat4 {
    model * Mat4::from_rotation_z(-MESH_ROLL) * Mat4::from_rotation_x(-MESH_PITCH)
}

/// The headlight frame: the corrected vehicle frame with the fixed downward
/// tilt applied. Transforming a mount point by this yields the lamp's world
/// position.
pub fn headlight_frame(model: Mat4) -> Mat4 {
    vehicle_frame(model) * Mat4::from_rotation_x(HEADLIGHT_TILT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_frame_undoes_mesh_corrections() {
        let position = Vec3::new(12.0, 0.0, -7.0);
        let model = vehicle_model_matrix(position, 0.0);
        let frame = vehicle_frame(model);
        // With zero steering the corrected frame is a pure translation.
        assert!((frame.transform_point3(Vec3::ZERO) - position).length() < 1e-5);
        assert!((frame.transform_vector3(Vec3::Y) - Vec3::Y).length() < 1e-5);
        assert!((frame.transform_vector3(Vec3::X) - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn steering_rotates_frame_about_y() {
        let model = vehicle_model_matrix(Vec3::ZERO, FRAC_PI_2);
        let frame = vehicle_frame(model);
        let x = frame.transform_vector3(Vec3::X);
        // Quarter turn left maps +X onto -Z.
        assert!((x - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn headlight_frame_tilts_downward() {
        let model = vehicle_model_matrix(Vec3::ZERO, 0.0);
        let ahead = headlight_frame(model).transform_vector3(-Vec3::Z);
        // Tilted frame points its forward axis below the horizon.
        assert!(ahead.y < 0.0);
        assert!((ahead.length() - 1.0).abs() < 1e-5);
    }
}
