//! Camera rig: the free world camera lives in the renderer crate; this adds
//! the chase camera and the mode switch between them.

use crate::rig;
use glam::{Mat4, Vec3};

/// Which viewpoint is active this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Free-fly camera, mouse look + WASD.
    WorldFree,
    /// Chase camera following the truck.
    VehicleChase,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::WorldFree => CameraMode::VehicleChase,
            CameraMode::VehicleChase => CameraMode::WorldFree,
        }
    }
}

/// Position smoothing factor per update. One exponential step, not a
/// physical spring.
pub const CHASE_LERP: f32 = 0.3;

/// Chase camera: position eased toward an offset behind the cab,
/// orientation snapped straight to the truck's heading. The asymmetry
/// (smoothed translation, instant rotation) is deliberate.
#[derive(Debug, Clone)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub front: Vec3,
    /// Field of view in degrees (fixed; the chase view has no zoom).
    pub fov_degrees: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            position: rig::CHASE_OFFSET,
            front: Vec3::NEG_Z,
            fov_degrees: 45.0,
        }
    }
}

impl ChaseCamera {
    /// Follow the truck for one frame. `vehicle_frame` is the corrected
    /// vehicle frame (translation + steering), `forward` its unit heading.
    pub fn update(&mut self, vehicle_frame: Mat4, forward: Vec3) {
        let target = vehicle_frame.transform_point3(rig::CHASE_OFFSET);
        self.position = self.position.lerp(target, CHASE_LERP);
        self.front = forward;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_update_covers_thirty_percent() {
        let frame = Mat4::IDENTITY;
        let target = rig::CHASE_OFFSET;
        let mut camera = ChaseCamera {
            position: target + Vec3::new(10.0, 0.0, 0.0),
            ..Default::default()
        };
        camera.update(frame, Vec3::NEG_Z);
        let remaining = (camera.position - target).length();
        assert!((remaining - 7.0).abs() < 1e-4);
    }

    #[test]
    fn converges_monotonically_without_overshoot() {
        let frame = Mat4::from_translation(Vec3::new(5.0, 0.0, -30.0));
        let target = frame.transform_point3(rig::CHASE_OFFSET);
        let mut camera = ChaseCamera {
            position: target + Vec3::new(0.0, 0.0, 10.0),
            ..Default::default()
        };
        let mut last = (camera.position - target).length();
        for _ in 0..100 {
            camera.update(frame, Vec3::NEG_Z);
            let d = (camera.position - target).length();
            assert!(d <= last + 1e-6);
            last = d;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn front_snaps_to_heading() {
        let mut camera = ChaseCamera::default();
        let heading = Vec3::new(1.0, 0.0, 0.0);
        camera.update(Mat4::IDENTITY, heading);
        // No interpolation on orientation.
        assert_eq!(camera.front, heading);
    }
}
