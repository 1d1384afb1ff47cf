//! Lighting state: two headlight spotlights derived from the truck
//! transform every frame, plus one static overhead point light.
//!
//! The cone and tone-mapping math is mirrored here as plain functions so
//! the shader contracts can be unit tested on the CPU.

use crate::{rig, vehicle::Vehicle};
use glam::{Mat4, Vec3};
use renderer::{LightsUniform, PointLightGpu, SpotlightGpu};

/// Static spotlight configuration shared by both headlights.
#[derive(Debug, Clone, Copy)]
pub struct SpotlightConfig {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// Constant / linear / quadratic attenuation coefficients.
    pub attenuation: [f32; 3],
    /// Cosine of the inner cone angle (full intensity inside).
    pub cutoff_cos: f32,
    /// Cosine of the outer cone angle (zero intensity outside).
    pub outer_cutoff_cos: f32,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            ambient: [0.1, 0.1, 0.09],
            // Deliberately over 1.0: the headlight pools are what feed the
            // bloom bright pass.
            diffuse: [4.0, 4.0, 3.4],
            specular: [1.0, 1.0, 0.9],
            attenuation: [1.0, 0.007, 0.0002],
            cutoff_cos: 30.0f32.to_radians().cos(),
            outer_cutoff_cos: 45.0f32.to_radians().cos(),
        }
    }
}

/// Static overhead point light configuration.
#[derive(Debug, Clone, Copy)]
pub struct PointLightConfig {
    pub position: Vec3,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub attenuation: [f32; 3],
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 30.0, 0.0),
            ambient: [0.05, 0.05, 0.08],
            diffuse: [0.6, 0.6, 0.8],
            specular: [0.4, 0.4, 0.5],
            attenuation: [1.0, 0.014, 0.0007],
        }
    }
}

/// All live-tunable lighting state.
#[derive(Debug, Clone)]
pub struct LightingState {
    pub headlights: SpotlightConfig,
    pub overhead: PointLightConfig,
    pub material_shininess: f32,
}

impl Default for LightingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LightingState {
    pub fn new() -> Self {
        Self {
            headlights: SpotlightConfig::default(),
            overhead: PointLightConfig::default(),
            material_shininess: 32.0,
        }
    }

    /// Build the frame's light uniform from the current truck transform.
    /// Headlight positions come from the tilted headlight frame; their
    /// direction is the truck's heading itself, so both lamps always agree
    /// with the drawn mesh.
    pub fn derive(&self, truck: &Vehicle, view_position: Vec3) -> LightsUniform {
        let frame = rig::headlight_frame(truck.model_matrix());
        let left = frame.transform_point3(rig::HEADLIGHT_MOUNT_LEFT);
        let right = frame.transform_point3(rig::HEADLIGHT_MOUNT_RIGHT);

        LightsUniform {
            left_headlight: self.spotlight_gpu(left, truck.forward),
            right_headlight: self.spotlight_gpu(right, truck.forward),
            overhead: self.point_light_gpu(),
            view_position: [view_position.x, view_position.y, view_position.z, 1.0],
            material: [self.material_shininess, 0.0, 0.0, 0.0],
        }
    }

    fn spotlight_gpu(&self, position: Vec3, direction: Vec3) -> SpotlightGpu {
        let c = &self.headlights;
        SpotlightGpu {
            position: [position.x, position.y, position.z, 1.0],
            direction: [direction.x, direction.y, direction.z, 0.0],
            ambient: [c.ambient[0], c.ambient[1], c.ambient[2], c.attenuation[0]],
            diffuse: [c.diffuse[0], c.diffuse[1], c.diffuse[2], c.attenuation[1]],
            specular: [c.specular[0], c.specular[1], c.specular[2], c.attenuation[2]],
            cone: [c.cutoff_cos, c.outer_cutoff_cos, 0.0, 0.0],
        }
    }

    fn point_light_gpu(&self) -> PointLightGpu {
        let c = &self.overhead;
        PointLightGpu {
            position: [c.position.x, c.position.y, c.position.z, 1.0],
            ambient: [c.ambient[0], c.ambient[1], c.ambient[2], c.attenuation[0]],
            diffuse: [c.diffuse[0], c.diffuse[1], c.diffuse[2], c.attenuation[1]],
            specular: [c.specular[0], c.specular[1], c.specular[2], c.attenuation[2]],
        }
    }
}

/// Strip translation from a view matrix for the skybox pass, keeping only
/// rotation, and prepend the projection.
pub fn sky_rotation(view: Mat4, proj: Mat4) -> Mat4 {
    let rotation_only = Mat4::from_mat3(glam::Mat3::from_mat4(view));
    proj * rotation_only
}

/// Cone falloff as the scene shader computes it: full inside the inner
/// cutoff, ramped between inner and outer, exactly zero outside.
pub fn cone_intensity(theta_cos: f32, cutoff_cos: f32, outer_cutoff_cos: f32) -> f32 {
    ((theta_cos - outer_cutoff_cos) / (cutoff_cos - outer_cutoff_cos)).clamp(0.0, 1.0)
}

/// Per-channel composite as the composite shader computes it: optional
/// bloom add, exponential tone map, then gamma 2.2.
pub fn composite_channel(hdr: f32, bloom: f32, exposure: f32, bloom_enabled: bool) -> f32 {
    let combined = if bloom_enabled { hdr + bloom } else { hdr };
    let mapped = 1.0 - (-combined * exposure).exp();
    mapped.powf(1.0 / 2.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::DriveIntent;

    #[test]
    fn cone_boundaries() {
        let inner = 25.0f32.to_radians().cos();
        let outer = 40.0f32.to_radians().cos();
        assert_eq!(cone_intensity(inner, inner, outer), 1.0);
        assert_eq!(cone_intensity(outer, inner, outer), 0.0);
        // Outside the outer cone: clamped to zero, never negative.
        assert_eq!(cone_intensity(60.0f32.to_radians().cos(), inner, outer), 0.0);
        // Tighter than the inner cone saturates at one.
        assert_eq!(cone_intensity(1.0, inner, outer), 1.0);
    }

    #[test]
    fn bloom_disabled_contributes_exactly_zero() {
        // Any bright-pass content must vanish, not merely shrink.
        for bloom in [0.0, 0.5, 10.0, 1000.0] {
            let with = composite_channel(0.8, bloom, 1.0, false);
            let without = composite_channel(0.8, 0.0, 1.0, false);
            assert_eq!(with, without);
        }
        assert!(composite_channel(0.8, 1.0, 1.0, true) > composite_channel(0.8, 1.0, 1.0, false));
    }

    #[test]
    fn tone_map_is_exponential() {
        // 1 - exp(-hdr * exposure), gamma applied after.
        let hdr: f32 = 2.0;
        let exposure: f32 = 0.5;
        let expected = (1.0f32 - (-hdr * exposure).exp()).powf(1.0 / 2.2);
        assert!((composite_channel(hdr, 0.0, exposure, false) - expected).abs() < 1e-6);
    }

    #[test]
    fn headlights_ride_the_truck() {
        let lighting = LightingState::new();
        let mut truck = Vehicle::default();
        let before = lighting.derive(&truck, Vec3::ZERO);

        truck.speed = 20.0;
        truck.update(DriveIntent::default(), 0.5);
        let after = lighting.derive(&truck, Vec3::ZERO);

        // Mount points follow the chassis, direction follows the heading.
        assert_ne!(before.left_headlight.position, after.left_headlight.position);
        let dir = after.left_headlight.direction;
        let forward = truck.forward;
        assert!((dir[0] - forward.x).abs() < 1e-6);
        assert!((dir[2] - forward.z).abs() < 1e-6);
        // Both lamps share the heading.
        assert_eq!(after.left_headlight.direction, after.right_headlight.direction);
    }

    #[test]
    fn sky_rotation_drops_translation() {
        let view = Mat4::look_at_rh(Vec3::new(100.0, 5.0, -3.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.5, 0.1, 400.0);
        let stripped = sky_rotation(view, proj);
        let also = sky_rotation(
            Mat4::from_mat3(glam::Mat3::from_mat4(view)),
            proj,
        );
        assert_eq!(stripped, also);
    }
}
