//! Scene content: meshes allocated once at startup and the per-frame
//! instance lists that place them.
//!
//! The truck is hand-authored from scaled cubes in the corrected vehicle
//! frame; the spec for each part is its local offset, half-extents and
//! tint. Props are scattered once at startup from a seeded RNG so the
//! layout is stable across runs.

use crate::rig;
use glam::{Mat4, Quat, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use renderer::{InstanceData, Mesh};
use std::f32::consts::FRAC_PI_2;

/// Wall placement: centered ahead of the spawn, stood upright, scaled down
/// from its authored size.
pub const WALL_POSITION: Vec3 = Vec3::new(0.0, 0.0, -25.0);
pub const WALL_SCALE: f32 = 0.1;
pub const WALL_PITCH: f32 = -FRAC_PI_2;

/// Side length of the ground plane.
pub const GROUND_SIZE: f32 = 400.0;

/// Fixed seed for prop scattering.
const PROP_SEED: u64 = 0x6e49;
const PROP_COUNT: usize = 24;

/// One truck part: cube offset and half-extents in the corrected vehicle
/// frame plus an albedo tint.
struct Part {
    offset: Vec3,
    extents: Vec3,
    color: [f32; 4],
}

/// Flatbed truck authored from boxes: chassis deck, cab, two fuel tanks.
/// Headlight housings are positioned separately through the headlight
/// frame so they stay glued to the lamps.
const TRUCK_PARTS: &[Part] = &[
    // Chassis deck
    Part {
        offset: Vec3::new(0.0, 4.0, 2.0),
        extents: Vec3::new(4.5, 1.5, 14.0),
        color: [0.25, 0.28, 0.32, 1.0],
    },
    // Cab
    Part {
        offset: Vec3::new(0.0, 10.0, -14.0),
        extents: Vec3::new(4.0, 4.5, 3.5),
        color: [0.55, 0.12, 0.12, 1.0],
    },
    // Cargo box
    Part {
        offset: Vec3::new(0.0, 9.5, 4.0),
        extents: Vec3::new(4.2, 4.0, 10.0),
        color: [0.7, 0.7, 0.72, 1.0],
    },
    // Fuel tanks
    Part {
        offset: Vec3::new(-4.8, 3.0, -8.0),
        extents: Vec3::new(0.8, 1.0, 2.5),
        color: [0.6, 0.6, 0.62, 1.0],
    },
    Part {
        offset: Vec3::new(4.8, 3.0, -8.0),
        extents: Vec3::new(0.8, 1.0, 2.5),
        color: [0.6, 0.6, 0.62, 1.0],
    },
    // Wheels, front axle then rear pair
    Part {
        offset: Vec3::new(-4.0, 1.8, -13.0),
        extents: Vec3::new(0.9, 1.8, 1.8),
        color: [0.06, 0.06, 0.06, 1.0],
    },
    Part {
        offset: Vec3::new(4.0, 1.8, -13.0),
        extents: Vec3::new(0.9, 1.8, 1.8),
        color: [0.06, 0.06, 0.06, 1.0],
    },
    Part {
        offset: Vec3::new(-4.0, 1.8, 8.0),
        extents: Vec3::new(0.9, 1.8, 1.8),
        color: [0.06, 0.06, 0.06, 1.0],
    },
    Part {
        offset: Vec3::new(4.0, 1.8, 8.0),
        extents: Vec3::new(0.9, 1.8, 1.8),
        color: [0.06, 0.06, 0.06, 1.0],
    },
];

/// Headlight housing half-extents (small box around each lamp mount).
const HOUSING_EXTENTS: Vec3 = Vec3::new(0.9, 0.9, 0.6);
/// Housing tint: emissive-looking warm white, bright enough to bloom.
const HOUSING_COLOR: [f32; 4] = [6.0, 6.0, 5.2, 1.0];

/// A scattered prop (placed once at startup).
#[derive(Debug, Clone, Copy)]
pub struct Prop {
    pub position: Vec3,
    pub rotation_y: f32,
    pub scale: Vec3,
    pub color: [f32; 4],
}

/// All startup-allocated meshes. The per-frame loop only builds instance
/// lists against these; it never allocates GPU resources.
pub struct SceneMeshes {
    pub ground: Mesh,
    pub unit_cube: Mesh,
    pub wall: Mesh,
    pub windshield: Mesh,
}

impl SceneMeshes {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            ground: Mesh::plane(device, GROUND_SIZE),
            unit_cube: Mesh::cube(device),
            // The wall is authored as a large plane lying flat; the fixed
            // pitch in its instance transform stands it up.
            wall: Mesh::plane(device, 600.0),
            windshield: Mesh::quad(device, rig::WINDSHIELD_CORNERS),
        }
    }
}

/// Scatter props around the arena with a fixed seed, keeping the spawn
/// area and the wall line clear.
pub fn scatter_props() -> Vec<Prop> {
    let mut rng = StdRng::seed_from_u64(PROP_SEED);
    let mut props = Vec::with_capacity(PROP_COUNT);
    while props.len() < PROP_COUNT {
        let x = rng.gen_range(-150.0..150.0f32);
        let z = rng.gen_range(-150.0..150.0f32);
        if x.abs() < 25.0 && z.abs() < 40.0 {
            continue; // keep the spawn corridor drivable
        }
        let height = rng.gen_range(1.5..6.0f32);
        let footprint = rng.gen_range(1.5..5.0f32);
        let grey = rng.gen_range(0.3..0.7f32);
        props.push(Prop {
            position: Vec3::new(x, height / 2.0, z),
            rotation_y: rng.gen_range(0.0..std::f32::consts::TAU),
            scale: Vec3::new(footprint, height, footprint),
            color: [grey, grey * 0.95, grey * 0.85, 1.0],
        });
    }
    props
}

/// Ground instance: a single untransformed plane.
pub fn ground_instance() -> InstanceData {
    InstanceData::new(Mat4::IDENTITY.to_cols_array_2d(), [0.12, 0.13, 0.15, 1.0])
}

/// Wall instance: fixed position, stood upright, back face culled at draw
/// time because the plane is single-sided.
pub fn wall_instance() -> InstanceData {
    let model = Mat4::from_translation(WALL_POSITION)
        * Mat4::from_rotation_x(WALL_PITCH)
        * Mat4::from_scale(Vec3::splat(WALL_SCALE));
    InstanceData::new(model.to_cols_array_2d(), [0.45, 0.42, 0.38, 1.0])
}

/// Build the cube instance list for one frame: truck parts and headlight
/// housings riding the vehicle transform chain, plus the static props.
pub fn cube_instances(vehicle_model: Mat4, props: &[Prop]) -> Vec<InstanceData> {
    let frame = rig::vehicle_frame(vehicle_model);
    let mut instances = Vec::with_capacity(TRUCK_PARTS.len() + 2 + props.len());

    for part in TRUCK_PARTS {
        let model = frame * Mat4::from_translation(part.offset) * Mat4::from_scale(part.extents);
        instances.push(InstanceData::new(model.to_cols_array_2d(), part.color));
    }

    // Housings go through the same tilted frame as the light mounts.
    let lamp_frame = rig::headlight_frame(vehicle_model);
    for mount in [rig::HEADLIGHT_MOUNT_LEFT, rig::HEADLIGHT_MOUNT_RIGHT] {
        let model =
            lamp_frame * Mat4::from_translation(mount) * Mat4::from_scale(HOUSING_EXTENTS);
        instances.push(InstanceData::new(model.to_cols_array_2d(), HOUSING_COLOR));
    }

    for prop in props {
        let model = Mat4::from_scale_rotation_translation(
            prop.scale,
            Quat::from_rotation_y(prop.rotation_y),
            prop.position,
        );
        instances.push(InstanceData::new(model.to_cols_array_2d(), prop.color));
    }

    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn props_are_deterministic_and_clear_of_spawn() {
        let a = scatter_props();
        let b = scatter_props();
        assert_eq!(a.len(), PROP_COUNT);
        for (p, q) in a.iter().zip(&b) {
            assert_eq!(p.position, q.position);
            assert!(p.position.x.abs() >= 25.0 || p.position.z.abs() >= 40.0);
        }
    }

    #[test]
    fn truck_instances_follow_the_model_matrix() {
        let props = Vec::new();
        let at_origin = cube_instances(Mat4::IDENTITY, &props);
        let moved = cube_instances(Mat4::from_translation(Vec3::new(50.0, 0.0, 0.0)), &props);
        assert_eq!(at_origin.len(), moved.len());
        let a = Mat4::from_cols_array_2d(&at_origin[0].model).w_axis;
        let b = Mat4::from_cols_array_2d(&moved[0].model).w_axis;
        assert!((b.x - a.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn wall_is_stood_upright() {
        let wall = wall_instance();
        let model = Mat4::from_cols_array_2d(&wall.model);
        // The flat plane's +Y normal must end up horizontal.
        let normal = model.transform_vector3(Vec3::Y).normalize();
        assert!(normal.y.abs() < 1e-5);
    }
}
