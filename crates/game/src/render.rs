//! Per-frame render orchestration. Phase order is fixed: sky, opaque
//! geometry, wall (culled variant), windshield, bloom chain, composite.
//! Reordering any phase changes visible output.

use crate::camera_rig::CameraMode;
use crate::{lights, rig, scene, GameState};
use anyhow::Result;

/// Run all render passes. Called from `GameState::render()`.
pub fn run(state: &mut GameState) -> Result<()> {
    let (output, mut encoder) = state.renderer.begin_frame()?;
    let output_view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let aspect = state.renderer.scene_aspect();
    let (view, proj, eye) = match state.camera_mode {
        CameraMode::WorldFree => {
            state.camera.aspect = aspect;
            (
                state.camera.view_matrix(),
                state.camera.projection_matrix(),
                state.camera.position(),
            )
        }
        CameraMode::VehicleChase => {
            let proj = glam::Mat4::perspective_rh(
                state.chase_camera.fov_degrees.to_radians(),
                aspect,
                state.camera.near,
                state.camera.far,
            );
            (state.chase_camera.view_matrix(), proj, state.chase_camera.position)
        }
    };

    let vehicle_model = state.truck.model_matrix();

    state.renderer.update_camera(view, proj, eye);
    state
        .renderer
        .update_lights(&state.lighting.derive(&state.truck, eye));
    state.renderer.update_sky(lights::sky_rotation(view, proj));
    state
        .renderer
        .update_windshield(rig::vehicle_frame(vehicle_model), rig::WINDSHIELD_TINT);
    state
        .renderer
        .update_composite(state.bloom.exposure, state.bloom.enabled);

    // HDR phase
    state.renderer.render_sky(&mut encoder);
    state
        .renderer
        .render_scene(&mut encoder, &state.meshes.ground, &[scene::ground_instance()], false);
    let cubes = scene::cube_instances(vehicle_model, &state.props);
    state
        .renderer
        .render_scene(&mut encoder, &state.meshes.unit_cube, &cubes, false);
    // The wall mesh is single-sided; its draw is the only one with back
    // faces culled.
    state
        .renderer
        .render_scene(&mut encoder, &state.meshes.wall, &[scene::wall_instance()], true);
    state
        .renderer
        .render_windshield(&mut encoder, &state.meshes.windshield);

    // Post phase
    state.renderer.run_bloom_passes(&mut encoder);
    state.renderer.run_composite_pass(&mut encoder, &output_view);

    state.renderer.queue.submit(std::iter::once(encoder.finish()));
    output.present();
    Ok(())
}
