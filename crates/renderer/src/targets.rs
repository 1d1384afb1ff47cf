//! Offscreen render targets for the HDR pipeline.
//!
//! All targets are allocated once at startup, sized to the initial surface,
//! and owned by the [`Renderer`](crate::Renderer). They are never resized;
//! a window resize only reconfigures the presentation surface and the
//! composite pass rescales the fixed-size scene to it.

use crate::texture::Texture;

/// The HDR scene target: two simultaneously written color outputs (full
/// scene color and the bright-pass-eligible color) plus a depth buffer.
pub struct SceneTargets {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub bright: wgpu::Texture,
    pub bright_view: wgpu::TextureView,
    pub depth: Texture,
    pub width: u32,
    pub height: u32,
}

impl SceneTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let color = create_color_target(device, width, height, "HDR Scene Color");
        let bright = create_color_target(device, width, height, "HDR Bright Color");
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let bright_view = bright.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = Texture::create_depth_texture(device, width, height, "Scene Depth");
        Self {
            color,
            color_view,
            bright,
            bright_view,
            depth,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// The two ping-pong targets used alternately as blur source/destination.
pub struct BlurTargets {
    pub textures: [wgpu::Texture; 2],
    pub views: [wgpu::TextureView; 2],
}

impl BlurTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let a = create_color_target(device, width, height, "Blur Ping");
        let b = create_color_target(device, width, height, "Blur Pong");
        let va = a.create_view(&wgpu::TextureViewDescriptor::default());
        let vb = b.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            textures: [a, b],
            views: [va, vb],
        }
    }
}

fn create_color_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    label: &str,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: Texture::HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}

/// Index of the ping-pong target holding the blurred result after
/// `iterations` alternating passes.
///
/// The bright-pass copy lands in target 0; iteration k reads one target and
/// writes the other, starting horizontal. An off-by-one here visibly halves
/// or doubles the blur, so the parity lives in one pure function.
pub fn final_blur_target(iterations: u32) -> usize {
    (iterations % 2) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_parity_matches_pass_trace() {
        // Simulate the loop: copy lands in 0, each iteration writes the
        // other target.
        for iterations in 0..16u32 {
            let mut src = 0usize;
            for _ in 0..iterations {
                src = 1 - src; // write target becomes next read target
            }
            assert_eq!(final_blur_target(iterations), src, "iters={iterations}");
        }
    }

    #[test]
    fn ten_iterations_land_in_ping() {
        // 10 alternating passes starting horizontal: final content sits in
        // target 0 (the `!horizontal` buffer once the loop exits).
        assert_eq!(final_blur_target(10), 0);
    }
}
