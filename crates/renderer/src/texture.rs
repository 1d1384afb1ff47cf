//! Texture creation helpers: depth buffers, default materials, skybox cubemap.

use std::path::Path;

/// A GPU texture with its view and sampler.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Format of every offscreen color target in the HDR pipeline.
    pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

    /// Create a depth texture sized to the offscreen scene target.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Create a 1x1 white texture used as the default material albedo; draws
    /// are tinted through the per-instance color instead.
    pub fn white_pixel(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("White Pixel"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255u8, 255, 255, 255],
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("White Pixel Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Load the skybox cubemap from `dir/{px,nx,py,ny,pz,nz}.png`.
    ///
    /// A face that is missing or fails to decode is logged and replaced with
    /// a procedural gradient; rendering continues with whatever faces loaded.
    pub fn cubemap_from_dir(device: &wgpu::Device, queue: &wgpu::Queue, dir: &Path) -> Self {
        const FACE_SIZE: u32 = 512;
        const FACE_NAMES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Skybox Cubemap"),
            size: wgpu::Extent3d {
                width: FACE_SIZE,
                height: FACE_SIZE,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, name) in FACE_NAMES.iter().enumerate() {
            let path = dir.join(format!("{name}.png"));
            let pixels = match load_face(&path, FACE_SIZE) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Skybox face {:?} unavailable ({}), using gradient", path, e);
                    gradient_face(layer, FACE_SIZE)
                }
            };
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                &pixels,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * FACE_SIZE),
                    rows_per_image: Some(FACE_SIZE),
                },
                wgpu::Extent3d {
                    width: FACE_SIZE,
                    height: FACE_SIZE,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Skybox Cubemap View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Decode one cubemap face to RGBA8 at the expected size.
fn load_face(path: &Path, size: u32) -> Result<Vec<u8>, String> {
    let img = image::open(path).map_err(|e| e.to_string())?;
    let rgba = img.to_rgba8();
    if rgba.width() != size || rgba.height() != size {
        return Err(format!(
            "expected {}x{}, got {}x{}",
            size,
            size,
            rgba.width(),
            rgba.height()
        ));
    }
    Ok(rgba.into_raw())
}

/// Night-sky gradient fallback for a missing cubemap face: dark zenith,
/// slightly lit horizon. Layer order follows wgpu cube faces (+x, -x, +y,
/// -y, +z, -z).
fn gradient_face(layer: usize, size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        // t = 0 at face top, 1 at face bottom
        let t = y as f32 / (size - 1).max(1) as f32;
        let (r, g, b) = match layer {
            2 => (8, 10, 24),       // +y: zenith
            3 => (26, 24, 30),      // -y: below horizon
            _ => {
                // side faces blend zenith -> horizon glow downwards
                let glow = (t * t * 40.0) as u8;
                (8 + glow / 2, 10 + glow / 2, (24 + glow).min(255))
            }
        };
        for _ in 0..size {
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    pixels
}
