//! Main renderer managing wgpu state and the HDR render chain.
//!
//! Frame order is fixed: sky (clears the HDR targets), lit scene geometry,
//! the transparent windshield, then bloom (bright copy + ping-pong blur)
//! and the tone-mapping composite onto the swap chain.

use crate::{
    camera::CameraUniform,
    mesh::Mesh,
    pipeline::{
        create_blur_bind_group_layout,
        create_blur_pipeline,
        create_bright_bind_group_layout,
        create_bright_pipeline,
        create_camera_bind_group_layout,
        create_composite_bind_group_layout,
        create_composite_pipeline,
        create_lights_bind_group_layout,
        create_material_bind_group_layout,
        create_scene_pipeline,
        create_sky_bind_group_layout,
        create_sky_pipeline,
        create_windshield_bind_group_layout,
        create_windshield_pipeline,
    },
    targets::{final_blur_target, BlurTargets, SceneTargets},
    texture::Texture,
    vertex::InstanceData,
};
use bytemuck::{Pod, Zeroable};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Number of alternating Gaussian blur passes run on the bright target.
pub const BLUR_ITERATIONS: u32 = 10;

/// Renderer initialization and per-frame failures.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("failed to acquire surface frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// One spotlight as the scene shader consumes it (must match scene.wgsl
/// Spotlight). Attenuation coefficients ride in the color alphas.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpotlightGpu {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    /// rgb = ambient color, w = constant attenuation
    pub ambient: [f32; 4],
    /// rgb = diffuse color, w = linear attenuation
    pub diffuse: [f32; 4],
    /// rgb = specular color, w = quadratic attenuation
    pub specular: [f32; 4],
    /// x = inner cutoff cosine, y = outer cutoff cosine
    pub cone: [f32; 4],
}

/// One point light as the scene shader consumes it (must match scene.wgsl
/// PointLight).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PointLightGpu {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

/// All lights for the lit pass (must match scene.wgsl LightsUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightsUniform {
    pub left_headlight: SpotlightGpu,
    pub right_headlight: SpotlightGpu,
    pub overhead: PointLightGpu,
    pub view_position: [f32; 4],
    /// x = material shininess
    pub material: [f32; 4],
}

/// Sky shader uniform (must match sky.wgsl SkyUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SkyUniform {
    /// projection * rotation-only view
    pub rot_view_proj: [[f32; 4]; 4],
}

/// Windshield shader uniform (must match windshield.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct WindshieldUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Composite shader uniform (must match composite.wgsl CompositeUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CompositeUniform {
    /// x = exposure, y = bloom enabled (0 or 1)
    pub params: [f32; 4],
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    /// Background color used when clearing the HDR scene target.
    pub clear_color: wgpu::Color,

    // Offscreen targets. Allocated once at startup and never resized; a
    // window resize only reconfigures the surface and the composite pass
    // rescales to it.
    scene_targets: SceneTargets,
    blur_targets: BlurTargets,

    // Pipelines
    scene_pipeline: wgpu::RenderPipeline,
    wall_pipeline: wgpu::RenderPipeline,
    sky_pipeline: wgpu::RenderPipeline,
    windshield_pipeline: wgpu::RenderPipeline,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    // Bind groups and uniform buffers
    camera_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,
    lights_bind_group: wgpu::BindGroup,
    lights_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    sky_bind_group: wgpu::BindGroup,
    sky_buffer: wgpu::Buffer,
    windshield_bind_group: wgpu::BindGroup,
    windshield_buffer: wgpu::Buffer,
    composite_buffer: wgpu::Buffer,

    // Post-process bind groups. The offscreen targets are fixed-size so
    // these can be built once instead of per frame.
    bright_bind_group: wgpu::BindGroup,
    blur_bind_group_h: wgpu::BindGroup,
    blur_bind_group_v: wgpu::BindGroup,
    composite_bind_group: wgpu::BindGroup,

    /// Inward-facing cube for the skybox pass.
    sky_mesh: Mesh,

    // Instance buffer for batched rendering
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    /// Tracks current write offset into instance_buffer per frame.
    /// Each render pass writes to a unique region so `queue.write_buffer`
    /// calls don't overwrite each other (all writes execute before the
    /// command buffer).
    frame_instance_offset: u32,
}

impl Renderer {
    /// Create a new renderer for the given window. `sky_dir` holds the six
    /// cubemap face images (a procedural fallback is used if they are
    /// missing).
    pub async fn new(window: Arc<Window>, sky_dir: &Path) -> Result<Self, RendererError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Prefer a non-sRGB surface: the composite shader applies gamma
        // itself, and an sRGB swap chain would correct a second time.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = surface_caps
            .present_modes
            .iter()
            .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
            .copied()
            .unwrap_or(wgpu::PresentMode::AutoVsync);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let scene_targets = SceneTargets::new(&device, config.width, config.height);
        let blur_targets = BlurTargets::new(&device, config.width, config.height);

        // Camera
        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Lights
        let lights_bind_group_layout = create_lights_bind_group_layout(&device);
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[LightsUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lights Bind Group"),
            layout: &lights_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: lights_buffer.as_entire_binding(),
            }],
        });

        // Default white material; instance colors carry the actual tint.
        let material_bind_group_layout = create_material_bind_group_layout(&device);
        let white = Texture::white_pixel(&device, &queue);
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&white.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&white.sampler),
                },
            ],
        });

        // Sky
        let sky_bind_group_layout = create_sky_bind_group_layout(&device);
        let sky_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sky Buffer"),
            contents: bytemuck::cast_slice(&[SkyUniform {
                rot_view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sky_cubemap = Texture::cubemap_from_dir(&device, &queue, sky_dir);
        let sky_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sky Bind Group"),
            layout: &sky_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: sky_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sky_cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sky_cubemap.sampler),
                },
            ],
        });
        let sky_mesh = Mesh::cube(&device);

        // Windshield
        let windshield_bind_group_layout = create_windshield_bind_group_layout(&device);
        let windshield_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Windshield Buffer"),
            contents: bytemuck::cast_slice(&[WindshieldUniform {
                model: glam::Mat4::IDENTITY.to_cols_array_2d(),
                color: [1.0, 1.0, 1.0, 1.0],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let windshield_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Windshield Bind Group"),
            layout: &windshield_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: windshield_buffer.as_entire_binding(),
            }],
        });

        // Pipelines
        let scene_pipeline = create_scene_pipeline(
            &device,
            &camera_bind_group_layout,
            &lights_bind_group_layout,
            &material_bind_group_layout,
            false,
        );
        let wall_pipeline = create_scene_pipeline(
            &device,
            &camera_bind_group_layout,
            &lights_bind_group_layout,
            &material_bind_group_layout,
            true,
        );
        let sky_pipeline = create_sky_pipeline(&device, &sky_bind_group_layout);
        let windshield_pipeline = create_windshield_pipeline(
            &device,
            &camera_bind_group_layout,
            &windshield_bind_group_layout,
        );

        // Post-process chain
        let post_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bright_bind_group_layout = create_bright_bind_group_layout(&device);
        let bright_pipeline = create_bright_pipeline(&device, &bright_bind_group_layout);
        let bright_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bright Bind Group"),
            layout: &bright_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&scene_targets.bright_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&post_sampler),
                },
            ],
        });

        let blur_bind_group_layout = create_blur_bind_group_layout(&device);
        let blur_pipeline = create_blur_pipeline(&device, &blur_bind_group_layout);
        let blur_h: [f32; 4] = [1.0, 0.0, 0.0, 0.0];
        let blur_v: [f32; 4] = [0.0, 1.0, 0.0, 0.0];
        let blur_uniform_h = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Blur Uniform H"),
            contents: bytemuck::cast_slice(&blur_h),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let blur_uniform_v = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Blur Uniform V"),
            contents: bytemuck::cast_slice(&blur_v),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        // Horizontal passes read ping (0), vertical passes read pong (1).
        let blur_bind_group_h = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blur Bind Group H"),
            layout: &blur_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&blur_targets.views[0]),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&post_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: blur_uniform_h.as_entire_binding(),
                },
            ],
        });
        let blur_bind_group_v = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blur Bind Group V"),
            layout: &blur_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&blur_targets.views[1]),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&post_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: blur_uniform_v.as_entire_binding(),
                },
            ],
        });

        let composite_bind_group_layout = create_composite_bind_group_layout(&device);
        let composite_pipeline =
            create_composite_pipeline(&device, &composite_bind_group_layout, config.format);
        let composite_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Composite Buffer"),
            contents: bytemuck::cast_slice(&[CompositeUniform {
                params: [1.0, 1.0, 0.0, 0.0],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let composite_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout: &composite_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&scene_targets.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(
                        &blur_targets.views[final_blur_target(BLUR_ITERATIONS)],
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&post_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: composite_buffer.as_entire_binding(),
                },
            ],
        });

        // Instance buffer (truck chassis + housings + props + ground)
        let max_instances = 1024u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (std::mem::size_of::<InstanceData>() * max_instances as usize) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            clear_color: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.1,
                a: 1.0,
            },
            scene_targets,
            blur_targets,
            scene_pipeline,
            wall_pipeline,
            sky_pipeline,
            windshield_pipeline,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            camera_bind_group,
            camera_buffer,
            camera_uniform,
            lights_bind_group,
            lights_buffer,
            material_bind_group,
            sky_bind_group,
            sky_buffer,
            windshield_bind_group,
            windshield_buffer,
            composite_buffer,
            bright_bind_group,
            blur_bind_group_h,
            blur_bind_group_v,
            composite_bind_group,
            sky_mesh,
            instance_buffer,
            max_instances,
            frame_instance_offset: 0,
        })
    }

    /// Aspect ratio of the fixed-size HDR scene target, which is what the
    /// projection matrix must match.
    pub fn scene_aspect(&self) -> f32 {
        self.scene_targets.aspect()
    }

    /// Handle window resize. Only the presentation surface follows the
    /// window; the offscreen targets keep their startup size.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Update camera uniform from this frame's view/projection matrices.
    pub fn update_camera(&mut self, view: glam::Mat4, proj: glam::Mat4, position: glam::Vec3) {
        self.camera_uniform.set_matrices(view, proj, position);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Upload this frame's light set.
    pub fn update_lights(&mut self, lights: &LightsUniform) {
        self.queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::cast_slice(&[*lights]));
    }

    /// Upload the sky rotation (projection * translation-stripped view).
    pub fn update_sky(&mut self, rot_view_proj: glam::Mat4) {
        let uniform = SkyUniform {
            rot_view_proj: rot_view_proj.to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.sky_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload the windshield model matrix and tint.
    pub fn update_windshield(&mut self, model: glam::Mat4, color: [f32; 4]) {
        let uniform = WindshieldUniform {
            model: model.to_cols_array_2d(),
            color,
        };
        self.queue
            .write_buffer(&self.windshield_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload tone-mapping parameters.
    pub fn update_composite(&mut self, exposure: f32, bloom_enabled: bool) {
        let uniform = CompositeUniform {
            params: [exposure, if bloom_enabled { 1.0 } else { 0.0 }, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.composite_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Begin a new frame, returns the surface texture and command encoder.
    pub fn begin_frame(&mut self) -> Result<(wgpu::SurfaceTexture, wgpu::CommandEncoder), RendererError> {
        self.frame_instance_offset = 0;
        let output = self.surface.get_current_texture()?;
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        Ok((output, encoder))
    }

    /// Render the skybox. This is the first HDR pass of the frame: it
    /// clears both scene color targets and the depth buffer.
    pub fn render_sky(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sky Pass"),
            color_attachments: &[
                Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_targets.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                }),
                Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_targets.bright_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                }),
            ],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.scene_targets.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.sky_pipeline);
        pass.set_bind_group(0, &self.sky_bind_group, &[]);
        pass.set_vertex_buffer(0, self.sky_mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(self.sky_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.sky_mesh.num_indices, 0, 0..1);
    }

    /// Render lit instanced geometry into the HDR targets, preserving what
    /// earlier passes drew. `cull_back` picks the back-face-culled pipeline
    /// variant (used for the wall so its reverse side vanishes).
    pub fn render_scene(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        mesh: &Mesh,
        instances: &[InstanceData],
        cull_back: bool,
    ) {
        if instances.is_empty() {
            return;
        }

        // Allocate a unique region in the instance buffer for this draw call
        let offset = self.frame_instance_offset;
        let remaining = self.max_instances.saturating_sub(offset) as usize;
        let instance_count = instances.len().min(remaining);
        if instance_count == 0 {
            return;
        }

        let byte_offset = (offset as usize * std::mem::size_of::<InstanceData>()) as u64;
        self.queue.write_buffer(
            &self.instance_buffer,
            byte_offset,
            bytemuck::cast_slice(&instances[..instance_count]),
        );
        self.frame_instance_offset = offset + instance_count as u32;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[
                Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_targets.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                }),
                Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_targets.bright_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                }),
            ],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.scene_targets.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(if cull_back {
            &self.wall_pipeline
        } else {
            &self.scene_pipeline
        });
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, &self.lights_bind_group, &[]);
        pass.set_bind_group(2, &self.material_bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.num_indices, 0, offset..(offset + instance_count as u32));
    }

    /// Render the transparent windshield over the opaque scene. Draws last
    /// in the HDR phase so blending sees the finished scene behind it.
    pub fn render_windshield(&self, encoder: &mut wgpu::CommandEncoder, mesh: &Mesh) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Windshield Pass"),
            color_attachments: &[
                Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_targets.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                }),
                Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_targets.bright_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                }),
            ],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.scene_targets.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.windshield_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, &self.windshield_bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
    }

    /// Run the bloom chain: copy the bright target into ping, then
    /// [`BLUR_ITERATIONS`] alternating Gaussian passes. The composite bind
    /// group already points at the target the final pass writes.
    pub fn run_bloom_passes(&self, encoder: &mut wgpu::CommandEncoder) {
        // Bright copy: scene bright target -> ping
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Bright Copy Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.blur_targets.views[0],
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.bright_pipeline);
        pass.set_bind_group(0, &self.bright_bind_group, &[]);
        pass.draw(0..3, 0..1);
        drop(pass);

        // Alternating blur: even iterations blur horizontally ping -> pong,
        // odd iterations vertically pong -> ping.
        for i in 0..BLUR_ITERATIONS {
            let horizontal = i % 2 == 0;
            let (bind_group, dst) = if horizontal {
                (&self.blur_bind_group_h, &self.blur_targets.views[1])
            } else {
                (&self.blur_bind_group_v, &self.blur_targets.views[0])
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blur Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: dst,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }

    /// Run the tone-mapping composite: HDR scene + blurred bloom ->
    /// swap-chain output, exposure mapping and gamma in one pass.
    pub fn run_composite_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Composite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.composite_pipeline);
        pass.set_bind_group(0, &self.composite_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
