//! Mesh data structures and primitive generation.

use crate::vertex::Vertex;
use glam::Vec3;
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    /// Create a unit cube centered at origin.
    pub fn cube(device: &wgpu::Device) -> Self {
        let vertices = [
            // Front face
            Vertex::new([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 0.0]),
            // Back face
            Vertex::new([0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 1.0]),
            Vertex::new([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 1.0]),
            Vertex::new([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 0.0]),
            Vertex::new([0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 0.0]),
            // Top face
            Vertex::new([-0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [0.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [1.0, 1.0]),
            Vertex::new([0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [0.0, 0.0]),
            // Bottom face
            Vertex::new([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [0.0, 1.0]),
            Vertex::new([0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [1.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [1.0, 0.0]),
            Vertex::new([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [0.0, 0.0]),
            // Right face
            Vertex::new([0.5, -0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 1.0]),
            Vertex::new([0.5, -0.5, -0.5], [1.0, 0.0, 0.0], [1.0, 1.0]),
            Vertex::new([0.5, 0.5, -0.5], [1.0, 0.0, 0.0], [1.0, 0.0]),
            Vertex::new([0.5, 0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 0.0]),
            // Left face
            Vertex::new([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 1.0]),
            Vertex::new([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0], [1.0, 1.0]),
            Vertex::new([-0.5, 0.5, 0.5], [-1.0, 0.0, 0.0], [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        ];

        #[rustfmt::skip]
        let indices: [u32; 36] = [
            0, 1, 2, 2, 3, 0,       // Front
            4, 5, 6, 6, 7, 4,       // Back
            8, 9, 10, 10, 11, 8,   // Top
            12, 13, 14, 14, 15, 12, // Bottom
            16, 17, 18, 18, 19, 16, // Right
            20, 21, 22, 22, 23, 20, // Left
        ];

        Self::new(device, &vertices, &indices)
    }

    /// Create a ground plane.
    pub fn plane(device: &wgpu::Device, size: f32) -> Self {
        let half = size / 2.0;
        let vertices = [
            Vertex::new([-half, 0.0, half], [0.0, 1.0, 0.0], [0.0, 0.0]),
            Vertex::new([half, 0.0, half], [0.0, 1.0, 0.0], [1.0, 0.0]),
            Vertex::new([half, 0.0, -half], [0.0, 1.0, 0.0], [1.0, 1.0]),
            Vertex::new([-half, 0.0, -half], [0.0, 1.0, 0.0], [0.0, 1.0]),
        ];

        let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];

        Self::new(device, &vertices, &indices)
    }

    /// Create a single quadrilateral from four corner positions, ordered
    /// bottom-left, bottom-right, top-right, top-left. The normal is taken
    /// from the first three corners.
    pub fn quad(device: &wgpu::Device, corners: [Vec3; 4]) -> Self {
        let normal = (corners[1] - corners[0])
            .cross(corners[3] - corners[0])
            .normalize_or_zero()
            .to_array();
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        let vertices: Vec<Vertex> = corners
            .iter()
            .zip(uvs)
            .map(|(c, uv)| Vertex::new(c.to_array(), normal, uv))
            .collect();

        let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];

        Self::new(device, &vertices, &indices)
    }
}
