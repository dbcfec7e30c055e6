//! Vertex format and the device-side mesh.

use anyhow::ensure;

use crate::render::{GraphicsDevice, MeshHandle};

/// Floats per vertex: position (3), normal (3), texture coordinates (2).
pub const FLOATS_PER_VERTEX: usize = 8;

/// Size of one packed vertex in bytes.
pub const VERTEX_SIZE: usize = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<ModelVertex>() == VERTEX_SIZE);

impl ModelVertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }
}

/**
 * The buffer is densely packed without an index buffer: every triangle owns its three
 * vertices, so `array_stride` is the whole vertex and the attributes follow each other.
 */
impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// A flat triangle list living on the graphics device.
#[derive(Debug, PartialEq, Eq)]
pub struct Mesh {
    pub handle: MeshHandle,
    pub num_vertices: u32,
    pub byte_size: u64,
}

impl Mesh {
    /// Uploads `vertices` after checking they are exactly `expected_vertices` vertices of
    /// eight floats each.
    pub fn new<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        label: &str,
        vertices: &[ModelVertex],
        expected_vertices: u32,
    ) -> anyhow::Result<Self> {
        let floats: &[f32] = bytemuck::cast_slice(vertices);
        let contents: &[u8] = bytemuck::cast_slice(vertices);
        let expected = expected_vertices as usize;
        ensure!(
            expected % 3 == 0,
            "{label}: {expected} vertices do not form a triangle list"
        );
        ensure!(
            floats.len() == expected * FLOATS_PER_VERTEX,
            "{label}: buffer of {} floats does not hold {expected} vertices of {FLOATS_PER_VERTEX} floats",
            floats.len()
        );
        ensure!(
            contents.len() == expected * VERTEX_SIZE,
            "{label}: buffer of {} bytes does not hold {expected} vertices of {VERTEX_SIZE} bytes",
            contents.len()
        );

        let handle = device.create_mesh(label, vertices);
        Ok(Self {
            handle,
            num_vertices: expected_vertices,
            byte_size: contents.len() as u64,
        })
    }

    pub fn destroy<D: GraphicsDevice + ?Sized>(self, device: &mut D) {
        device.destroy_mesh(self.handle);
    }
}
