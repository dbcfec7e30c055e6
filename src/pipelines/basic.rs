use std::num::NonZeroU64;

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::{
    camera::OPENGL_TO_WGPU_MATRIX,
    data_structures::{
        model::{self, Vertex},
        texture::Texture,
    },
    render::{Uniform, UniformValue},
};

/// Everything the scene shader reads for one draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, keeps normals perpendicular under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// Already converted to wgpu's clip space.
    pub projection: [[f32; 4]; 4],
    pub light_color: [f32; 3],
    pub specular_intensity: f32,
    pub light_position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding0: u32,
    pub light2_color: [f32; 3],
    _padding1: u32,
    pub light2_position: [f32; 3],
    _padding2: u32,
    pub view_position: [f32; 3],
    _padding3: u32,
    pub uv_scale: [f32; 2],
    _padding4: [u32; 2],
}

const _: () = assert!(std::mem::size_of::<ObjectUniform>() == 352);

impl ObjectUniform {
    pub const SIZE: u64 = std::mem::size_of::<ObjectUniform>() as u64;

    pub fn new() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            model: identity,
            normal_matrix: identity,
            view: identity,
            projection: identity,
            uv_scale: [1.0, 1.0],
            ..bytemuck::Zeroable::zeroed()
        }
    }

    /// Stores a named value in its slot. A value of the wrong kind is logged and ignored.
    pub fn set(&mut self, uniform: Uniform, value: UniformValue) {
        match (uniform, value) {
            (Uniform::Model, UniformValue::Mat4(m)) => {
                self.model = m.into();
                let normal = m.invert().unwrap_or(m).transpose();
                self.normal_matrix = normal.into();
            }
            (Uniform::View, UniformValue::Mat4(m)) => self.view = m.into(),
            (Uniform::Projection, UniformValue::Mat4(m)) => {
                self.projection = (OPENGL_TO_WGPU_MATRIX * m).into()
            }
            (Uniform::LightColor, UniformValue::Vec3(v)) => self.light_color = v.into(),
            (Uniform::LightPosition, UniformValue::Vec3(v)) => self.light_position = v.into(),
            (Uniform::Light2Color, UniformValue::Vec3(v)) => self.light2_color = v.into(),
            (Uniform::Light2Position, UniformValue::Vec3(v)) => self.light2_position = v.into(),
            (Uniform::ViewPosition, UniformValue::Vec3(v)) => self.view_position = v.into(),
            (Uniform::SpecularIntensity, UniformValue::Float(f)) => self.specular_intensity = f,
            (Uniform::UvScale, UniformValue::Vec2(v)) => self.uv_scale = v.into(),
            (uniform, value) => {
                log::warn!("Ignoring {value:?} for uniform {}", uniform.name());
            }
        }
    }
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Distance between two draws' uniforms in the per-frame buffer.
pub fn uniform_stride(min_alignment: u32) -> u64 {
    let align = u64::from(min_alignment.max(1));
    ObjectUniform::SIZE.div_ceil(align) * align
}

pub fn object_uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(ObjectUniform::SIZE),
            },
            count: None,
        }],
        label: Some("object_uniform_layout"),
    })
}

pub fn mk_scene_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
    object_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[texture_bind_group_layout, object_bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        color_format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(Texture::DEPTH_FORMAT),
        &[model::ModelVertex::desc()],
        shader,
    )
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Planes are seen from both sides and the vertex tables mix windings.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
