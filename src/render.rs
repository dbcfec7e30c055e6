//! Per-frame scene rendering.
//!
//! This module defines the [`GraphicsDevice`] trait, the narrow interface the renderer uses to
//! talk to the GPU, and [`render_world`], which walks the world once per frame and records a
//! draw for every entity.
//!
//! # Key types
//!
//! - [`MeshHandle`] and [`TextureHandle`] are opaque device resource ids
//! - [`Uniform`] names every per-draw shader input and [`UniformValue`] carries its value
//! - [`FrameParams`] holds the view-dependent matrices computed once per frame
//!

use std::ops::Range;

use cgmath::{EuclideanSpace, Matrix4, Vector2, Vector3};

use crate::{
    camera::{Camera, CameraController, Projection},
    data_structures::{material::MaterialTable, model::ModelVertex, scene::World},
    pipelines::light::SceneLights,
};

/// Id of a vertex buffer created by [`GraphicsDevice::create_mesh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// Id of a texture created by [`GraphicsDevice::create_texture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// No texture. Devices sample it as opaque black.
    pub const UNBOUND: TextureHandle = TextureHandle(0);
}

/// Named inputs of the scene shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Uniform {
    Model,
    View,
    Projection,
    LightColor,
    LightPosition,
    Light2Color,
    Light2Position,
    ViewPosition,
    SpecularIntensity,
    UvScale,
}

impl Uniform {
    /// Name of the uniform in the shader source.
    pub fn name(self) -> &'static str {
        match self {
            Uniform::Model => "model",
            Uniform::View => "view",
            Uniform::Projection => "projection",
            Uniform::LightColor => "lightColor",
            Uniform::LightPosition => "lightPosition",
            Uniform::Light2Color => "light2Color",
            Uniform::Light2Position => "light2Position",
            Uniform::ViewPosition => "viewPosition",
            Uniform::SpecularIntensity => "specularIntensity",
            Uniform::UvScale => "uvScale",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Mat4(Matrix4<f32>),
    Vec3(Vector3<f32>),
    Vec2(Vector2<f32>),
    Float(f32),
}

/// The operations the renderer needs from a GPU.
///
/// Resource creation happens once at startup; the binding and draw calls are issued for every
/// entity of every frame. A uniform keeps its value until it is set again.
pub trait GraphicsDevice {
    fn create_mesh(&mut self, label: &str, vertices: &[ModelVertex]) -> MeshHandle;
    fn destroy_mesh(&mut self, mesh: MeshHandle);
    fn create_texture(&mut self, label: &str, image: &image::DynamicImage) -> anyhow::Result<TextureHandle>;
    fn destroy_texture(&mut self, texture: TextureHandle);

    fn bind_mesh(&mut self, mesh: MeshHandle);
    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue);
    fn bind_texture(&mut self, texture: TextureHandle);
    /// Non-indexed triangle list over `vertices` of the bound mesh.
    fn draw(&mut self, vertices: Range<u32>);
    fn unbind(&mut self);
}

/// View-dependent state shared by every draw of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub camera_position: Vector3<f32>,
}

impl FrameParams {
    pub fn new(camera: &Camera, controller: &CameraController, projection: &Projection) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: projection.calc_matrix(camera.zoom, controller.is_orthographic()),
            camera_position: camera.position.to_vec(),
        }
    }
}

/// Records one draw per entity, in world order.
pub fn render_world<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    world: &World,
    materials: &MaterialTable,
    lights: &SceneLights,
    frame: &FrameParams,
) {
    for entity in &world.entities {
        device.bind_mesh(entity.mesh.handle);

        device.set_uniform(Uniform::Model, UniformValue::Mat4(entity.model_matrix()));
        device.set_uniform(Uniform::View, UniformValue::Mat4(frame.view));
        device.set_uniform(Uniform::Projection, UniformValue::Mat4(frame.projection));

        device.set_uniform(Uniform::LightColor, UniformValue::Vec3(lights.sky.effective_color()));
        device.set_uniform(Uniform::LightPosition, UniformValue::Vec3(lights.sky.position));
        device.set_uniform(Uniform::Light2Color, UniformValue::Vec3(lights.bonus.effective_color()));
        device.set_uniform(Uniform::Light2Position, UniformValue::Vec3(lights.bonus.position));
        device.set_uniform(Uniform::ViewPosition, UniformValue::Vec3(frame.camera_position));

        device.set_uniform(
            Uniform::SpecularIntensity,
            UniformValue::Float(entity.material.specular_intensity()),
        );
        device.set_uniform(Uniform::UvScale, UniformValue::Vec2(entity.uv_scale));
        device.bind_texture(materials.texture(entity.material));

        device.draw(0..entity.mesh.num_vertices);
        device.unbind();
    }
}
