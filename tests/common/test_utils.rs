use std::{
    collections::HashMap,
    ops::Range,
    path::{Path, PathBuf},
};

use scene_ngin::{
    data_structures::model::ModelVertex,
    render::{GraphicsDevice, MeshHandle, TextureHandle, Uniform, UniformValue},
};

/// One call made on a [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateMesh { label: String, vertices: usize },
    DestroyMesh(MeshHandle),
    CreateTexture { label: String, width: u32, height: u32 },
    DestroyTexture(TextureHandle),
    BindMesh(MeshHandle),
    SetUniform(Uniform, UniformValue),
    BindTexture(TextureHandle),
    Draw(Range<u32>),
    Unbind,
}

/// A [`GraphicsDevice`] that records every call instead of talking to a GPU.
#[derive(Debug, Default)]
pub(crate) struct RecordingDevice {
    pub(crate) calls: Vec<Call>,
    pub(crate) meshes: Vec<Vec<ModelVertex>>,
    pub(crate) textures: Vec<image::DynamicImage>,
    /// Labels of textures whose upload fails.
    pub(crate) rejected_textures: Vec<String>,
}

#[allow(dead_code)]
impl RecordingDevice {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn draws(&self) -> Vec<Range<u32>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Draw(range) => Some(range.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }

    /// The uniforms, mesh and texture in effect for every draw, in draw order.
    pub(crate) fn draw_states(&self) -> Vec<DrawState> {
        let mut states = Vec::new();
        let mut current = DrawState::default();
        for call in &self.calls {
            match call {
                Call::BindMesh(mesh) => current.mesh = Some(*mesh),
                Call::BindTexture(texture) => current.texture = Some(*texture),
                Call::SetUniform(uniform, value) => {
                    current.uniforms.insert(*uniform, *value);
                }
                Call::Draw(range) => {
                    current.vertices = range.clone();
                    states.push(current.clone());
                }
                Call::Unbind => {
                    current.mesh = None;
                    current.texture = None;
                }
                _ => (),
            }
        }
        states
    }

    pub(crate) fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_mesh(&mut self, label: &str, vertices: &[ModelVertex]) -> MeshHandle {
        self.calls.push(Call::CreateMesh {
            label: label.to_string(),
            vertices: vertices.len(),
        });
        self.meshes.push(vertices.to_vec());
        MeshHandle(self.meshes.len() - 1)
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        self.calls.push(Call::DestroyMesh(mesh));
    }

    fn create_texture(
        &mut self,
        label: &str,
        image: &image::DynamicImage,
    ) -> anyhow::Result<TextureHandle> {
        if self.rejected_textures.iter().any(|rejected| rejected == label) {
            anyhow::bail!("{label} rejected by the test device");
        }
        self.calls.push(Call::CreateTexture {
            label: label.to_string(),
            width: image.width(),
            height: image.height(),
        });
        self.textures.push(image.clone());
        Ok(TextureHandle(self.textures.len() as u32))
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::DestroyTexture(texture));
    }

    fn bind_mesh(&mut self, mesh: MeshHandle) {
        self.calls.push(Call::BindMesh(mesh));
    }

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        self.calls.push(Call::SetUniform(uniform, value));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::BindTexture(texture));
    }

    fn draw(&mut self, vertices: Range<u32>) {
        self.calls.push(Call::Draw(vertices));
    }

    fn unbind(&mut self) {
        self.calls.push(Call::Unbind);
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct DrawState {
    pub(crate) mesh: Option<MeshHandle>,
    pub(crate) texture: Option<TextureHandle>,
    pub(crate) uniforms: HashMap<Uniform, UniformValue>,
    pub(crate) vertices: Range<u32>,
}

#[allow(dead_code)]
impl DrawState {
    pub(crate) fn mat4(&self, uniform: Uniform) -> cgmath::Matrix4<f32> {
        match self.uniforms.get(&uniform) {
            Some(UniformValue::Mat4(m)) => *m,
            other => panic!("{uniform:?} is not a matrix: {other:?}"),
        }
    }

    pub(crate) fn vec3(&self, uniform: Uniform) -> cgmath::Vector3<f32> {
        match self.uniforms.get(&uniform) {
            Some(UniformValue::Vec3(v)) => *v,
            other => panic!("{uniform:?} is not a 3-vector: {other:?}"),
        }
    }

    pub(crate) fn vec2(&self, uniform: Uniform) -> cgmath::Vector2<f32> {
        match self.uniforms.get(&uniform) {
            Some(UniformValue::Vec2(v)) => *v,
            other => panic!("{uniform:?} is not a 2-vector: {other:?}"),
        }
    }

    pub(crate) fn float(&self, uniform: Uniform) -> f32 {
        match self.uniforms.get(&uniform) {
            Some(UniformValue::Float(f)) => *f,
            other => panic!("{uniform:?} is not a float: {other:?}"),
        }
    }
}

#[allow(dead_code)]
pub(crate) fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "{what}: expected {expected}, got {actual}"
    );
}

#[allow(dead_code)]
pub(crate) fn assert_vec3_close(actual: cgmath::Vector3<f32>, expected: cgmath::Vector3<f32>, what: &str) {
    assert_close(actual.x, expected.x, &format!("{what}.x"));
    assert_close(actual.y, expected.y, &format!("{what}.y"));
    assert_close(actual.z, expected.z, &format!("{what}.z"));
}

/// A fresh, empty directory below the system temp dir.
#[allow(dead_code)]
pub(crate) fn temp_asset_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scene-ngin-{name}-{}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("failed to clear temp dir");
    }
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

/// Writes a 2x2 RGBA PNG whose top row is `top` and bottom row is `bottom`.
#[allow(dead_code)]
pub(crate) fn write_two_row_png(dir: &Path, file_name: &str, top: [u8; 4], bottom: [u8; 4]) {
    let img = image::RgbaImage::from_fn(2, 2, |_, y| {
        if y == 0 {
            image::Rgba(top)
        } else {
            image::Rgba(bottom)
        }
    });
    img.save(dir.join(file_name)).expect("failed to write png");
}
