//! Point lights and the Phong model the scene shader implements.
//!
//! [`phong`] and [`shade`] compute on the CPU what `scene.wgsl` computes per fragment, so the
//! lighting can be checked without a GPU.

use cgmath::{InnerSpace, Vector3};

pub const AMBIENT_STRENGTH: f32 = 0.25;
pub const SHININESS: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
    pub brightness: f32,
}

impl LightSource {
    pub fn new(position: Vector3<f32>, color: Vector3<f32>, brightness: f32) -> Self {
        Self {
            position,
            color,
            brightness,
        }
    }

    /// Colour as uploaded to the shader.
    pub fn effective_color(&self) -> Vector3<f32> {
        self.color * self.brightness
    }
}

/// The two lights of the street: a dim white sky light and a blue fill light above the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLights {
    pub sky: LightSource,
    pub bonus: LightSource,
}

impl Default for SceneLights {
    fn default() -> Self {
        Self {
            sky: LightSource::new(Vector3::new(10.0, 5.0, 10.0), Vector3::new(1.0, 1.0, 1.0), 0.2),
            bonus: LightSource::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, 0.25, 1.0), 0.5),
        }
    }
}

fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Ambient + diffuse + specular contribution of one light at a fragment.
pub fn phong(
    normal: Vector3<f32>,
    frag_position: Vector3<f32>,
    light_position: Vector3<f32>,
    light_color: Vector3<f32>,
    view_position: Vector3<f32>,
    specular_intensity: f32,
) -> Vector3<f32> {
    let ambient = light_color * AMBIENT_STRENGTH;

    let norm = normal.normalize();
    let light_dir = (light_position - frag_position).normalize();
    let diffuse = light_color * norm.dot(light_dir).max(0.0);

    let view_dir = (view_position - frag_position).normalize();
    let reflect_dir = reflect(-light_dir, norm);
    let spec = view_dir.dot(reflect_dir).max(0.0).powf(SHININESS);
    let specular = light_color * (specular_intensity * spec);

    ambient + diffuse + specular
}

/// Final fragment colour: the texel modulated by both lights.
pub fn shade(
    texel: Vector3<f32>,
    normal: Vector3<f32>,
    frag_position: Vector3<f32>,
    lights: &SceneLights,
    view_position: Vector3<f32>,
    specular_intensity: f32,
) -> Vector3<f32> {
    let light = |source: &LightSource| {
        phong(
            normal,
            frag_position,
            source.position,
            source.effective_color(),
            view_position,
            specular_intensity,
        )
    };
    let total = light(&lights.sky) + light(&lights.bonus);
    Vector3::new(texel.x * total.x, texel.y * total.y, texel.z * total.z)
}
