use cgmath::{Deg, Vector2, Vector3};
use scene_ngin::{
    camera::{Camera, CameraController, Projection},
    config::Config,
    data_structures::{
        material::{MaterialKind, MaterialTable},
        scene::{STREET_SCENE, World},
    },
    pipelines::light::SceneLights,
    render::{FrameParams, TextureHandle, Uniform, UniformValue, render_world},
};

use crate::common::test_utils::{Call, RecordingDevice, assert_close, assert_vec3_close};

mod common;

struct Fixture {
    device: RecordingDevice,
    world: World,
    materials: MaterialTable,
    lights: SceneLights,
    frame: FrameParams,
}

fn fixture() -> Fixture {
    let config = Config::default();
    let mut device = RecordingDevice::new();
    let world = World::build(&mut device, &STREET_SCENE).unwrap();
    device.clear_calls();

    let camera = Camera::from_config(&config.camera);
    let controller = CameraController::new(&config.camera);
    let projection = Projection::from_config(&config);

    Fixture {
        device,
        world,
        materials: MaterialTable::unbound(),
        lights: SceneLights::default(),
        frame: FrameParams::new(&camera, &controller, &projection),
    }
}

impl Fixture {
    fn render(&mut self) {
        render_world(
            &mut self.device,
            &self.world,
            &self.materials,
            &self.lights,
            &self.frame,
        );
    }
}

#[test]
fn every_entity_is_drawn_once_in_scene_order() {
    let mut f = fixture();
    f.render();

    assert_eq!(f.device.calls.len(), 14 * 14);
    let draws = f.device.draws();
    assert_eq!(draws.len(), 14);
    for (range, desc) in draws.iter().zip(STREET_SCENE.iter()) {
        assert_eq!(*range, 0..desc.shape.vertex_count());
    }

    let states = f.device.draw_states();
    for (state, entity) in states.iter().zip(&f.world.entities) {
        assert_eq!(state.mesh, Some(entity.mesh.handle));
    }
}

#[test]
fn each_draw_is_bracketed_by_bind_and_unbind() {
    let mut f = fixture();
    f.render();

    for (chunk, entity) in f.device.calls.chunks(14).zip(&f.world.entities) {
        assert_eq!(chunk[0], Call::BindMesh(entity.mesh.handle));
        assert!(matches!(chunk[12], Call::Draw(_)));
        assert_eq!(chunk[13], Call::Unbind);
        let uniforms: Vec<Uniform> = chunk
            .iter()
            .filter_map(|call| match call {
                Call::SetUniform(uniform, _) => Some(*uniform),
                _ => None,
            })
            .collect();
        assert_eq!(
            uniforms,
            vec![
                Uniform::Model,
                Uniform::View,
                Uniform::Projection,
                Uniform::LightColor,
                Uniform::LightPosition,
                Uniform::Light2Color,
                Uniform::Light2Position,
                Uniform::ViewPosition,
                Uniform::SpecularIntensity,
                Uniform::UvScale,
            ]
        );
        assert!(matches!(chunk[11], Call::BindTexture(_)));
    }
}

#[test]
fn draws_carry_the_entity_and_frame_matrices() {
    let mut f = fixture();
    f.render();

    for (state, entity) in f.device.draw_states().iter().zip(&f.world.entities) {
        assert_eq!(state.mat4(Uniform::Model), entity.model_matrix());
        assert_eq!(state.mat4(Uniform::View), f.frame.view);
        assert_eq!(
            state.mat4(Uniform::Projection),
            cgmath::perspective(Deg(45.0f32), 800.0f32 / 600.0, 0.1, 100.0)
        );
        assert_vec3_close(state.vec3(Uniform::ViewPosition), Vector3::new(0.0, 0.0, 3.0), "view position");
    }
}

#[test]
fn both_lights_are_uploaded_with_their_brightness() {
    let mut f = fixture();
    f.render();

    for state in f.device.draw_states() {
        assert_vec3_close(state.vec3(Uniform::LightColor), Vector3::new(0.2, 0.2, 0.2), "sky colour");
        assert_vec3_close(state.vec3(Uniform::LightPosition), Vector3::new(10.0, 5.0, 10.0), "sky position");
        assert_vec3_close(state.vec3(Uniform::Light2Color), Vector3::new(0.0, 0.125, 0.5), "bonus colour");
        assert_vec3_close(state.vec3(Uniform::Light2Position), Vector3::new(0.0, 5.0, 0.0), "bonus position");
    }
}

#[test]
fn material_decides_specular_intensity_and_uv_scale() {
    let mut f = fixture();
    f.render();

    for (state, desc) in f.device.draw_states().iter().zip(STREET_SCENE.iter()) {
        assert_close(
            state.float(Uniform::SpecularIntensity),
            desc.material.specular_intensity(),
            desc.name,
        );
        assert_eq!(state.vec2(Uniform::UvScale), Vector2::from(desc.uv_scale));
    }

    let door = STREET_SCENE
        .iter()
        .position(|desc| desc.name == "front door right")
        .unwrap();
    assert_eq!(f.device.draw_states()[door].vec2(Uniform::UvScale), Vector2::new(-1.0, 1.0));
}

#[test]
fn textures_come_from_the_material_table() {
    let mut f = fixture();
    for (i, kind) in MaterialKind::ALL.into_iter().enumerate() {
        if kind != MaterialKind::Glass {
            f.materials.set_texture(kind, TextureHandle(i as u32 + 1));
        }
    }
    f.render();

    for (state, desc) in f.device.draw_states().iter().zip(STREET_SCENE.iter()) {
        let expected = if desc.material == MaterialKind::Glass {
            TextureHandle::UNBOUND
        } else {
            TextureHandle(desc.material.index() as u32 + 1)
        };
        assert_eq!(state.texture, Some(expected), "{}", desc.name);
    }
}

#[test]
fn unloaded_textures_bind_the_unbound_handle() {
    let mut f = fixture();
    f.render();
    assert_eq!(
        f.device.count(|c| *c == Call::BindTexture(TextureHandle::UNBOUND)),
        14
    );
}

#[test]
fn orthographic_frame_uploads_the_ortho_matrix() {
    let config = Config::default();
    let camera = Camera::from_config(&config.camera);
    let mut controller = CameraController::new(&config.camera);
    let mut input = scene_ngin::input::InputState::new();
    input.press(scene_ngin::input::Key::P);
    controller.update(&mut camera.clone(), &mut input, instant::Duration::ZERO);
    assert!(controller.is_orthographic());

    let mut f = fixture();
    f.frame = FrameParams::new(&camera, &controller, &Projection::from_config(&config));
    f.render();

    let ortho = cgmath::ortho(-2.0f32, 2.0, -2.0, 2.0, 0.1, 100.0);
    for state in f.device.draw_states() {
        assert_eq!(state.uniforms[&Uniform::Projection], UniformValue::Mat4(ortho));
    }
}

#[test]
fn rendering_is_repeatable() {
    let mut f = fixture();
    f.render();
    let first = f.device.calls.clone();
    f.device.clear_calls();
    f.render();
    assert_eq!(f.device.calls, first);
}

#[test]
fn an_empty_world_records_nothing() {
    let mut f = fixture();
    let world = std::mem::take(&mut f.world);
    f.render();
    assert!(f.device.calls.is_empty());
    world.destroy(&mut f.device);
}
