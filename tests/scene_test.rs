use cgmath::{Point3, Transform as _, Vector3};
use scene_ngin::data_structures::{
    material::MaterialKind,
    scene::{EntityDesc, PrimitiveShape, STREET_SCENE, World},
    transform::Transform,
};

use crate::common::test_utils::{Call, RecordingDevice, assert_vec3_close};

mod common;

fn apply(transform: &Transform, point: [f32; 3]) -> Vector3<f32> {
    let p = transform.to_matrix().transform_point(Point3::from(point));
    Vector3::new(p.x, p.y, p.z)
}

#[test]
fn street_world_has_fourteen_entities() {
    let mut device = RecordingDevice::new();
    let world = World::build(&mut device, &STREET_SCENE).unwrap();

    assert_eq!(world.len(), 14);
    assert_eq!(world.count_shape(PrimitiveShape::Box), 6);
    assert_eq!(world.count_shape(PrimitiveShape::Plane), 4);
    assert_eq!(world.count_shape(PrimitiveShape::Wedge), 3);
    assert_eq!(world.count_shape(PrimitiveShape::Ring), 1);
    assert_eq!(device.count(|c| matches!(c, Call::CreateMesh { .. })), 14);
}

#[test]
fn entities_keep_scene_order_and_mesh_sizes() {
    let mut device = RecordingDevice::new();
    let world = World::build(&mut device, &STREET_SCENE).unwrap();

    for (entity, desc) in world.entities.iter().zip(STREET_SCENE.iter()) {
        assert_eq!(entity.name, desc.name);
        assert_eq!(entity.shape, desc.shape);
        assert_eq!(entity.material, desc.material);
        assert_eq!(entity.mesh.num_vertices, desc.shape.vertex_count());
        assert_eq!(entity.model_matrix(), desc.transform().to_matrix());
        assert_eq!(
            device.meshes[entity.mesh.handle.0].len(),
            desc.shape.vertex_count() as usize
        );
    }
}

#[test]
fn only_the_garbage_can_is_a_ring() {
    let rings: Vec<_> = STREET_SCENE
        .iter()
        .filter(|desc| desc.shape == PrimitiveShape::Ring)
        .collect();
    assert_eq!(rings.len(), 1);
    assert_eq!(rings[0].name, "garbage can");
    assert_eq!(rings[0].material, MaterialKind::None);
    assert_eq!(rings[0].translation, [0.0, 2.0, 0.0]);
}

#[test]
fn right_door_mirrors_its_texture() {
    let door = STREET_SCENE
        .iter()
        .find(|desc| desc.name == "front door right")
        .unwrap();
    assert_eq!(door.uv_scale, [-1.0, 1.0]);
}

#[test]
fn model_matrix_scales_then_rotates_then_translates() {
    let transform = Transform::new(
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 90.0, 0.0),
        Vector3::new(2.0, 1.0, 1.0),
    );
    assert_vec3_close(apply(&transform, [0.5, 0.0, 0.0]), Vector3::new(1.0, 0.0, -1.0), "point");
}

#[test]
fn euler_angles_compose_in_xyz_order() {
    let transform = Transform::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(90.0, 90.0, 0.0),
        Vector3::new(1.0, 1.0, 1.0),
    );
    assert_vec3_close(apply(&transform, [1.0, 0.0, 0.0]), Vector3::new(0.0, 1.0, 0.0), "x axis");
}

#[test]
fn building_top_lands_in_front_of_its_centre() {
    let building = STREET_SCENE.iter().find(|desc| desc.name == "building").unwrap();
    assert_vec3_close(
        apply(&building.transform(), [0.0, 0.5, 0.0]),
        Vector3::new(-5.0, 5.0, -3.0),
        "building face",
    );
}

#[test]
fn default_transform_is_identity() {
    let transform = Transform::default();
    assert_vec3_close(apply(&transform, [1.0, 2.0, 3.0]), Vector3::new(1.0, 2.0, 3.0), "point");

    let moved = Transform::from(Vector3::new(1.0, 1.0, 1.0));
    assert_vec3_close(apply(&moved, [0.0, 0.0, 0.0]), Vector3::new(1.0, 1.0, 1.0), "origin");
}

#[test]
fn destroying_the_world_releases_every_mesh() {
    let mut device = RecordingDevice::new();
    let world = World::build(&mut device, &STREET_SCENE).unwrap();
    device.clear_calls();

    world.destroy(&mut device);
    assert_eq!(device.calls.len(), 14);
    assert_eq!(device.count(|c| matches!(c, Call::DestroyMesh(_))), 14);
}

#[test]
fn a_custom_scene_can_be_built() {
    let scene = [
        EntityDesc {
            name: "floor",
            shape: PrimitiveShape::Plane,
            material: MaterialKind::FlatWhite,
            uv_scale: [4.0, 4.0],
            translation: [0.0, 0.0, 0.0],
            rotation_degrees: [0.0, 0.0, 0.0],
            scale: [10.0, 1.0, 10.0],
        },
        EntityDesc {
            name: "pillar",
            shape: PrimitiveShape::Ring,
            material: MaterialKind::Concrete,
            uv_scale: [1.0, 1.0],
            translation: [0.0, 1.0, 0.0],
            rotation_degrees: [-90.0, 0.0, 0.0],
            scale: [1.0, 1.0, 2.0],
        },
    ];
    let mut device = RecordingDevice::new();
    let world = World::build(&mut device, &scene).unwrap();

    assert_eq!(world.len(), 2);
    assert_eq!(
        device.calls,
        vec![
            Call::CreateMesh {
                label: "floor".to_string(),
                vertices: 6
            },
            Call::CreateMesh {
                label: "pillar".to_string(),
                vertices: 192
            },
        ]
    );
    assert_eq!(world.entities[1].uv_scale, cgmath::Vector2::new(1.0, 1.0));
}

#[test]
fn an_empty_scene_builds_an_empty_world() {
    let mut device = RecordingDevice::new();
    let world = World::build(&mut device, &[]).unwrap();
    assert!(world.is_empty());
    assert!(device.calls.is_empty());
}
