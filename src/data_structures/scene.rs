//! The scene: renderable entities and the literal street world.
//!
//! A scene is described by a table of [`EntityDesc`] rows. [`World::build`] turns the rows into
//! [`SceneEntity`] values, generating and uploading one mesh per entity. The table is plain data
//! so a different scene can be rendered by passing another slice.

use anyhow::Context as _;
use cgmath::{Matrix4, Vector2, Vector3};

use crate::{
    data_structures::{material::MaterialKind, model::Mesh, transform::Transform},
    render::GraphicsDevice,
    resources::mesh::{self, RING_SIDES},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveShape {
    Box,
    Wedge,
    Plane,
    Ring,
}

impl PrimitiveShape {
    pub const ALL: [PrimitiveShape; 4] = [
        PrimitiveShape::Box,
        PrimitiveShape::Wedge,
        PrimitiveShape::Plane,
        PrimitiveShape::Ring,
    ];

    /// Number of vertices the generator for this shape emits.
    pub fn vertex_count(self) -> u32 {
        match self {
            PrimitiveShape::Box => 36,
            PrimitiveShape::Wedge => 18,
            PrimitiveShape::Plane => 6,
            // Two side triangles per segment and one fan triangle per segment on each cap.
            PrimitiveShape::Ring => RING_SIDES * 6 + RING_SIDES * 3 * 2,
        }
    }
}

/// One row of a scene table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityDesc {
    pub name: &'static str,
    pub shape: PrimitiveShape,
    pub material: MaterialKind,
    pub uv_scale: [f32; 2],
    pub translation: [f32; 3],
    pub rotation_degrees: [f32; 3],
    pub scale: [f32; 3],
}

impl EntityDesc {
    pub fn transform(&self) -> Transform {
        Transform::new(
            Vector3::from(self.translation),
            Vector3::from(self.rotation_degrees),
            Vector3::from(self.scale),
        )
    }
}

const fn entity(
    name: &'static str,
    shape: PrimitiveShape,
    material: MaterialKind,
    uv_scale: [f32; 2],
    translation: [f32; 3],
    rotation_degrees: [f32; 3],
    scale: [f32; 3],
) -> EntityDesc {
    EntityDesc {
        name,
        shape,
        material,
        uv_scale,
        translation,
        rotation_degrees,
        scale,
    }
}

/// The street corner: sidewalk, road, a brick building with doors and a window, a car, a tree
/// and two bins.
#[rustfmt::skip]
pub const STREET_SCENE: [EntityDesc; 14] = [
    entity("sidewalk", PrimitiveShape::Box, MaterialKind::Concrete, [5.0, 5.0], [-5.0, -0.5, -10.0], [0.0, 0.0, 0.0], [20.0, 1.0, 20.0]),
    entity("street", PrimitiveShape::Plane, MaterialKind::Road, [8.0, 2.0], [0.0, -0.5, 10.0], [0.0, 0.0, 0.0], [40.0, 1.0, 20.0]),
    // Rotated so the brick rows run horizontally.
    entity("building", PrimitiveShape::Box, MaterialKind::Brick, [2.0, 2.0], [-5.0, 5.0, -8.0], [90.0, 0.0, 0.0], [10.0, 10.0, 10.0]),
    entity("front door left", PrimitiveShape::Plane, MaterialKind::Door, [1.0, 1.0], [-3.0, 1.0, -2.9], [90.0, 0.0, 0.0], [1.0, 1.0, 2.0]),
    // Mirrored texture so the handles face each other.
    entity("front door right", PrimitiveShape::Plane, MaterialKind::Door, [-1.0, 1.0], [-1.5, 1.0, -2.9], [90.0, 0.0, 0.0], [1.0, 1.0, 2.0]),
    entity("window", PrimitiveShape::Plane, MaterialKind::Glass, [1.0, 1.0], [-5.0, 1.5, -2.9], [90.0, 0.0, 0.0], [2.0, 1.0, 1.5]),
    entity("garbage can", PrimitiveShape::Ring, MaterialKind::None, [1.0, 1.0], [0.0, 2.0, 0.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
    entity("car body", PrimitiveShape::Box, MaterialKind::Metal, [1.0, 1.0], [-7.0, 0.0, 0.0], [0.0, 0.0, 0.0], [4.0, 1.5, 2.0]),
    entity("car top", PrimitiveShape::Box, MaterialKind::Glass, [1.0, 1.0], [-6.5, 1.25, 0.0], [0.0, 0.0, 0.0], [2.0, 1.0, 2.0]),
    entity("tree trunk", PrimitiveShape::Box, MaterialKind::Bark, [1.0, 1.0], [3.0, 1.5, -2.0], [0.0, 0.0, 0.0], [1.0, 3.0, 1.0]),
    entity("tree leaves low", PrimitiveShape::Wedge, MaterialKind::Leaf, [1.0, 1.0], [3.0, 4.0, -2.0], [0.0, 15.0, 0.0], [3.0, 3.0, 3.0]),
    entity("tree leaves middle", PrimitiveShape::Wedge, MaterialKind::Leaf, [1.0, 1.0], [3.0, 5.0, -2.0], [0.0, -10.0, 0.0], [2.5, 2.5, 2.5]),
    entity("tree leaves top", PrimitiveShape::Wedge, MaterialKind::Leaf, [1.0, 1.0], [3.0, 6.0, -2.0], [0.0, 0.0, 0.0], [2.0, 2.0, 2.0]),
    entity("trash can", PrimitiveShape::Box, MaterialKind::Metal, [1.0, 1.0], [-2.0, 0.5, -0.5], [0.0, -15.0, 0.0], [0.5, 1.0, 0.5]),
];

/// A renderable object: shape, finish, texture tiling, placement and its mesh.
#[derive(Debug)]
pub struct SceneEntity {
    pub name: &'static str,
    pub shape: PrimitiveShape,
    pub material: MaterialKind,
    pub uv_scale: Vector2<f32>,
    pub transform: Transform,
    model: Matrix4<f32>,
    pub mesh: Mesh,
}

impl SceneEntity {
    pub fn new(desc: &EntityDesc, mesh: Mesh) -> Self {
        let transform = desc.transform();
        Self {
            name: desc.name,
            shape: desc.shape,
            material: desc.material,
            uv_scale: Vector2::from(desc.uv_scale),
            transform,
            model: transform.to_matrix(),
            mesh,
        }
    }

    /// Object-to-world matrix, composed once when the entity is created.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model
    }
}

#[derive(Debug, Default)]
pub struct World {
    pub entities: Vec<SceneEntity>,
}

impl World {
    /// Generates and uploads a mesh for every row of `scene`.
    ///
    /// Fails when a generator produces a buffer of unexpected size. The meshes created so far
    /// are released before returning.
    pub fn build<D: GraphicsDevice + ?Sized>(device: &mut D, scene: &[EntityDesc]) -> anyhow::Result<Self> {
        let mut world = World {
            entities: Vec::with_capacity(scene.len()),
        };
        for desc in scene {
            let mesh = mesh::generate(desc.shape)
                .and_then(|vertices| Mesh::new(device, desc.name, &vertices, desc.shape.vertex_count()))
                .with_context(|| format!("Failed to create the mesh of {:?}", desc.name));
            match mesh {
                Ok(mesh) => world.entities.push(SceneEntity::new(desc, mesh)),
                Err(e) => {
                    world.destroy(device);
                    return Err(e);
                }
            }
        }
        log::info!("Built a world of {} entities", world.entities.len());
        Ok(world)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count_shape(&self, shape: PrimitiveShape) -> usize {
        self.entities.iter().filter(|e| e.shape == shape).count()
    }

    /// Releases every mesh.
    pub fn destroy<D: GraphicsDevice + ?Sized>(self, device: &mut D) {
        for entity in self.entities {
            entity.mesh.destroy(device);
        }
    }
}
