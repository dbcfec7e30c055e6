//! Engine data structures: vertices, meshes, transforms, materials, textures and the scene.
//!
//! - `model` contains the vertex format and the device-side mesh
//! - `transform` composes translation, rotation and scale into a model matrix
//! - `material` maps surface finishes to textures and specular strength
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `scene` holds the entity table and the world built from it

pub mod material;
pub mod model;
pub mod scene;
pub mod texture;
pub mod transform;
