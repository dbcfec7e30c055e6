use anyhow::ensure;

use crate::data_structures::{
    model::{FLOATS_PER_VERTEX, ModelVertex},
    scene::PrimitiveShape,
};

/// Segments around the ring.
pub const RING_SIDES: u32 = 16;
pub const RING_RADIUS: f32 = 0.5;
pub const RING_HEIGHT: f32 = 1.0;

const fn v(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> ModelVertex {
    ModelVertex::new(position, normal, tex_coords)
}

const BACK: [f32; 3] = [0.0, 0.0, -1.0];
const FRONT: [f32; 3] = [0.0, 0.0, 1.0];
const LEFT: [f32; 3] = [-1.0, 0.0, 0.0];
const RIGHT: [f32; 3] = [1.0, 0.0, 0.0];
const DOWN: [f32; 3] = [0.0, -1.0, 0.0];
const UP: [f32; 3] = [0.0, 1.0, 0.0];

#[rustfmt::skip]
const BOTTOM_FACE: [ModelVertex; 6] = [
    v([-0.5, -0.5, -0.5], DOWN, [0.0, 1.0]),
    v([ 0.5, -0.5, -0.5], DOWN, [1.0, 1.0]),
    v([ 0.5, -0.5,  0.5], DOWN, [1.0, 0.0]),
    v([ 0.5, -0.5,  0.5], DOWN, [1.0, 0.0]),
    v([-0.5, -0.5,  0.5], DOWN, [0.0, 0.0]),
    v([-0.5, -0.5, -0.5], DOWN, [0.0, 1.0]),
];

/// Unit cube centred on the origin, six faces of two triangles each.
#[rustfmt::skip]
pub const BOX_VERTICES: [ModelVertex; 36] = [
    // back
    v([-0.5, -0.5, -0.5], BACK, [0.0, 0.0]),
    v([ 0.5, -0.5, -0.5], BACK, [1.0, 0.0]),
    v([ 0.5,  0.5, -0.5], BACK, [1.0, 1.0]),
    v([ 0.5,  0.5, -0.5], BACK, [1.0, 1.0]),
    v([-0.5,  0.5, -0.5], BACK, [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], BACK, [0.0, 0.0]),
    // front
    v([-0.5, -0.5,  0.5], FRONT, [0.0, 0.0]),
    v([ 0.5, -0.5,  0.5], FRONT, [1.0, 0.0]),
    v([ 0.5,  0.5,  0.5], FRONT, [1.0, 1.0]),
    v([ 0.5,  0.5,  0.5], FRONT, [1.0, 1.0]),
    v([-0.5,  0.5,  0.5], FRONT, [0.0, 1.0]),
    v([-0.5, -0.5,  0.5], FRONT, [0.0, 0.0]),
    // left
    v([-0.5,  0.5,  0.5], LEFT, [1.0, 0.0]),
    v([-0.5,  0.5, -0.5], LEFT, [1.0, 1.0]),
    v([-0.5, -0.5, -0.5], LEFT, [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], LEFT, [0.0, 1.0]),
    v([-0.5, -0.5,  0.5], LEFT, [0.0, 0.0]),
    v([-0.5,  0.5,  0.5], LEFT, [1.0, 0.0]),
    // right
    v([ 0.5,  0.5,  0.5], RIGHT, [1.0, 0.0]),
    v([ 0.5,  0.5, -0.5], RIGHT, [1.0, 1.0]),
    v([ 0.5, -0.5, -0.5], RIGHT, [0.0, 1.0]),
    v([ 0.5, -0.5, -0.5], RIGHT, [0.0, 1.0]),
    v([ 0.5, -0.5,  0.5], RIGHT, [0.0, 0.0]),
    v([ 0.5,  0.5,  0.5], RIGHT, [1.0, 0.0]),
    // bottom
    BOTTOM_FACE[0], BOTTOM_FACE[1], BOTTOM_FACE[2],
    BOTTOM_FACE[3], BOTTOM_FACE[4], BOTTOM_FACE[5],
    // top
    v([-0.5,  0.5, -0.5], UP, [0.0, 1.0]),
    v([ 0.5,  0.5, -0.5], UP, [1.0, 1.0]),
    v([ 0.5,  0.5,  0.5], UP, [1.0, 0.0]),
    v([ 0.5,  0.5,  0.5], UP, [1.0, 0.0]),
    v([-0.5,  0.5,  0.5], UP, [0.0, 0.0]),
    v([-0.5,  0.5, -0.5], UP, [0.0, 1.0]),
];

/// Square pyramid: four sloped faces meeting at `(0, 0.5, 0)` over the cube's bottom face.
///
/// The sloped faces carry the axis normal of the side they stand on, so each one lights like
/// the matching cube face.
#[rustfmt::skip]
pub const WEDGE_VERTICES: [ModelVertex; 18] = [
    // front
    v([-0.5, -0.5,  0.5], FRONT, [0.0, 0.0]),
    v([ 0.0,  0.5,  0.0], FRONT, [0.5, 1.0]),
    v([ 0.5, -0.5,  0.5], FRONT, [1.0, 0.0]),
    // right
    v([ 0.5, -0.5,  0.5], RIGHT, [0.0, 0.0]),
    v([ 0.0,  0.5,  0.0], RIGHT, [0.5, 1.0]),
    v([ 0.5, -0.5, -0.5], RIGHT, [1.0, 0.0]),
    // back
    v([ 0.5, -0.5, -0.5], BACK, [1.0, 0.0]),
    v([ 0.0,  0.5,  0.0], BACK, [0.5, 1.0]),
    v([-0.5, -0.5, -0.5], BACK, [0.0, 0.0]),
    // left
    v([-0.5, -0.5, -0.5], LEFT, [1.0, 0.0]),
    v([ 0.0,  0.5,  0.0], LEFT, [0.5, 1.0]),
    v([-0.5, -0.5,  0.5], LEFT, [0.0, 0.0]),
    // bottom
    BOTTOM_FACE[0], BOTTOM_FACE[1], BOTTOM_FACE[2],
    BOTTOM_FACE[3], BOTTOM_FACE[4], BOTTOM_FACE[5],
];

/// Unit square in the XZ plane facing +Y.
#[rustfmt::skip]
pub const PLANE_VERTICES: [ModelVertex; 6] = [
    v([-0.5, 0.0, -0.5], UP, [0.0, 0.0]),
    v([ 0.5, 0.0,  0.5], UP, [1.0, 1.0]),
    v([-0.5, 0.0,  0.5], UP, [0.0, 1.0]),
    v([-0.5, 0.0, -0.5], UP, [0.0, 0.0]),
    v([ 0.5, 0.0, -0.5], UP, [1.0, 0.0]),
    v([ 0.5, 0.0,  0.5], UP, [1.0, 1.0]),
];

/// `sides + 1` points on the unit circle in the XY plane; the last one repeats the first.
pub fn unit_circle(sides: u32) -> Vec<[f32; 2]> {
    let step = std::f32::consts::TAU / sides as f32;
    (0..=sides)
        .map(|i| {
            let (sin, cos) = (step * i as f32).sin_cos();
            [cos, sin]
        })
        .collect()
}

/// Closed cylinder around the Z axis: side quads plus a triangle fan on each end.
pub fn ring_vertices(sides: u32, radius: f32, height: f32) -> Vec<ModelVertex> {
    let circle = unit_circle(sides);
    let half = height * 0.5;
    let mut vertices = Vec::with_capacity((sides * 12) as usize);

    for i in 0..sides as usize {
        let [ux0, uy0] = circle[i];
        let [ux1, uy1] = circle[i + 1];
        let s0 = i as f32 / sides as f32;
        let s1 = (i + 1) as f32 / sides as f32;

        let bottom0 = v([ux0 * radius, uy0 * radius, -half], [ux0, uy0, 0.0], [s0, 1.0]);
        let bottom1 = v([ux1 * radius, uy1 * radius, -half], [ux1, uy1, 0.0], [s1, 1.0]);
        let top0 = v([ux0 * radius, uy0 * radius, half], [ux0, uy0, 0.0], [s0, 0.0]);
        let top1 = v([ux1 * radius, uy1 * radius, half], [ux1, uy1, 0.0], [s1, 0.0]);

        vertices.extend_from_slice(&[bottom0, bottom1, top1, top1, top0, bottom0]);
    }

    for (z, normal) in [(-half, BACK), (half, FRONT)] {
        let centre = v([0.0, 0.0, z], normal, [0.5, 0.5]);
        for i in 0..sides as usize {
            let rim = |[ux, uy]: [f32; 2]| {
                v([ux * radius, uy * radius, z], normal, [-ux * 0.5 + 0.5, -uy * 0.5 + 0.5])
            };
            let (p0, p1) = (rim(circle[i]), rim(circle[i + 1]));
            // Wound to face away from the ring on both ends.
            if z < 0.0 {
                vertices.extend_from_slice(&[centre, p1, p0]);
            } else {
                vertices.extend_from_slice(&[centre, p0, p1]);
            }
        }
    }

    vertices
}

/// Builds the triangle list of `shape` and checks it against the shape's vertex count.
pub fn generate(shape: PrimitiveShape) -> anyhow::Result<Vec<ModelVertex>> {
    let vertices = match shape {
        PrimitiveShape::Box => BOX_VERTICES.to_vec(),
        PrimitiveShape::Wedge => WEDGE_VERTICES.to_vec(),
        PrimitiveShape::Plane => PLANE_VERTICES.to_vec(),
        PrimitiveShape::Ring => ring_vertices(RING_SIDES, RING_RADIUS, RING_HEIGHT),
    };
    check_float_count(shape, &vertices)?;
    Ok(vertices)
}

/// Fails unless `vertices` holds eight floats for each vertex `shape` should have.
pub fn check_float_count(shape: PrimitiveShape, vertices: &[ModelVertex]) -> anyhow::Result<()> {
    let floats: &[f32] = bytemuck::cast_slice(vertices);
    let expected = FLOATS_PER_VERTEX * shape.vertex_count() as usize;
    ensure!(
        floats.len() == expected,
        "{shape:?} generated {} floats, expected {expected}",
        floats.len()
    );
    Ok(())
}
