//! Render pipelines and the lighting they implement.
//!
//! - `basic` builds the textured scene pipeline and its per-draw uniform layout
//! - `light` describes the point lights and the Phong model of the scene shader

pub mod basic;
pub mod light;
