//! scene-ngin
//!
//! A small wgpu renderer for one fixed street scene: boxes, pyramids, flat quads and a
//! cylinder, textured and lit by two Phong point lights, explored with a free-flying camera
//! that can switch between perspective and orthographic projection.
//!
//! High-level modules
//! - `camera`: camera pose, input controller and projections
//! - `config`: window, projection, camera and asset settings
//! - `context`: wgpu device, surface and pipeline, the GPU implementation of `GraphicsDevice`
//! - `data_structures`: vertices, meshes, transforms, materials and the scene
//! - `flow`: winit application handler and frame loop
//! - `input`: per-frame keyboard, mouse and scroll buffer
//! - `pipelines`: the scene render pipeline and the lighting model
//! - `render`: the `GraphicsDevice` interface and the per-frame render pass
//! - `resources`: geometry generators and texture loading
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
