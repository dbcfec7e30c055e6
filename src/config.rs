//! Static configuration of the renderer.
//!
//! Everything here is a constant of the demo scene: the logical window size used for the
//! aspect ratio, projection planes, the camera's start pose and movement limits, and where
//! textures live on disk. [`Config::default`] reproduces the shipped scene;
//! [`Config::from_env`] additionally lets `SCENE_NGIN_ASSETS` point at another asset root.

use std::{ffi::OsString, path::PathBuf};

/// Environment variable that overrides [`Config::asset_root`].
pub const ASSET_ROOT_ENV: &str = "SCENE_NGIN_ASSETS";

#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width, also the numerator of the perspective aspect ratio.
    pub width: u32,
    /// Logical height, also the denominator of the perspective aspect ratio.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "scene-ngin street scene".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Clone, Debug)]
pub struct ProjectionConfig {
    pub znear: f32,
    pub zfar: f32,
    /// Half extents of the orthographic box. Much smaller than the perspective view volume,
    /// so switching modes visibly changes the scene scale.
    pub ortho_half_width: f32,
    pub ortho_half_height: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            znear: 0.1,
            zfar: 100.0,
            ortho_half_width: 2.0,
            ortho_half_height: 2.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub zoom_degrees: f32,
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub sensitivity: f32,
    pub pitch_limit_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw_degrees: -90.0,
            pitch_degrees: 0.0,
            zoom_degrees: 45.0,
            speed: 2.5,
            min_speed: 0.1,
            max_speed: 5.0,
            sensitivity: 0.1,
            pitch_limit_degrees: 89.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub window: WindowConfig,
    pub projection: ProjectionConfig,
    pub camera: CameraConfig,
    /// Directory the material textures are read from.
    pub asset_root: PathBuf,
    pub clear_colour: wgpu::Color,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            projection: ProjectionConfig::default(),
            camera: CameraConfig::default(),
            asset_root: PathBuf::from("./assets"),
            clear_colour: wgpu::Color::BLACK,
        }
    }
}

impl Config {
    /// The default configuration with the asset root taken from [`ASSET_ROOT_ENV`] if set.
    pub fn from_env() -> Self {
        Self::with_asset_root_override(std::env::var_os(ASSET_ROOT_ENV))
    }

    pub fn with_asset_root_override(root: Option<OsString>) -> Self {
        let mut config = Self::default();
        if let Some(root) = root {
            log::info!("Using asset root {:?} from {}", root, ASSET_ROOT_ENV);
            config.asset_root = PathBuf::from(root);
        }
        config
    }
}
