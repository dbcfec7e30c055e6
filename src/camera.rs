//! Free-flying camera, its input controller and the two projections.
//!
//! The [`Camera`] is a yaw/pitch pose with a derived front/right/up basis. The
//! [`CameraController`] turns one frame of buffered input into pose changes: WASD moves in the
//! camera plane, Q/E along the camera's up axis, the cursor turns the camera, the scroll wheel
//! changes the movement speed and P flips between perspective and orthographic projection.
//! [`Projection`] produces OpenGL-convention clip matrices; the GPU context converts them to
//! wgpu's depth range when they are uploaded.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, Vector3};
use instant::Duration;

use crate::{
    config::{CameraConfig, Config},
    input::{InputState, Key},
};

/// Converts OpenGL clip space (z in -1..1) to wgpu clip space (z in 0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Field of view of the perspective projection.
    pub zoom: Deg<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, yaw: Deg<f32>, pitch: Deg<f32>) -> Self {
        let mut camera = Self {
            position: position.into(),
            zoom: Deg(45.0),
            yaw,
            pitch,
            front: -Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: WORLD_UP,
        };
        camera.update_basis();
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            config.position,
            Deg(config.yaw_degrees),
            Deg(config.pitch_degrees),
        );
        camera.zoom = Deg(config.zoom_degrees);
        camera
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Adds to yaw and pitch, keeping pitch within `±pitch_limit` so the view never flips.
    pub fn turn(&mut self, yaw: Deg<f32>, pitch: Deg<f32>, pitch_limit: Deg<f32>) {
        self.yaw += yaw;
        self.pitch = Deg((self.pitch + pitch).0.clamp(-pitch_limit.0, pitch_limit.0));
        self.update_basis();
    }

    /// World-to-camera matrix looking from the position along `front`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn update_basis(&mut self) {
        let (sin_yaw, cos_yaw) = Rad::from(self.yaw).0.sin_cos();
        let (sin_pitch, cos_pitch) = Rad::from(self.pitch).0.sin_cos();
        self.front = Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[derive(Debug)]
pub struct CameraController {
    speed: f32,
    min_speed: f32,
    max_speed: f32,
    sensitivity: f32,
    pitch_limit: Deg<f32>,
    orthographic: bool,
    toggle_was_down: bool,
    first_mouse: bool,
    last_cursor: (f64, f64),
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            speed: config.speed.clamp(config.min_speed, config.max_speed),
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            sensitivity: config.sensitivity,
            pitch_limit: Deg(config.pitch_limit_degrees),
            orthographic: false,
            toggle_was_down: false,
            first_mouse: true,
            last_cursor: (0.0, 0.0),
        }
    }

    /// Movement speed in world units per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_orthographic(&self) -> bool {
        self.orthographic
    }

    /// The next cursor sample seeds the reference position instead of turning the camera.
    pub fn reset_first_mouse(&mut self) {
        self.first_mouse = true;
    }

    /// Applies one frame of buffered input: cursor samples, then scroll, then keys.
    pub fn update(&mut self, camera: &mut Camera, input: &mut InputState, dt: Duration) {
        for (x, y) in input.take_cursor_samples() {
            self.process_cursor(camera, x, y);
        }
        let scroll = input.take_scroll();
        if scroll != 0.0 {
            self.process_scroll(scroll);
        }
        self.process_keyboard(camera, input, dt);
    }

    pub fn process_cursor(&mut self, camera: &mut Camera, x: f64, y: f64) {
        if self.first_mouse {
            self.last_cursor = (x, y);
            self.first_mouse = false;
        }
        let (last_x, last_y) = self.last_cursor;
        // Screen y grows downwards, pitch grows upwards.
        let dx = (x - last_x) as f32 * self.sensitivity;
        let dy = (last_y - y) as f32 * self.sensitivity;
        self.last_cursor = (x, y);

        camera.turn(Deg(dx), Deg(dy), self.pitch_limit);
    }

    /// Scrolling changes the movement speed, not the field of view.
    pub fn process_scroll(&mut self, lines: f32) {
        self.speed = (self.speed - lines).clamp(self.min_speed, self.max_speed);
        log::debug!("Camera speed: {}", self.speed);
    }

    pub fn process_keyboard(&mut self, camera: &mut Camera, input: &InputState, dt: Duration) {
        let velocity = self.speed * dt.as_secs_f32();

        if input.is_down(Key::W) {
            camera.position += camera.front() * velocity;
        }
        if input.is_down(Key::S) {
            camera.position -= camera.front() * velocity;
        }
        if input.is_down(Key::A) {
            camera.position -= camera.right() * velocity;
        }
        if input.is_down(Key::D) {
            camera.position += camera.right() * velocity;
        }
        if input.is_down(Key::Q) {
            camera.position -= camera.up() * velocity;
        }
        if input.is_down(Key::E) {
            camera.position += camera.up() * velocity;
        }

        let toggle_down = input.is_down(Key::P);
        if toggle_down && !self.toggle_was_down {
            self.orthographic = !self.orthographic;
            log::info!(
                "Switched to {} projection",
                if self.orthographic { "orthographic" } else { "perspective" }
            );
        }
        self.toggle_was_down = toggle_down;
    }
}

#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    znear: f32,
    zfar: f32,
    ortho_half_width: f32,
    ortho_half_height: f32,
}

impl Projection {
    pub fn new(aspect: f32, znear: f32, zfar: f32, ortho_half_width: f32, ortho_half_height: f32) -> Self {
        Self {
            aspect,
            znear,
            zfar,
            ortho_half_width,
            ortho_half_height,
        }
    }

    /// Projection with the aspect ratio of the configured window size.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.window.aspect(),
            config.projection.znear,
            config.projection.zfar,
            config.projection.ortho_half_width,
            config.projection.ortho_half_height,
        )
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn perspective(&self, fovy: Deg<f32>) -> Matrix4<f32> {
        cgmath::perspective(fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn orthographic(&self) -> Matrix4<f32> {
        cgmath::ortho(
            -self.ortho_half_width,
            self.ortho_half_width,
            -self.ortho_half_height,
            self.ortho_half_height,
            self.znear,
            self.zfar,
        )
    }

    pub fn calc_matrix(&self, zoom: Deg<f32>, orthographic: bool) -> Matrix4<f32> {
        if orthographic {
            self.orthographic()
        } else {
            self.perspective(zoom)
        }
    }
}
