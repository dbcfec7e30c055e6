//! Object-to-world transforms.
//!
//! A [`Transform`] keeps scale, Euler rotation and translation separate and composes them
//! in a fixed order: scale first, then rotate about the origin, then move into place.

use cgmath::{Deg, Matrix4, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    /// Euler angles in degrees, applied intrinsically in X, Y, Z order.
    pub rotation_degrees: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(translation: Vector3<f32>, rotation_degrees: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            translation,
            rotation_degrees,
            scale,
        }
    }

    /// `Rx · Ry · Rz`, the same matrix as an XYZ Euler-angle rotation.
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Deg(self.rotation_degrees.x))
            * Matrix4::from_angle_y(Deg(self.rotation_degrees.y))
            * Matrix4::from_angle_z(Deg(self.rotation_degrees.z))
    }

    /// `T · R · S`
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * self.rotation_matrix()
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(translation: Vector3<f32>) -> Self {
        Transform {
            translation,
            ..Default::default()
        }
    }
}
