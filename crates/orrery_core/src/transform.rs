//! Node transform (position, Y rotation, uniform scale)
//!
//! Bodies only ever spin about the Y axis, so the rotation is stored as a
//! single accumulated angle rather than a full quaternion.

use glam::{Mat4, Quat, Vec3};

/// A local transform with position, Y-axis rotation, and uniform scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Position relative to the parent node (or the scene origin for roots)
    pub position: Vec3,
    /// Accumulated rotation about the local Y axis, in radians
    pub rotation_y: f32,
    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Builder: set the uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// The rotation as a quaternion
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation_y)
    }

    /// Local-to-parent matrix: scale, then rotate, then translate
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation(), self.position)
    }

    /// Transform a point from local space to parent space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation() * (p * self.scale) + self.position
    }

    /// Rotate about Y by `delta` radians
    pub fn rotate_y(&mut self, delta: f32) {
        self.rotation_y += delta;
    }
}
