//! Perspective camera
//!
//! A look-at camera defined by an eye point and a target. The projection
//! lives in [`crate::viewport::Viewport`]; this type only produces the view
//! matrix. The orbit controller drives it through [`CameraControl`].

use glam::{Mat4, Vec3};
use orrery_input::CameraControl;

/// Look-at camera with a remembered home pose
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    home_eye: Vec3,
    home_target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 5.0, 100.0), Vec3::ZERO)
    }
}

impl Camera {
    /// Create a camera at `eye` looking at `target`; this pose becomes home
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            home_eye: eye,
            home_target: target,
        }
    }

    /// Return to the pose the camera was created with
    pub fn reset(&mut self) {
        self.eye = self.home_eye;
        self.target = self.home_target;
    }

    /// World-to-view transform (right-handed)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

impl CameraControl for Camera {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_view(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }
}
