//! Damped orbit controller
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right drag: pan the target
//! - Mouse wheel: dolly in/out
//!
//! Input is accumulated between frames and applied in [`OrbitController::update`].
//! With damping enabled only a fraction of the pending rotation and pan is
//! applied each frame and the rest decays, so the view keeps drifting briefly
//! after the mouse stops.

use glam::{Vec2, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels per line for trackpads that report pixel deltas
const PIXELS_PER_LINE: f32 = 100.0;

/// Pending motion below this is treated as settled
const SETTLE_EPSILON: f32 = 1e-6;

/// Orbit controller for handling mouse input
pub struct OrbitController {
    // Mouse state
    rotating: bool,
    panning: bool,
    pending_rotate: Vec2,
    pending_pan: Vec2,

    // Motion still to be applied (decays when damping)
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    zoom_scale: f32,

    // Configuration
    pub rotate_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_speed: f32,
    pub damping_factor: f32,
    pub damping_enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            rotating: false,
            panning: false,
            pending_rotate: Vec2::ZERO,
            pending_pan: Vec2::ZERO,

            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            zoom_scale: 1.0,

            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.001,
            zoom_speed: 1.0,
            damping_factor: 0.05,
            damping_enabled: true,
            min_distance: 1.0,
            max_distance: 350.0,
            min_polar_angle: 0.01,
            max_polar_angle: std::f32::consts::PI - 0.01,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    /// Process raw mouse movement
    ///
    /// Movement only counts while a drag button is held.
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        let delta = Vec2::new(delta_x as f32, delta_y as f32);
        if self.rotating {
            self.pending_rotate += delta;
        } else if self.panning {
            self.pending_pan += delta;
        }
    }

    /// Process a mouse wheel event (positive = zoom in)
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        self.dolly(lines);
    }

    /// Dolly by `steps` wheel notches (positive = towards the target)
    pub fn dolly(&mut self, steps: f32) {
        self.zoom_scale *= 0.95f32.powf(self.zoom_speed * steps);
    }

    /// Queue an orbit by the given angles, in radians
    ///
    /// Positive `theta` swings the camera around +Y, positive `phi` moves it
    /// towards the south pole.
    pub fn rotate(&mut self, theta: f32, phi: f32) {
        self.delta_theta += theta;
        self.delta_phi += phi;
    }

    /// Apply pending input and damping to the camera
    ///
    /// Call once per frame. Returns true while the camera is still moving.
    pub fn update<C: CameraControl>(&mut self, camera: &mut C) -> bool {
        // Mouse drag right swings the camera left around the target
        self.rotate(
            -self.pending_rotate.x * self.rotate_sensitivity,
            -self.pending_rotate.y * self.rotate_sensitivity,
        );
        self.pending_rotate = Vec2::ZERO;

        let mut target = camera.target();
        let offset = camera.eye() - target;
        let mut radius = offset.length().max(SETTLE_EPSILON);

        if self.pending_pan != Vec2::ZERO {
            let forward = -offset / radius;
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward);
            let scale = radius * self.pan_sensitivity;
            self.pan_offset += (-right * self.pending_pan.x + up * self.pending_pan.y) * scale;
            self.pending_pan = Vec2::ZERO;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let step = if self.damping_enabled { self.damping_factor } else { 1.0 };
        theta += self.delta_theta * step;
        phi = (phi + self.delta_phi * step).clamp(self.min_polar_angle, self.max_polar_angle);
        target += self.pan_offset * step;
        radius = (radius * self.zoom_scale).clamp(self.min_distance, self.max_distance);

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.set_view(target + new_offset, target);

        if self.damping_enabled {
            let keep = 1.0 - self.damping_factor;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.zoom_scale = 1.0;

        self.is_moving()
    }

    /// Check if any motion is still pending
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > SETTLE_EPSILON
            || self.delta_phi.abs() > SETTLE_EPSILON
            || self.pan_offset.length_squared() > SETTLE_EPSILON * SETTLE_EPSILON
    }

    /// Drop all pending motion
    pub fn stop(&mut self) {
        self.pending_rotate = Vec2::ZERO;
        self.pending_pan = Vec2::ZERO;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan_offset = Vec3::ZERO;
        self.zoom_scale = 1.0;
    }

    /// Toggle damping on/off
    pub fn toggle_damping(&mut self) -> bool {
        self.damping_enabled = !self.damping_enabled;
        self.stop();
        self.damping_enabled
    }

    /// Builder: set rotation sensitivity (radians per pixel)
    pub fn with_rotate_sensitivity(mut self, sensitivity: f32) -> Self {
        self.rotate_sensitivity = sensitivity;
        self
    }

    /// Builder: set pan sensitivity (fraction of the orbit radius per pixel)
    pub fn with_pan_sensitivity(mut self, sensitivity: f32) -> Self {
        self.pan_sensitivity = sensitivity;
        self
    }

    /// Builder: set zoom speed
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set damping factor (fraction applied per frame)
    pub fn with_damping_factor(mut self, factor: f32) -> Self {
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Builder: enable or disable damping
    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.damping_enabled = enabled;
        self
    }

    /// Builder: clamp the orbit radius
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self
    }
}

/// Trait for camera control
/// Allows the controller to drive different camera implementations
pub trait CameraControl {
    fn eye(&self) -> Vec3;
    fn target(&self) -> Vec3;
    fn set_view(&mut self, eye: Vec3, target: Vec3);
}
