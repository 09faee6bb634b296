//! Viewport manager
//!
//! Tracks the window's logical size and device pixel ratio, derives the
//! backing surface size, and owns the perspective projection. The aspect
//! ratio always follows the logical size exactly; only the backing size is
//! affected by the pixel ratio cap.
//!
//! Above the cap the surface is configured smaller than the window's physical
//! size and the presentation engine scales it up. Backends that require the
//! surface to match the window exactly (Vulkan on X11) may report the surface
//! as outdated instead; the render system reconfigures it and keeps going.

use glam::Mat4;

/// Vertical field of view, in degrees
pub const DEFAULT_FOV_DEGREES: f32 = 35.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 400.0;

/// Highest device pixel ratio used for the backing surface
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Backing surface size in physical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Perspective projection and surface sizing for one window
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    fov_degrees: f32,
    near: f32,
    far: f32,
    max_pixel_ratio: f32,
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
}

impl Viewport {
    /// Create a viewport for a window of `width` x `height` logical pixels
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let mut viewport = Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            max_pixel_ratio: MAX_PIXEL_RATIO,
            width: 1.0,
            height: 1.0,
            device_pixel_ratio: 1.0,
        };
        viewport.resize(width, height, device_pixel_ratio);
        viewport
    }

    /// Builder: set the vertical field of view in degrees
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    /// Builder: set the clip planes
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Builder: cap the pixel ratio used for the backing surface
    pub fn with_max_pixel_ratio(mut self, max_pixel_ratio: f32) -> Self {
        self.max_pixel_ratio = max_pixel_ratio.max(f32::MIN_POSITIVE);
        self
    }

    /// Apply a new logical size and device pixel ratio
    ///
    /// Zero or negative dimensions are treated as 1; an invalid pixel ratio
    /// is treated as 1. Returns the backing size to configure the surface with.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> SurfaceSize {
        self.width = sanitize_dimension(width);
        self.height = sanitize_dimension(height);

        self.device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        let size = self.backing_size();
        log::debug!(
            "Viewport {}x{} @ {} -> surface {}x{}",
            self.width,
            self.height,
            self.pixel_ratio(),
            size.width,
            size.height
        );
        size
    }

    /// Logical width divided by logical height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Effective pixel ratio, after the cap
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(self.max_pixel_ratio)
    }

    /// Whether the backing surface is smaller than the window's physical size
    pub fn is_ratio_capped(&self) -> bool {
        self.device_pixel_ratio > self.max_pixel_ratio
    }

    pub fn backing_size(&self) -> SurfaceSize {
        SurfaceSize {
            width: ((self.width * self.pixel_ratio()).round() as u32).max(1),
            height: ((self.height * self.pixel_ratio()).round() as u32).max(1),
        }
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Right-handed perspective projection with 0..1 depth
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect(), self.near, self.far)
    }
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() && value >= 1.0 {
        value
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        assert_eq!(viewport.fov_degrees(), 35.0);
        assert_eq!(viewport.near(), 0.1);
        assert_eq!(viewport.far(), 400.0);
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_standard_display() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0);
        let size = viewport.resize(1920.0, 1080.0, 1.0);
        assert_eq!(size, SurfaceSize { width: 1920, height: 1080 });
        assert!((viewport.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_caps_pixel_ratio() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0);
        let size = viewport.resize(1000.0, 500.0, 3.0);
        assert_eq!(size, SurfaceSize { width: 2000, height: 1000 });
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert!(viewport.is_ratio_capped());
        // Aspect ignores the pixel ratio
        assert_eq!(viewport.aspect(), 2.0);

        viewport.resize(1000.0, 500.0, 2.0);
        assert!(!viewport.is_ratio_capped());
    }

    #[test]
    fn test_resize_fractional_ratio() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0);
        let size = viewport.resize(800.0, 600.0, 1.5);
        assert_eq!(size, SurfaceSize { width: 1200, height: 900 });
    }

    #[test]
    fn test_resize_property_over_grid() {
        let mut viewport = Viewport::new(1.0, 1.0, 1.0);
        for &(w, h) in &[(640.0, 480.0), (1.0, 1000.0), (3840.0, 2160.0), (333.0, 777.0)] {
            for &dpr in &[0.5, 1.0, 1.25, 2.0, 2.5, 4.0] {
                let size = viewport.resize(w, h, dpr);
                let ratio = f32::min(dpr, 2.0);
                assert_eq!(viewport.aspect(), w / h);
                assert_eq!(size.width, ((w * ratio).round() as u32).max(1));
                assert_eq!(size.height, ((h * ratio).round() as u32).max(1));
            }
        }
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0);
        let size = viewport.resize(0.0, 0.0, 1.0);
        assert_eq!(size, SurfaceSize { width: 1, height: 1 });
        assert!(viewport.aspect().is_finite());
        assert!(viewport.projection_matrix().is_finite());
    }

    #[test]
    fn test_invalid_pixel_ratio() {
        let mut viewport = Viewport::new(100.0, 100.0, 1.0);
        viewport.resize(100.0, 100.0, f32::NAN);
        assert_eq!(viewport.pixel_ratio(), 1.0);
        viewport.resize(100.0, 100.0, 0.0);
        assert_eq!(viewport.pixel_ratio(), 1.0);
    }

    #[test]
    fn test_custom_pixel_ratio_cap() {
        let viewport = Viewport::new(100.0, 50.0, 3.0).with_max_pixel_ratio(3.0);
        assert_eq!(viewport.pixel_ratio(), 3.0);
        assert_eq!(viewport.backing_size(), SurfaceSize { width: 300, height: 150 });
    }

    #[test]
    fn test_projection_depth_range() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let proj = viewport.projection_matrix();

        let near = proj.project_point3(glam::Vec3::new(0.0, 0.0, -0.1));
        let far = proj.project_point3(glam::Vec3::new(0.0, 0.0, -400.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
