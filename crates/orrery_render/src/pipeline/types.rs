//! GPU-compatible data types for the body pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// A vertex of the shared sphere mesh
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Outward surface normal
    pub normal: [f32; 3],
    /// Texture coordinate (equirectangular)
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

/// Per-node instance data
///
/// One entry per scene node, drawn with a single-instance range so every
/// node can bind its own texture.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// World matrix, column-major
    pub model: [[f32; 4]; 4],
    /// RGBA tint multiplied with the sampled texel
    pub color: [f32; 4],
    /// x: 1.0 for emissive, 0.0 for lit; yzw unused
    pub params: [f32; 4],
}

impl InstanceRaw {
    pub fn new(model: Mat4, color: [f32; 4], emissive: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            params: [if emissive { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.params[0] > 0.5
    }
}

/// Light setup shared by every lit body
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    /// Point light position in world space
    pub light_position: Vec3,
    /// Point light intensity; irradiance falls off with the squared distance
    pub light_intensity: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light_position: Vec3::ZERO,
            light_intensity: 500.0,
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.1,
        }
    }
}

/// Scene uniforms for the body pass
/// Layout: 112 bytes total (must match body.wgsl SceneUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Camera position, w unused (16 bytes)
    pub camera_position: [f32; 4],
    /// Point light position, w = intensity (16 bytes)
    pub light: [f32; 4],
    /// Ambient color, w = intensity (16 bytes)
    pub ambient: [f32; 4],
}

impl SceneUniforms {
    pub fn new(view_proj: Mat4, camera_position: Vec3, lighting: &Lighting) -> Self {
        let [r, g, b] = lighting.ambient_color;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).to_array(),
            light: lighting.light_position.extend(lighting.light_intensity).to_array(),
            ambient: [r, g, b, lighting.ambient_intensity],
        }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ZERO, &Lighting::default())
    }
}
