//! Orrery rendering library
//!
//! This crate provides the wgpu-based pipeline that draws the solar system.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`viewport::Viewport`] - projection and backing-size tracking
//! - [`camera::Camera`] - look-at camera driven by the orbit controller
//! - [`geometry::SphereMesh`] - the UV sphere shared by every body
//! - [`texture::TextureCache`] - body textures with color fallback
//! - [`skybox::SkyboxPipeline`] - cube map background
//! - [`pipeline::BodyPipeline`] - textured, lit sphere rendering
//! - [`renderable::collect_instances`] - converts World to per-node instances

pub mod camera;
pub mod context;
pub mod geometry;
pub mod pipeline;
pub mod renderable;
pub mod skybox;
pub mod texture;
pub mod viewport;

// Re-export core types for convenience
pub use orrery_core::{Material, NodeId, SphereGeometry, World};

pub use renderable::collect_instances;
