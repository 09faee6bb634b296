//! Core types for the orrery
//!
//! This crate holds everything that does not touch the GPU:
//!
//! - [`SystemDescriptor`] / [`BodyDescriptor`] - static body configuration
//! - [`SystemValidator`] - rejects malformed tables before anything is built
//! - [`SceneGraph`] / [`SceneNode`] - arena of runtime nodes
//! - [`scene_builder::build`] - descriptors to [`World`]
//! - [`animation::advance`] - the per-frame transform update

pub mod animation;
mod descriptor;
mod graph;
mod node;
pub mod scene_builder;
mod transform;
mod validation;
mod world;

pub use descriptor::{
    BodyDescriptor, MaterialDescriptor, Shading, SunDescriptor, SystemDescriptor, SystemLoadError,
};
pub use graph::{NodeId, SceneGraph};
pub use node::{Material, Motion, Orbit, SceneNode, SphereGeometry};
pub use scene_builder::BuildError;
pub use transform::Transform;
pub use validation::{SystemValidator, ValidationError, MAX_DEPTH};
pub use world::World;

// Re-export math types used in the public API
pub use glam::{Mat4, Vec3};
