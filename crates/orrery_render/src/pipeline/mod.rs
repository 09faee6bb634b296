//! Rendering pipeline components

pub mod body_pipeline;
pub mod types;

pub use body_pipeline::{Background, BodyPipeline, DEPTH_FORMAT};
pub use types::{InstanceRaw, Lighting, SceneUniforms, Vertex};
