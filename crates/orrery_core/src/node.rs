//! Scene nodes
//!
//! A [`SceneNode`] is the runtime counterpart of one body: a mutable
//! transform plus the visual data the renderer needs. Nodes are stored in a
//! [`SceneGraph`](crate::SceneGraph) arena and refer to each other by
//! [`NodeId`](crate::NodeId).

use std::sync::Arc;

use crate::descriptor::{MaterialDescriptor, Shading};
use crate::graph::NodeId;
use crate::Transform;

/// Parameters of the unit sphere shared by every body
///
/// The core never builds vertices itself; the renderer tessellates this once
/// and every node points at the same instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereGeometry {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 32,
        }
    }
}

impl SphereGeometry {
    pub fn new(width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius: 1.0,
            width_segments,
            height_segments,
        }
    }
}

/// Material attached to a single node
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub texture: Option<String>,
    pub color: [f32; 4],
    pub fallback_color: [f32; 4],
}

impl Material {
    pub fn is_emissive(&self) -> bool {
        self.shading == Shading::Emissive
    }
}

impl From<&MaterialDescriptor> for Material {
    fn from(desc: &MaterialDescriptor) -> Self {
        Self {
            shading: desc.shading,
            texture: desc.texture.clone(),
            color: desc.color,
            fallback_color: desc.fallback_color,
        }
    }
}

/// Circular orbit parameters copied from the originating descriptor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    pub orbital_distance: f32,
    pub angular_speed: f32,
}

/// How the animation update moves a node
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Spins in place (the sun)
    Spin,
    /// Rotation angle drives the orbital position
    Orbit(Orbit),
}

/// Runtime node for one body
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    /// Local transform, relative to the parent
    pub transform: Transform,
    pub geometry: Arc<SphereGeometry>,
    pub material: Material,
    pub motion: Motion,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(
        name: impl Into<String>,
        transform: Transform,
        geometry: Arc<SphereGeometry>,
        material: Material,
        motion: Motion,
    ) -> Self {
        Self {
            name: name.into(),
            transform,
            geometry,
            material,
            motion,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Parent node, `None` for nodes attached to the scene root
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Orbit parameters, if this node orbits
    pub fn orbit(&self) -> Option<&Orbit> {
        match &self.motion {
            Motion::Orbit(orbit) => Some(orbit),
            Motion::Spin => None,
        }
    }
}
