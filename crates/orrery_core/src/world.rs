//! World context
//!
//! The [`World`] owns the scene graph and remembers which nodes are the sun
//! and the planets. It is built once by
//! [`scene_builder::build`](crate::scene_builder::build) and then handed
//! explicitly to the animation update and the renderer.

use glam::{Mat4, Vec3};

use crate::graph::{NodeId, SceneGraph};
use crate::node::SceneNode;

/// The running solar system
#[derive(Debug)]
pub struct World {
    name: String,
    pub(crate) graph: SceneGraph,
    pub(crate) sun: NodeId,
    pub(crate) planets: Vec<NodeId>,
    pub(crate) tick: u64,
}

impl World {
    pub(crate) fn new(name: String, graph: SceneGraph, sun: NodeId, planets: Vec<NodeId>) -> Self {
        Self {
            name,
            graph,
            sun,
            planets,
            tick: 0,
        }
    }

    /// Name of the system this world was built from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The sun node
    pub fn sun(&self) -> NodeId {
        self.sun
    }

    /// Top-level planet nodes in descriptor order
    pub fn planets(&self) -> &[NodeId] {
        &self.planets
    }

    /// Moons of a planet in descriptor order
    pub fn moons(&self, planet: NodeId) -> &[NodeId] {
        self.graph.children(planet)
    }

    /// Number of animation ticks applied so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.graph.get(id)
    }

    /// Find a node by body name
    pub fn find(&self, name: &str) -> Option<(NodeId, &SceneNode)> {
        self.graph.find(name)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// Iterate over every node in storage order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.graph.iter()
    }

    /// World matrices for every node, indexed by [`NodeId::index`]
    pub fn world_matrices(&self) -> Vec<Mat4> {
        self.graph.world_matrices()
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.graph.world_matrix(id).transform_point3(Vec3::ZERO)
    }
}
