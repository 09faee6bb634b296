//! Renderable instances - bridges World to GPU buffers
//!
//! Flattens the scene graph into one [`InstanceRaw`] per node, in node
//! order, so instance `i` always belongs to `NodeId` index `i`.

use orrery_core::World;

use crate::pipeline::InstanceRaw;

/// Collect per-node instance data from the world's current transforms
///
/// `tints` supplies the color to multiply with each node's texture; nodes
/// without an entry use their material color.
pub fn collect_instances(world: &World, tints: &[[f32; 4]]) -> Vec<InstanceRaw> {
    let matrices = world.world_matrices();

    world
        .iter()
        .zip(matrices)
        .map(|((id, node), model)| {
            let color = tints.get(id.index()).copied().unwrap_or(node.material.color);
            InstanceRaw::new(model, color, node.material.is_emissive())
        })
        .collect()
}
