//! Scene construction from descriptors
//!
//! Turns a [`SystemDescriptor`] into a [`World`]: one emissive sun, one root
//! node per planet, and one child node per moon. Planets are attached to the
//! scene root rather than to the sun so they orbit the origin. Moons are
//! attached to their planet so their orbit follows it.

use std::sync::Arc;

use glam::Vec3;

use crate::descriptor::{BodyDescriptor, SystemDescriptor};
use crate::graph::{NodeId, SceneGraph};
use crate::node::{Material, Motion, Orbit, SceneNode, SphereGeometry};
use crate::validation::{SystemValidator, ValidationError};
use crate::{Transform, World};

/// Error building a scene
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The descriptor table failed validation
    #[error("invalid system description: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
    /// A moon's planet was not in the graph
    #[error("cannot attach '{moon}': parent node {parent:?} does not exist")]
    MissingParent { moon: String, parent: NodeId },
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build a world from a validated system description
///
/// Every node shares `geometry`. Planets start at `(orbital_distance, 0, 0)`
/// with zero rotation; moons start at the same offset in their planet's
/// local space.
pub fn build(system: &SystemDescriptor, geometry: Arc<SphereGeometry>) -> Result<World, BuildError> {
    let errors = SystemValidator::validate(system);
    if !errors.is_empty() {
        return Err(BuildError::Invalid(errors));
    }

    let mut graph = SceneGraph::with_capacity(system.body_count());

    let sun = graph.add_root(SceneNode::new(
        system.sun.name.clone(),
        Transform::identity().with_scale(system.sun.radius),
        geometry.clone(),
        Material::from(&system.sun.material),
        Motion::Spin,
    ));

    let mut planets = Vec::with_capacity(system.planets.len());
    for planet in &system.planets {
        let planet_id = graph.add_root(orbiting_node(planet, geometry.clone()));
        for moon in &planet.children {
            add_moon(&mut graph, planet_id, moon, geometry.clone())?;
        }
        planets.push(planet_id);
    }

    log::info!(
        "Built '{}': {} planets, {} nodes",
        system.name,
        planets.len(),
        graph.len()
    );

    Ok(World::new(system.name.clone(), graph, sun, planets))
}

fn add_moon(
    graph: &mut SceneGraph,
    planet: NodeId,
    moon: &BodyDescriptor,
    geometry: Arc<SphereGeometry>,
) -> Result<NodeId, BuildError> {
    graph
        .add_child(planet, orbiting_node(moon, geometry))
        .ok_or_else(|| BuildError::MissingParent {
            moon: moon.name.clone(),
            parent: planet,
        })
}

fn orbiting_node(body: &BodyDescriptor, geometry: Arc<SphereGeometry>) -> SceneNode {
    let transform = Transform::from_position(Vec3::new(body.orbital_distance, 0.0, 0.0))
        .with_scale(body.radius);

    SceneNode::new(
        body.name.clone(),
        transform,
        geometry,
        Material::from(&body.material),
        Motion::Orbit(Orbit {
            orbital_distance: body.orbital_distance,
            angular_speed: body.angular_speed,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Shading;

    fn build_default() -> World {
        build(&SystemDescriptor::default(), Arc::new(SphereGeometry::default())).unwrap()
    }

    #[test]
    fn test_sun_is_root_and_emissive() {
        let world = build_default();
        let sun = world.node(world.sun()).unwrap();

        assert_eq!(sun.name, "Sun");
        assert!(sun.parent().is_none());
        assert_eq!(sun.transform.scale, 5.0);
        assert!(sun.material.is_emissive());
        assert_eq!(sun.motion, Motion::Spin);
    }

    #[test]
    fn test_planets_attached_to_scene_root() {
        let world = build_default();
        assert_eq!(world.planets().len(), 4);

        for &planet in world.planets() {
            let node = world.node(planet).unwrap();
            assert!(node.parent().is_none(), "{} should not be parented", node.name);
            assert_eq!(node.material.shading, Shading::Lit);
        }
        // Sun + planets
        assert_eq!(world.graph().roots().len(), 5);
    }

    #[test]
    fn test_initial_planet_transform() {
        let world = build_default();
        let (_, earth) = world.find("Earth").unwrap();

        assert_eq!(earth.transform.position, Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(earth.transform.rotation_y, 0.0);
        assert_eq!(earth.transform.scale, 1.0);
    }

    #[test]
    fn test_moons_are_children_of_their_planet() {
        let world = build_default();
        let (mars, _) = world.find("Mars").unwrap();
        let moons = world.moons(mars);

        let names: Vec<_> = moons.iter().map(|&m| world.node(m).unwrap().name.as_str()).collect();
        assert_eq!(names, ["Phobos", "Deimos"]);

        for &moon in moons {
            assert_eq!(world.graph().parent(moon), Some(mars));
            assert_eq!(world.graph().depth(moon), 2);
        }

        let deimos = world.node(moons[1]).unwrap();
        assert_eq!(deimos.transform.position, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(deimos.transform.scale, 0.2);
    }

    #[test]
    fn test_geometry_is_shared() {
        let geometry = Arc::new(SphereGeometry::default());
        let world = build(&SystemDescriptor::default(), geometry.clone()).unwrap();

        for (_, node) in world.iter() {
            assert!(Arc::ptr_eq(&node.geometry, &geometry));
        }
        // One reference per node plus ours
        assert_eq!(Arc::strong_count(&geometry), world.node_count() + 1);
    }

    #[test]
    fn test_node_carries_descriptor_orbit() {
        let world = build_default();
        let (_, moon) = world.find("Moon").unwrap();
        assert_eq!(
            moon.orbit(),
            Some(&Orbit { orbital_distance: 2.0, angular_speed: 0.015 })
        );
    }

    #[test]
    fn test_invalid_system_rejected() {
        let mut system = SystemDescriptor::default();
        system.planets[0].radius = -0.5;

        let err = build(&system, Arc::new(SphereGeometry::default())).unwrap_err();
        let BuildError::Invalid(errors) = &err else {
            panic!("expected a validation error, got {}", err);
        };
        assert_eq!(errors.len(), 1);
        assert!(err.to_string().contains("Mercury"));
    }

    #[test]
    fn test_empty_planet_list() {
        let system = SystemDescriptor {
            name: "Lonely".to_string(),
            sun: Default::default(),
            planets: Vec::new(),
        };
        let world = build(&system, Arc::new(SphereGeometry::default())).unwrap();
        assert_eq!(world.node_count(), 1);
        assert!(world.planets().is_empty());
    }

    #[test]
    fn test_moon_without_parent_is_error() {
        let geometry = Arc::new(SphereGeometry::default());
        let moon = BodyDescriptor::new("Stray", 0.1, 1.0, 0.01);

        // An id taken from a larger graph does not exist in an empty one
        let mut other = SceneGraph::new();
        let foreign = (0..4)
            .map(|_| other.add_root(orbiting_node(&moon, geometry.clone())))
            .last()
            .unwrap();

        let mut graph = SceneGraph::new();
        let err = add_moon(&mut graph, foreign, &moon, geometry).unwrap_err();
        assert!(matches!(&err, BuildError::MissingParent { moon, .. } if moon == "Stray"));
        assert!(err.to_string().contains("Stray"));
        assert!(graph.is_empty());
    }
}
