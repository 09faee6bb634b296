//! Per-frame animation update
//!
//! Each tick the sun spins by a fixed amount and every orbiting body adds
//! `ORBIT_SPEED_SCALE * angular_speed` to its rotation. The same angle is
//! then used as the orbital phase: the body sits at
//! `(sin(angle) * distance, y, cos(angle) * distance)` in its parent's space.
//! Moons are expressed in their planet's local frame, so the hierarchy
//! carries them along.

use crate::graph::NodeId;
use crate::node::Motion;
use crate::World;

/// Sun spin per tick, in radians
pub const SUN_SPIN_PER_TICK: f32 = 0.01;

/// Visual speed multiplier applied to every descriptor's angular speed
pub const ORBIT_SPEED_SCALE: f32 = 3.0;

/// Advance the world by one tick
///
/// Order: sun, then each planet in descriptor order followed by its moons in
/// child order.
pub fn advance(world: &mut World) {
    let sun = world.sun;
    step_node(world, sun);

    for i in 0..world.planets.len() {
        let planet = world.planets[i];
        step_node(world, planet);

        for j in 0..world.graph.children(planet).len() {
            let moon = world.graph.children(planet)[j];
            step_node(world, moon);
        }
    }

    world.tick += 1;
}

/// Advance the world by `ticks` ticks
pub fn advance_by(world: &mut World, ticks: u32) {
    for _ in 0..ticks {
        advance(world);
    }
}

fn step_node(world: &mut World, id: NodeId) {
    let Some(node) = world.graph.get_mut(id) else {
        return;
    };

    match node.motion {
        Motion::Spin => node.transform.rotate_y(SUN_SPIN_PER_TICK),
        Motion::Orbit(orbit) => {
            let transform = &mut node.transform;
            transform.rotate_y(ORBIT_SPEED_SCALE * orbit.angular_speed);
            transform.position.x = transform.rotation_y.sin() * orbit.orbital_distance;
            transform.position.z = transform.rotation_y.cos() * orbit.orbital_distance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BodyDescriptor, SystemDescriptor};
    use crate::node::SphereGeometry;
    use crate::scene_builder::build;
    use glam::Vec3;
    use std::sync::Arc;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn single_planet(distance: f32, speed: f32) -> World {
        let system = SystemDescriptor {
            name: "Test".to_string(),
            sun: Default::default(),
            planets: vec![BodyDescriptor::new("P", 1.0, distance, speed)],
        };
        build(&system, Arc::new(SphereGeometry::default())).unwrap()
    }

    #[test]
    fn test_one_tick_scenario() {
        let mut world = single_planet(20.0, 0.005);
        advance(&mut world);

        let planet = world.node(world.planets()[0]).unwrap();
        let t = planet.transform;
        assert!(approx_eq(t.rotation_y, 0.015), "rotation = {}", t.rotation_y);
        assert!(approx_eq(t.position.x, 0.29997), "x = {}", t.position.x);
        assert!(approx_eq(t.position.z, 19.99775), "z = {}", t.position.z);
        assert_eq!(t.position.y, 0.0);
    }

    #[test]
    fn test_sun_spins_fixed_increment() {
        let mut world = single_planet(10.0, 0.5);
        advance_by(&mut world, 10);

        let sun = world.node(world.sun()).unwrap();
        assert!(approx_eq(sun.transform.rotation_y, 0.1));
        // The sun never moves
        assert_eq!(sun.transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_zero_ticks_keeps_defaults() {
        let world = single_planet(12.0, 0.01);
        let t = world.node(world.planets()[0]).unwrap().transform;
        assert_eq!(t.position, Vec3::new(12.0, 0.0, 0.0));
        assert_eq!(t.rotation_y, 0.0);
        assert_eq!(world.tick(), 0);
    }

    #[test]
    fn test_first_tick_jumps_to_circle() {
        // After the first tick x = sin(r) * d, not the initial x = d
        let mut world = single_planet(12.0, 0.0);
        advance(&mut world);
        let t = world.node(world.planets()[0]).unwrap().transform;
        assert!(approx_eq(t.position.x, 0.0));
        assert!(approx_eq(t.position.z, 12.0));
    }

    #[test]
    fn test_tick_counter() {
        let mut world = single_planet(1.0, 0.1);
        advance_by(&mut world, 7);
        assert_eq!(world.tick(), 7);
    }

    #[test]
    fn test_negative_speed_orbits_backwards() {
        let mut world = single_planet(5.0, -0.1);
        advance(&mut world);
        let t = world.node(world.planets()[0]).unwrap().transform;
        assert!(approx_eq(t.rotation_y, -0.3));
        assert!(t.position.x < 0.0);
    }
}
