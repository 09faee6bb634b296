//! Integration tests for the build-then-animate pipeline
//!
//! These tests verify the behaviour of the whole core crate on the built-in
//! system table:
//! 1. Rotation accumulates linearly with the tick count
//! 2. Orbital position is always a function of the current rotation
//! 3. Moons stay attached to their planet and follow it through space
//! 4. Sibling moons never influence each other

use std::f32::consts::TAU;
use std::sync::Arc;

use orrery_core::{
    animation::{self, ORBIT_SPEED_SCALE},
    scene_builder, BodyDescriptor, Motion, SphereGeometry, SystemDescriptor, Vec3, World,
};

const EPSILON: f32 = 1e-3;

fn build_default() -> World {
    scene_builder::build(&SystemDescriptor::default(), Arc::new(SphereGeometry::default()))
        .expect("default system should build")
}

fn wrap(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

// ==================== Kinematics ====================

#[test]
fn test_rotation_after_n_ticks() {
    let mut world = build_default();
    let ticks = 250;
    animation::advance_by(&mut world, ticks);

    for (_, node) in world.iter() {
        let Some(orbit) = node.orbit() else { continue };
        let expected = ticks as f32 * ORBIT_SPEED_SCALE * orbit.angular_speed;
        let actual = node.transform.rotation_y;
        assert!(
            (wrap(actual) - wrap(expected)).abs() < EPSILON,
            "{}: expected {} got {}",
            node.name,
            expected,
            actual
        );
    }
}

#[test]
fn test_position_is_function_of_rotation() {
    let mut world = build_default();

    for _ in 0..100 {
        animation::advance(&mut world);

        for (_, node) in world.iter() {
            let Some(orbit) = node.orbit() else { continue };
            let t = node.transform;
            assert!((t.position.x - t.rotation_y.sin() * orbit.orbital_distance).abs() < EPSILON);
            assert!((t.position.z - t.rotation_y.cos() * orbit.orbital_distance).abs() < EPSILON);
            assert_eq!(t.position.y, 0.0);
        }
    }
}

#[test]
fn test_orbit_radius_is_constant() {
    let mut world = build_default();
    animation::advance_by(&mut world, 1234);

    for &planet in world.planets() {
        let node = world.node(planet).unwrap();
        let distance = node.orbit().unwrap().orbital_distance;
        let p = node.transform.position;
        assert!((Vec3::new(p.x, 0.0, p.z).length() - distance).abs() < EPSILON);
    }
}

#[test]
fn test_zero_ticks_leaves_construction_defaults() {
    let world = build_default();

    for (_, node) in world.iter() {
        assert_eq!(node.transform.rotation_y, 0.0);
        if let Some(orbit) = node.orbit() {
            assert_eq!(node.transform.position, Vec3::new(orbit.orbital_distance, 0.0, 0.0));
        }
    }
}

// ==================== Hierarchy ====================

#[test]
fn test_moons_never_leave_their_planet() {
    let mut world = build_default();
    let (earth, _) = world.find("Earth").unwrap();
    let (moon, _) = world.find("Moon").unwrap();

    for _ in 0..50 {
        animation::advance(&mut world);
        assert_eq!(world.graph().parent(moon), Some(earth));
        assert!(!world.graph().roots().contains(&moon));
    }
}

#[test]
fn test_moon_world_position_follows_planet() {
    let mut world = build_default();
    animation::advance_by(&mut world, 40);

    let (earth, earth_node) = world.find("Earth").unwrap();
    let (moon, moon_node) = world.find("Moon").unwrap();

    // Compose by hand: planet scale, then planet rotation, then planet translation
    let expected = earth_node.transform.transform_point(moon_node.transform.position);
    let actual = world.world_position(moon);
    assert!((expected - actual).length() < EPSILON, "{:?} vs {:?}", expected, actual);

    // The batched path agrees with the single-node path
    let matrices = world.world_matrices();
    let batched = matrices[moon.index()].transform_point3(Vec3::ZERO);
    assert!((batched - actual).length() < EPSILON);
    assert!((world.world_position(earth) - earth_node.transform.position).length() < EPSILON);
}

#[test]
fn test_sibling_moons_are_independent() {
    let mut baseline = build_default();
    animation::advance_by(&mut baseline, 77);
    let phobos_before = baseline.find("Phobos").unwrap().1.transform;

    // Change only Deimos and rebuild: Phobos must be unaffected
    let mut system = SystemDescriptor::default();
    let deimos = &mut system.planets[3].children[1];
    deimos.angular_speed = 0.9;
    deimos.orbital_distance = 7.5;

    let mut world =
        scene_builder::build(&system, Arc::new(SphereGeometry::default())).unwrap();
    animation::advance_by(&mut world, 77);

    let phobos_after = world.find("Phobos").unwrap().1.transform;
    assert_eq!(phobos_before, phobos_after);

    let deimos_after = world.find("Deimos").unwrap().1;
    assert!(
        (deimos_after.transform.rotation_y - 77.0 * ORBIT_SPEED_SCALE * 0.9).abs() < 1e-2
    );
}

#[test]
fn test_added_moon_updates_with_its_own_descriptor() {
    let mut system = SystemDescriptor::default();
    system.planets[0] = system.planets[0]
        .clone()
        .with_child(BodyDescriptor::new("Tiny", 0.1, 1.0, 0.1));

    let mut world =
        scene_builder::build(&system, Arc::new(SphereGeometry::default())).unwrap();
    animation::advance(&mut world);

    let (_, tiny) = world.find("Tiny").unwrap();
    assert!(matches!(tiny.motion, Motion::Orbit(_)));
    assert!((tiny.transform.rotation_y - 0.3).abs() < EPSILON);
}

// ==================== RON loading ====================

#[test]
fn test_ron_round_trip_builds_same_world() {
    let system = SystemDescriptor::default();
    let text = ron::ser::to_string_pretty(&system, ron::ser::PrettyConfig::default()).unwrap();
    let parsed = SystemDescriptor::from_ron_str(&text).unwrap();
    assert_eq!(parsed, system);

    let world = scene_builder::build(&parsed, Arc::new(SphereGeometry::default())).unwrap();
    assert_eq!(world.node_count(), system.body_count());
}
