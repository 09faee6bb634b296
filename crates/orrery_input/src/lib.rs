//! Orrery input handling
//!
//! This crate provides mouse-driven orbit camera control with optional
//! damping.

mod orbit_controller;

pub use orbit_controller::{CameraControl, OrbitController};
