//! Orrery - an animated solar system
//!
//! Library half of the `orrery` binary: configuration, the window and render
//! systems, the frame loop driver and key mapping.

pub mod config;
pub mod input;
pub mod systems;
