//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod frame_loop;
mod render;
mod window;

pub use frame_loop::{FrameLoop, FrameOutcome, FrameScheduler, SceneRenderer, StopHandle};
pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
