//! Render loop driver
//!
//! One [`FrameLoop::tick`] per displayed frame: advance the animation, apply
//! the orbit controls, draw, then ask the host for the next frame. Stopping
//! goes through a [`StopHandle`] which can be cloned and held anywhere; once
//! it is set no further frame does any work or reschedules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use orrery_core::{animation, World};
use orrery_input::OrbitController;
use orrery_render::camera::Camera;

/// Something that can schedule the next frame (the window, or a test double)
pub trait FrameScheduler {
    fn request_next_frame(&mut self);
}

/// Something that can draw the world from a camera
pub trait SceneRenderer {
    type Error;

    fn render_frame(&mut self, world: &World, camera: &Camera) -> Result<(), Self::Error>;
}

/// Shared cancellation flag for the frame loop
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop; idempotent
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What a call to [`FrameLoop::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was drawn and the next one requested
    Rendered,
    /// The loop is stopped; nothing was done
    Stopped,
}

/// Drives animation, controls and drawing once per frame
#[derive(Debug, Default)]
pub struct FrameLoop {
    stop: StopHandle,
    paused: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: start paused or running
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// A handle that stops this loop when triggered
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flip the pause state, returning the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("Animation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame
    ///
    /// The world is not advanced while paused, but controls and drawing still
    /// run. A render error is returned before the next frame is requested;
    /// the caller decides whether to recover and reschedule.
    pub fn tick<R, S>(
        &mut self,
        world: &mut World,
        controller: &mut OrbitController,
        camera: &mut Camera,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> Result<FrameOutcome, R::Error>
    where
        R: SceneRenderer,
        S: FrameScheduler,
    {
        if self.is_stopped() {
            return Ok(FrameOutcome::Stopped);
        }

        if !self.paused {
            animation::advance(world);
        }
        controller.update(camera);
        renderer.render_frame(world, camera)?;
        self.frames += 1;

        // The renderer may have triggered a stop through a shared handle
        if self.is_stopped() {
            return Ok(FrameOutcome::Stopped);
        }
        scheduler.request_next_frame();

        Ok(FrameOutcome::Rendered)
    }
}
