//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;
use crate::systems::frame_loop::FrameScheduler;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(attrs)?);

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Current device pixel ratio
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Update window title with animation state
    pub fn update_title(&self, paused: bool, tick: Option<u64>) {
        self.window.set_title(&format_title(&self.base_title, paused, tick));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl FrameScheduler for WindowSystem {
    fn request_next_frame(&mut self) {
        self.request_redraw();
    }
}

fn format_title(base: &str, paused: bool, tick: Option<u64>) -> String {
    let mut title = base.to_string();
    if let Some(tick) = tick {
        title.push_str(&format!(" - tick {}", tick));
    }
    if paused {
        title.push_str(" [Paused - Space to resume]");
    }
    title
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Window creation failed: {0}")]
    CreationFailed(#[from] winit::error::OsError),
}
