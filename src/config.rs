//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`ORRERY_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use orrery_render::skybox::DEFAULT_FACES;
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Orbit control configuration
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Scene configuration
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`ORRERY_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // ORRERY_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("ORRERY_").split("__"));

        Ok(figment.extract()?)
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting eye position [x, y, z]
    pub start_position: [f32; 3],
    /// Point the camera orbits around [x, y, z]
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Cap on the device pixel ratio used for the surface
    pub max_pixel_ratio: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 5.0, 100.0],
            target: [0.0, 0.0, 0.0],
            fov: 35.0,
            near: 0.1,
            far: 400.0,
            max_pixel_ratio: 2.0,
        }
    }
}

/// Orbit control configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Enable damping (inertia) by default
    pub damping_enabled: bool,
    /// Fraction of pending motion applied per frame when damping
    pub damping_factor: f32,
    /// Orbit speed in radians per pixel dragged
    pub rotate_sensitivity: f32,
    /// Pan speed as a fraction of the orbit radius per pixel
    pub pan_sensitivity: f32,
    /// Wheel zoom speed
    pub zoom_speed: f32,
    /// Closest the camera may get to the target
    pub min_distance: f32,
    /// Farthest the camera may get from the target
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_enabled: true,
            damping_factor: 0.05,
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.001,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 350.0,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a], used when there is no skybox
    pub background_color: [f32; 4],
    /// Point light position [x, y, z]
    pub light_position: [f32; 3],
    /// Point light intensity (falls off with squared distance)
    pub light_intensity: f32,
    /// Ambient light color [r, g, b]
    pub ambient_color: [f32; 3],
    /// Ambient light intensity
    pub ambient_intensity: f32,
    /// Sphere segments around the equator
    pub sphere_width_segments: u32,
    /// Sphere segments from pole to pole
    pub sphere_height_segments: u32,
    /// Directory body textures are loaded from
    pub texture_dir: PathBuf,
    /// Cube map background
    pub skybox: SkyboxConfig,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.02, 1.0],
            light_position: [0.0, 0.0, 0.0],
            light_intensity: 500.0,
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.1,
            sphere_width_segments: 32,
            sphere_height_segments: 32,
            texture_dir: PathBuf::from("assets/textures"),
            skybox: SkyboxConfig::default(),
        }
    }
}

/// Skybox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    /// Draw the cube map; when off, or when a face fails to load, the
    /// background color is used
    pub enabled: bool,
    /// Directory holding the face images
    pub dir: PathBuf,
    /// Face file names in +X, -X, +Y, -Y, +Z, -Z order
    pub faces: [String; 6],
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("assets/textures/cubemap"),
            faces: DEFAULT_FACES.map(String::from),
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RON system description; the built-in system is used when unset
    pub path: Option<PathBuf>,
    /// Start with the animation paused
    pub start_paused: bool,
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Show tick count and pause state in the window title
    pub show_tick_in_title: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_tick_in_title: false,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.fov, 35.0);
        assert_eq!(config.camera.far, 400.0);
        assert_eq!(config.controls.damping_factor, 0.05);
        assert_eq!(config.rendering.light_intensity, 500.0);
        assert!(config.scene.path.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("damping_factor"));
        assert!(toml.contains("texture_dir"));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[camera]\nfov = 50.0\n").unwrap();
        assert_eq!(config.camera.fov, 50.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_skybox_section() {
        let config: AppConfig = toml::from_str(
            "[rendering.skybox]\nenabled = false\nfaces = [\"a\", \"b\", \"c\", \"d\", \"e\", \"f\"]\n",
        )
        .unwrap();
        let skybox = &config.rendering.skybox;
        assert!(!skybox.enabled);
        assert_eq!(skybox.faces[5], "f");
        assert_eq!(skybox.dir, PathBuf::from("assets/textures/cubemap"));

        let defaults = SkyboxConfig::default();
        assert_eq!(defaults.faces[0], "px.png");
        assert_eq!(defaults.faces[5], "nz.png");
    }

    #[test]
    fn test_skybox_needs_six_faces() {
        let result: Result<AppConfig, _> = toml::from_str("[rendering.skybox]\nfaces = [\"a\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::from(figment::Error::from("bad value".to_string()));
        assert!(err.to_string().starts_with("Configuration error"));
        assert!(err.to_string().contains("bad value"));
    }
}
