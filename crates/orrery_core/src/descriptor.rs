//! Body descriptors
//!
//! Static configuration for every body in the system. Descriptors are plain
//! data: they are read once by the scene builder and never change afterwards.
//! A [`SystemDescriptor`] can come from the built-in table
//! ([`SystemDescriptor::default`]) or from a RON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// How a material reacts to light
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shading {
    /// Self-illuminated; ignores all lights (the sun)
    Emissive,
    /// Ambient plus point-light diffuse shading
    #[default]
    Lit,
}

/// Visual material of a body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    #[serde(default)]
    pub shading: Shading,
    /// Texture file name, resolved against the configured texture directory
    #[serde(default)]
    pub texture: Option<String>,
    /// RGBA tint multiplied with whatever is sampled
    #[serde(default = "MaterialDescriptor::default_color")]
    pub color: [f32; 4],
    /// Texel color used when there is no texture or it cannot be loaded
    #[serde(default = "MaterialDescriptor::default_color")]
    pub fallback_color: [f32; 4],
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self {
            shading: Shading::Lit,
            texture: None,
            color: Self::default_color(),
            fallback_color: Self::default_color(),
        }
    }
}

impl MaterialDescriptor {
    fn default_color() -> [f32; 4] {
        [1.0, 1.0, 1.0, 1.0]
    }

    /// A lit material sampling `texture`
    pub fn lit(texture: impl Into<String>) -> Self {
        Self {
            shading: Shading::Lit,
            texture: Some(texture.into()),
            ..Self::default()
        }
    }

    /// A self-illuminated material sampling `texture`
    pub fn emissive(texture: impl Into<String>) -> Self {
        Self {
            shading: Shading::Emissive,
            texture: Some(texture.into()),
            ..Self::default()
        }
    }

    /// Builder: set the tint color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Builder: set the color shown when the texture is unavailable
    pub fn with_fallback_color(mut self, color: [f32; 4]) -> Self {
        self.fallback_color = color;
        self
    }
}

/// Static description of one orbiting body (planet or moon)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub name: String,
    /// Uniform scale applied to the shared unit sphere
    pub radius: f32,
    /// Radius of the circular path around the parent
    pub orbital_distance: f32,
    /// Rotation increment per tick, before the global speed scale
    pub angular_speed: f32,
    #[serde(default)]
    pub material: MaterialDescriptor,
    /// Moons, in update order
    #[serde(default)]
    pub children: Vec<BodyDescriptor>,
}

impl BodyDescriptor {
    pub fn new(name: impl Into<String>, radius: f32, orbital_distance: f32, angular_speed: f32) -> Self {
        Self {
            name: name.into(),
            radius,
            orbital_distance,
            angular_speed,
            material: MaterialDescriptor::default(),
            children: Vec::new(),
        }
    }

    pub fn with_material(mut self, material: MaterialDescriptor) -> Self {
        self.material = material;
        self
    }

    pub fn with_child(mut self, child: BodyDescriptor) -> Self {
        self.children.push(child);
        self
    }
}

/// The central star
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SunDescriptor {
    pub name: String,
    pub radius: f32,
    pub material: MaterialDescriptor,
}

impl Default for SunDescriptor {
    fn default() -> Self {
        Self {
            name: "Sun".to_string(),
            radius: 5.0,
            material: MaterialDescriptor::emissive("2k_sun.jpg")
                .with_fallback_color([1.0, 0.75, 0.25, 1.0]),
        }
    }
}

/// The whole configuration table: one sun and its planets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    pub name: String,
    #[serde(default)]
    pub sun: SunDescriptor,
    pub planets: Vec<BodyDescriptor>,
}

impl Default for SystemDescriptor {
    /// The inner solar system with exaggerated sizes and speeds
    fn default() -> Self {
        let lit = |texture: &str, fallback: [f32; 4]| {
            MaterialDescriptor::lit(texture).with_fallback_color(fallback)
        };
        let moon = |fallback: [f32; 4]| lit("2k_moon.jpg", fallback);

        Self {
            name: "Inner Solar System".to_string(),
            sun: SunDescriptor::default(),
            planets: vec![
                BodyDescriptor::new("Mercury", 0.5, 10.0, 0.01)
                    .with_material(lit("2k_mercury.jpg", [0.5, 0.5, 0.5, 1.0])),
                BodyDescriptor::new("Venus", 0.8, 15.0, 0.007)
                    .with_material(lit("2k_venus_surface.jpg", [0.875, 0.75, 0.5, 1.0])),
                BodyDescriptor::new("Earth", 1.0, 20.0, 0.005)
                    .with_material(lit("2k_earth_daymap.jpg", [0.25, 0.5, 0.875, 1.0]))
                    .with_child(
                        BodyDescriptor::new("Moon", 0.3, 2.0, 0.015)
                            .with_material(moon([0.75, 0.75, 0.75, 1.0])),
                    ),
                BodyDescriptor::new("Mars", 0.7, 25.0, 0.003)
                    .with_material(lit("2k_mars.jpg", [0.75, 0.25, 0.125, 1.0]))
                    .with_child(
                        BodyDescriptor::new("Phobos", 0.1, 2.0, 0.02)
                            .with_material(moon([0.375, 0.375, 0.375, 1.0])),
                    )
                    .with_child(
                        BodyDescriptor::new("Deimos", 0.2, 3.0, 0.015)
                            .with_material(moon([0.625, 0.625, 0.625, 1.0])),
                    ),
            ],
        }
    }
}

impl SystemDescriptor {
    /// Load a system from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SystemLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse a system from RON text
    pub fn from_ron_str(contents: &str) -> Result<Self, SystemLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Total number of bodies including the sun
    pub fn body_count(&self) -> usize {
        1 + self
            .planets
            .iter()
            .map(|p| 1 + p.children.len())
            .sum::<usize>()
    }
}

/// Error loading a system description
#[derive(Debug, thiserror::Error)]
pub enum SystemLoadError {
    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Parse error (invalid RON syntax or unknown fields)
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
