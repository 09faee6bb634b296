//! Body textures
//!
//! Images are decoded on the CPU with `image`, uploaded once, and shared
//! between every node using the same file. A texture that cannot be loaded
//! is replaced by a 1x1 texture of the material's fallback color so the body
//! still renders.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use orrery_core::Material;

/// Errors that can occur while loading a texture
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The file could not be read or decoded
    #[error("failed to load texture '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Width or height is zero
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// Decoded RGBA8 pixels
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decode an image file into RGBA8
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    /// A single texel of `color`
    pub fn solid(color: [f32; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: color_to_rgba8(color).to_vec(),
        }
    }
}

/// Convert a linear 0..1 color to 8-bit channels, clamping out-of-range values
pub fn color_to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// An uploaded texture and its default view
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub dimensions: (u32, u32),
}

impl GpuTexture {
    /// Upload an image as an sRGB texture
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            dimensions: (image.width, image.height),
        }
    }
}

/// Texture chosen for one body
pub struct BodyTexture {
    pub texture: Arc<GpuTexture>,
    /// Tint to apply on top of the texture
    pub tint: [f32; 4],
}

/// Identity of an uploaded texture
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Decoded from this file
    File(PathBuf),
    /// A single texel of this color
    Solid([u8; 4]),
}

/// Pixels for a material, before they reach the GPU
pub enum Pixels {
    /// Already uploaded under some earlier key
    Uploaded(Arc<GpuTexture>),
    /// Needs uploading, then caching under `key`
    Decoded { key: TextureKey, image: TextureImage },
}

/// Outcome of [`TextureCache::choose`]
pub struct TextureChoice {
    pub pixels: Pixels,
    pub tint: [f32; 4],
}

impl TextureChoice {
    /// Key of freshly decoded pixels, `None` when they came from the cache
    pub fn key(&self) -> Option<&TextureKey> {
        match &self.pixels {
            Pixels::Decoded { key, .. } => Some(key),
            Pixels::Uploaded(_) => None,
        }
    }
}

/// Shared cache of uploaded textures
///
/// Files are resolved against `root`. A file that fails to load is
/// remembered, so the warning is logged once and later bodies using it go
/// straight to their fallback color.
pub struct TextureCache {
    root: PathBuf,
    uploaded: HashMap<TextureKey, Arc<GpuTexture>>,
    failed: HashSet<PathBuf>,
}

impl TextureCache {
    /// Create a cache resolving texture names against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            uploaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Number of distinct GPU textures uploaded so far
    pub fn len(&self) -> usize {
        self.uploaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty()
    }

    /// Files that could not be loaded
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Where `material` would sample from, before any IO
    pub fn key_for(&self, material: &Material) -> TextureKey {
        match &material.texture {
            Some(name) => TextureKey::File(self.root.join(name)),
            None => TextureKey::Solid(color_to_rgba8(material.fallback_color)),
        }
    }

    /// Pick the pixels for `material`, decoding from disk if needed
    ///
    /// The material color is always the tint. A missing or undecodable file
    /// falls back to a texel of the material's fallback color.
    pub fn choose(&mut self, material: &Material) -> TextureChoice {
        let tint = material.color;
        let key = match self.key_for(material) {
            TextureKey::File(path) if self.failed.contains(&path) => {
                TextureKey::Solid(color_to_rgba8(material.fallback_color))
            }
            key => key,
        };

        if let Some(texture) = self.uploaded.get(&key) {
            return TextureChoice {
                pixels: Pixels::Uploaded(texture.clone()),
                tint,
            };
        }

        let pixels = match key {
            TextureKey::Solid(rgba) => Pixels::Decoded {
                key: TextureKey::Solid(rgba),
                image: TextureImage::solid(material.fallback_color),
            },
            TextureKey::File(path) => match TextureImage::load(&path) {
                Ok(image) => {
                    log::info!(
                        "Loaded texture {} ({}x{})",
                        path.display(),
                        image.width,
                        image.height
                    );
                    Pixels::Decoded {
                        key: TextureKey::File(path),
                        image,
                    }
                }
                Err(e) => {
                    log::warn!("{}; using fallback color instead", e);
                    self.failed.insert(path);
                    return self.choose(material);
                }
            },
        };

        TextureChoice { pixels, tint }
    }

    /// Resolve the texture for `material`, uploading on first use
    pub fn resolve(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material: &Material,
    ) -> BodyTexture {
        let TextureChoice { pixels, tint } = self.choose(material);
        let texture = match pixels {
            Pixels::Uploaded(texture) => texture,
            Pixels::Decoded { key, image } => {
                let label = match &key {
                    TextureKey::File(path) => path.to_string_lossy().into_owned(),
                    TextureKey::Solid(_) => "solid-color".to_string(),
                };
                let texture = Arc::new(GpuTexture::from_image(device, queue, &image, &label));
                self.uploaded.insert(key, texture.clone());
                texture
            }
        };

        BodyTexture { texture, tint }
    }
}
