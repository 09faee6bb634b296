//! Cube map background
//!
//! Six face images are decoded with `image`, checked for matching square
//! sizes, and uploaded as one cube texture. [`SkyboxPipeline`] draws it with
//! a full-screen triangle at the start of the body pass.

use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};
use wgpu::util::DeviceExt;

use crate::pipeline::DEPTH_FORMAT;
use crate::texture::{TextureError, TextureImage};

/// Face file names in cube layer order: +X, -X, +Y, -Y, +Z, -Z
pub const DEFAULT_FACES: [&str; 6] = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

/// Errors that can occur while loading the skybox faces
#[derive(Debug, thiserror::Error)]
pub enum SkyboxError {
    #[error(transparent)]
    Texture(#[from] TextureError),

    /// Faces must be square and all the same size
    #[error("skybox face '{}' is {width}x{height}, expected {expected}x{expected}", path.display())]
    FaceSize {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },
}

/// Decoded cube faces, in layer order
#[derive(Clone, Debug, PartialEq)]
pub struct SkyboxFaces {
    face_size: u32,
    faces: Vec<TextureImage>,
}

impl SkyboxFaces {
    /// Decode the six faces named in `faces` from `dir`
    pub fn load(dir: &Path, faces: &[String; 6]) -> Result<Self, SkyboxError> {
        let mut images = Vec::with_capacity(6);
        let mut face_size = 0;

        for name in faces {
            let path = dir.join(name);
            let image = TextureImage::load(&path)?;

            if images.is_empty() {
                face_size = image.width;
            }
            if image.width != face_size || image.height != face_size {
                return Err(SkyboxError::FaceSize {
                    path,
                    width: image.width,
                    height: image.height,
                    expected: face_size,
                });
            }
            images.push(image);
        }

        Ok(Self {
            face_size,
            faces: images,
        })
    }

    /// Like [`SkyboxFaces::load`], logging the failure instead of returning it
    pub fn try_load(dir: &Path, faces: &[String; 6]) -> Option<Self> {
        match Self::load(dir, faces) {
            Ok(skybox) => {
                log::info!("Loaded skybox from {} ({}px faces)", dir.display(), skybox.face_size);
                Some(skybox)
            }
            Err(e) => {
                log::warn!("{}; using the background color instead", e);
                None
            }
        }
    }

    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    pub fn faces(&self) -> &[TextureImage] {
        &self.faces
    }
}

/// Inverse view-projection for sampling the sky by view direction
///
/// The view translation is dropped so the sky stays at infinity.
pub fn sky_inverse_view_proj(projection: Mat4, view: Mat4) -> Mat4 {
    let rotation = Mat4::from_mat3(Mat3::from_mat4(view));
    (projection * rotation).inverse()
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct SkyUniforms {
    inv_view_proj: [[f32; 4]; 4],
}

/// Draws the cube map behind everything else
pub struct SkyboxPipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
}

impl SkyboxPipeline {
    /// Create the pipeline and upload the cube map
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        faces: &SkyboxFaces,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skybox Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skybox Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/skybox.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Shares the body pass, so it must accept the depth attachment
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let size = faces.face_size();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Skybox Cube Map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in faces.faces().iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                &face.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * size),
                    rows_per_image: Some(size),
                },
                wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Texture Bind Group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let uniforms = SkyUniforms {
            inv_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
        }
    }

    /// Upload the camera for this frame
    pub fn update(&self, queue: &wgpu::Queue, projection: Mat4, view: Mat4) {
        let uniforms = SkyUniforms {
            inv_view_proj: sky_inverse_view_proj(projection, view).to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Draw into an open pass; call before any body is drawn
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn faces() -> [String; 6] {
        DEFAULT_FACES.map(String::from)
    }

    fn write_faces(name: &str, sizes: [(u32, u32); 6]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("orrery_skybox_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        for (i, (file, (w, h))) in DEFAULT_FACES.iter().zip(sizes).enumerate() {
            image::RgbaImage::from_pixel(w, h, image::Rgba([i as u8 * 40, 0, 0, 255]))
                .save(dir.join(file))
                .unwrap();
        }
        dir
    }

    #[test]
    fn test_loads_faces_in_layer_order() {
        let dir = write_faces("ordered", [(4, 4); 6]);
        let skybox = SkyboxFaces::load(&dir, &faces()).unwrap();

        assert_eq!(skybox.face_size(), 4);
        assert_eq!(skybox.faces().len(), 6);
        for (i, face) in skybox.faces().iter().enumerate() {
            assert_eq!(face.rgba[0], i as u8 * 40);
        }
    }

    #[test]
    fn test_missing_face_is_error() {
        let dir = write_faces("missing", [(4, 4); 6]);
        std::fs::remove_file(dir.join("nz.png")).unwrap();

        let err = SkyboxFaces::load(&dir, &faces()).unwrap_err();
        assert!(matches!(err, SkyboxError::Texture(_)));
        assert!(err.to_string().contains("nz.png"));
        assert!(SkyboxFaces::try_load(&dir, &faces()).is_none());
    }

    #[test]
    fn test_non_square_face_is_error() {
        let dir = write_faces("non_square", [(8, 4), (8, 4), (8, 4), (8, 4), (8, 4), (8, 4)]);
        let err = SkyboxFaces::load(&dir, &faces()).unwrap_err();
        assert!(matches!(err, SkyboxError::FaceSize { width: 8, height: 4, expected: 8, .. }));
    }

    #[test]
    fn test_mismatched_face_size_is_error() {
        let dir = write_faces("mismatched", [(4, 4), (4, 4), (2, 2), (4, 4), (4, 4), (4, 4)]);
        let err = SkyboxFaces::load(&dir, &faces()).unwrap_err();
        assert!(err.to_string().contains("py.png"));
        assert!(err.to_string().contains("expected 4x4"));
    }

    #[test]
    fn test_sky_direction_follows_camera_rotation_only() {
        let projection = Mat4::perspective_rh(35f32.to_radians(), 1.5, 0.1, 400.0);
        let eye = Vec3::new(0.0, 5.0, 100.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);

        // Screen centre looks along the camera's forward vector
        let inv = sky_inverse_view_proj(projection, view);
        let centre = inv * glam::Vec4::new(0.0, 0.0, 1.0, 1.0);
        let dir = (centre.truncate() / centre.w).normalize();
        assert!((dir - (-eye).normalize()).length() < 1e-4);

        // Translating the camera does not move the sky
        let shifted = Mat4::look_at_rh(eye + Vec3::X * 50.0, Vec3::X * 50.0, Vec3::Y);
        let inv_shifted = sky_inverse_view_proj(projection, shifted);
        assert!(inv.abs_diff_eq(inv_shifted, 1e-4));
    }
}
