//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Viewport sizing and projection
//! - Skybox or clear-color background
//! - Per-node textures and the body pipeline

use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use glam::Vec3;
use orrery_core::{SphereGeometry, World};
use orrery_render::{
    camera::Camera,
    collect_instances,
    context::{RenderContext, RenderContextError},
    geometry::SphereMesh,
    pipeline::{Background, BodyPipeline, Lighting, SceneUniforms},
    skybox::{SkyboxFaces, SkyboxPipeline},
    texture::TextureCache,
    viewport::{SurfaceSize, Viewport},
};

use crate::config::{CameraConfig, RenderingConfig, SkyboxConfig};
use crate::systems::frame_loop::SceneRenderer;

/// Render error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// GPU setup failed
    #[error(transparent)]
    Context(#[from] RenderContextError),
    /// Surface was lost or outdated (window resized, minimized, etc.)
    #[error("Surface lost")]
    SurfaceLost,
    /// GPU out of memory
    #[error("Out of memory")]
    OutOfMemory,
    /// Other surface error
    #[error("Render error: {0}")]
    Other(String),
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    viewport: Viewport,
    pipeline: BodyPipeline,
    /// Texture bind group per node, indexed by `NodeId::index`
    bind_groups: Vec<wgpu::BindGroup>,
    /// Tint per node, indexed by `NodeId::index`
    tints: Vec<[f32; 4]>,
    lighting: Lighting,
    skybox: Option<SkyboxPipeline>,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create render system for `world` from window and config
    pub fn new(
        window: Arc<Window>,
        world: &World,
        geometry: &SphereGeometry,
        render_config: &RenderingConfig,
        camera_config: &CameraConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let scale_factor = window.scale_factor();
        let physical = window.inner_size();
        let logical = physical.to_logical::<f32>(scale_factor);
        let viewport = Viewport::new(logical.width, logical.height, scale_factor as f32)
            .with_fov(camera_config.fov)
            .with_clip_planes(camera_config.near, camera_config.far)
            .with_max_pixel_ratio(camera_config.max_pixel_ratio);

        let mut context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;
        let backing = viewport.backing_size();
        log_capped_surface(&viewport, physical, backing);
        context.resize(PhysicalSize::new(backing.width, backing.height));

        let mesh = SphereMesh::new(geometry);
        let pipeline = BodyPipeline::new(
            &context.device,
            context.format(),
            &mesh,
            backing.width,
            backing.height,
        );
        log::info!(
            "Uploaded sphere mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let mut textures = TextureCache::new(render_config.texture_dir.clone());
        let mut bind_groups = Vec::with_capacity(world.node_count());
        let mut tints = Vec::with_capacity(world.node_count());
        for (_, node) in world.iter() {
            let body = textures.resolve(&context.device, &context.queue, &node.material);
            bind_groups.push(pipeline.texture_bind_group(&context.device, &body.texture));
            tints.push(body.tint);
        }
        log::info!(
            "{} nodes share {} textures ({} files missing)",
            world.node_count(),
            textures.len(),
            textures.failed_count()
        );

        let lighting = Lighting {
            light_position: Vec3::from(render_config.light_position),
            light_intensity: render_config.light_intensity,
            ambient_color: render_config.ambient_color,
            ambient_intensity: render_config.ambient_intensity,
        };

        let skybox = load_skybox(&render_config.skybox)
            .map(|faces| SkyboxPipeline::new(&context.device, &context.queue, context.format(), &faces));

        let bg = render_config.background_color;
        let clear_color = wgpu::Color {
            r: bg[0] as f64,
            g: bg[1] as f64,
            b: bg[2] as f64,
            a: bg[3] as f64,
        };

        Ok(Self {
            context,
            viewport,
            pipeline,
            bind_groups,
            tints,
            lighting,
            skybox,
            clear_color,
        })
    }

    /// Handle window resize or a scale factor change
    ///
    /// `physical` is the window's inner size as reported by the host.
    pub fn resize(&mut self, physical: PhysicalSize<u32>, scale_factor: f64) -> SurfaceSize {
        let logical = physical.to_logical::<f32>(scale_factor);
        let backing = self
            .viewport
            .resize(logical.width, logical.height, scale_factor as f32);
        log_capped_surface(&self.viewport, physical, backing);

        self.context
            .resize(PhysicalSize::new(backing.width, backing.height));
        self.pipeline
            .ensure_depth_texture(&self.context.device, backing.width, backing.height);
        backing
    }

    /// Reconfigure the surface after it was lost
    pub fn recover_surface(&self) {
        log::warn!("Reconfiguring lost surface");
        self.context.reconfigure();
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

/// Decode the configured cube faces, or `None` to use the clear color
fn load_skybox(config: &SkyboxConfig) -> Option<SkyboxFaces> {
    if !config.enabled {
        log::info!("Skybox disabled");
        return None;
    }
    SkyboxFaces::try_load(&config.dir, &config.faces)
}

/// Note when the pixel ratio cap leaves the surface smaller than the window
fn log_capped_surface(viewport: &Viewport, physical: PhysicalSize<u32>, backing: SurfaceSize) {
    if viewport.is_ratio_capped() {
        log::debug!(
            "Pixel ratio capped at {}: surface {}x{} for a {}x{} window",
            viewport.pixel_ratio(),
            backing.width,
            backing.height,
            physical.width,
            physical.height
        );
    }
}

impl SceneRenderer for RenderSystem {
    type Error = RenderError;

    /// Render a single frame
    fn render_frame(&mut self, world: &World, camera: &Camera) -> Result<(), RenderError> {
        let projection = self.viewport.projection_matrix();
        let view = camera.view_matrix();
        let uniforms = SceneUniforms::new(projection * view, camera.eye, &self.lighting);
        self.pipeline.update_uniforms(&self.context.queue, &uniforms);
        if let Some(skybox) = &self.skybox {
            skybox.update(&self.context.queue, projection, view);
        }

        let instances = collect_instances(world, &self.tints);
        self.pipeline
            .upload_instances(&self.context.device, &self.context.queue, &instances);

        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let background = match &self.skybox {
            Some(skybox) => Background::Skybox(skybox),
            None => Background::Clear(self.clear_color),
        };
        self.pipeline
            .render(&mut encoder, &target, &self.bind_groups, background);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
    }

    #[test]
    fn test_disabled_skybox_uses_clear_color() {
        let config = SkyboxConfig {
            enabled: false,
            ..SkyboxConfig::default()
        };
        assert!(load_skybox(&config).is_none());
    }

    #[test]
    fn test_missing_skybox_uses_clear_color() {
        let config = SkyboxConfig {
            dir: std::env::temp_dir().join("orrery_no_such_cubemap"),
            ..SkyboxConfig::default()
        };
        assert!(load_skybox(&config).is_none());
    }

    #[test]
    fn test_context_error_is_transparent() {
        let err = RenderError::from(RenderContextError::NoAdapter);
        assert_eq!(err.to_string(), "no compatible GPU adapter found");
    }
}
