//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the depth buffer, the global uniforms
//! and the pipelines for every [`MaterialStyle`], and draws a [`Scene`] with
//! an optional UI overlay on top.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::error::ViewerError;
use crate::gfx::{
    camera::camera_utils::CameraUniform,
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
        material::{create_material_layout, MaterialStyle},
        texture_resource::TextureResource,
    },
    scene::{
        object::{create_transform_layout, DrawObject},
        scene::Scene,
    },
};
use crate::wgpu_utils::binding_builder::BindGroupLayoutWithDesc;

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Name of the pipeline that draws a material style
pub fn pipeline_name(style: MaterialStyle) -> &'static str {
    match style {
        MaterialStyle::Gouraud => "Gouraud",
        MaterialStyle::Wireframe => "Wireframe",
        MaterialStyle::UnlitLines => "Lines",
    }
}

fn shader_name(style: MaterialStyle) -> &'static str {
    match style {
        MaterialStyle::Gouraud => "gouraud",
        MaterialStyle::Wireframe | MaterialStyle::UnlitLines => "unlit",
    }
}

fn cull_mode(style: MaterialStyle) -> Option<wgpu::Face> {
    match style {
        MaterialStyle::Gouraud => Some(wgpu::Face::Back),
        MaterialStyle::Wireframe | MaterialStyle::UnlitLines => None,
    }
}

/// What happened to a frame handed to [`RenderEngine::render_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The surface was lost, outdated or timed out; nothing was drawn
    Skipped,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Picks an adapter compatible with the window surface, configures the
    /// surface and compiles one pipeline per material style.
    ///
    /// # Errors
    /// Fails if no surface, adapter or device can be created, or a pipeline
    /// does not compile.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, ViewerError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(ViewerError::NoSurfaceFormat)?;
        log::info!("Surface format {:?}", format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: choose_present_mode(&surface_capabilities.present_modes, vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::zeroed(&device, "Globals");
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let transform_layout = create_transform_layout(&device);
        let material_layout = create_material_layout(&device);

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("gouraud", include_str!("shaders/gouraud.wgsl"));
        pipeline_manager.load_shader("unlit", include_str!("shaders/unlit.wgsl"));

        for style in MaterialStyle::ALL {
            pipeline_manager.register_pipeline(
                pipeline_name(style),
                PipelineConfig::default()
                    .with_label(pipeline_name(style))
                    .with_shader(shader_name(style))
                    .with_primitive_topology(style.topology())
                    .with_cull_mode(cull_mode(style))
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_color_format(format)
                    .with_bind_group_layouts(vec![
                        global_bindings.bind_group_layout().clone(),
                        transform_layout.layout.clone(),
                        material_layout.layout.clone(),
                    ]),
            );
        }
        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| ViewerError::Pipeline(errors.join("; ")))?;
        log::info!("Pipelines ready: {:?}", pipeline_manager.get_stats());

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
        })
    }

    /// Uploads meshes and creates material resources for everything in the scene
    pub fn prepare_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(
            &self.device,
            &self.queue,
            &self.transform_layout,
            &self.material_layout,
        );
    }

    /// Renders one frame of the scene followed by the optional UI overlay
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        ui_callback: Option<F>,
    ) -> Result<FrameOutcome, ViewerError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the next frame");
                return Ok(FrameOutcome::Skipped);
            }
            Err(err) => return Err(err.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for object in scene.objects.iter().filter(|o| o.visible) {
                let material = scene.get_material_for_object(object);
                let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name(material.style))
                else {
                    continue;
                };
                let (Some(transform), Some(material_bind_group)) =
                    (object.get_transform_bind_group(), material.get_bind_group())
                else {
                    log::debug!(
                        "Skipping '{}' - GPU resources for it or material '{}' missing",
                        object.name,
                        material.name
                    );
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, transform, &[]);
                render_pass.set_bind_group(2, material_bind_group, &[]);
                render_pass.draw_object(object, material.style);
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(FrameOutcome::Presented)
    }

    /// Updates camera and light uniform buffers
    pub fn update(&mut self, camera_uniform: CameraUniform, light: &LightConfig) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, light);
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// FIFO is always supported; without vsync prefer Immediate, then Mailbox
fn choose_present_mode(available: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
        .into_iter()
        .find(|mode| available.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_has_a_distinct_pipeline() {
        let names: std::collections::HashSet<_> =
            MaterialStyle::ALL.iter().map(|s| pipeline_name(*s)).collect();
        assert_eq!(names.len(), MaterialStyle::ALL.len());
    }

    #[test]
    fn test_line_styles_share_the_unlit_shader() {
        assert_eq!(shader_name(MaterialStyle::Wireframe), "unlit");
        assert_eq!(shader_name(MaterialStyle::UnlitLines), "unlit");
        assert_eq!(cull_mode(MaterialStyle::Wireframe), None);
        assert_eq!(cull_mode(MaterialStyle::Gouraud), Some(wgpu::Face::Back));
    }

    #[test]
    fn test_present_mode_selection() {
        use wgpu::PresentMode::*;
        assert_eq!(choose_present_mode(&[Fifo, Immediate], true), Fifo);
        assert_eq!(choose_present_mode(&[Fifo, Mailbox], false), Mailbox);
        assert_eq!(choose_present_mode(&[Fifo, Mailbox, Immediate], false), Immediate);
        assert_eq!(choose_present_mode(&[Fifo], false), Fifo);
    }
}
