use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::gfx::rendering::{FrameOutcome, RenderEngine};
use crate::ui::{settings_panel, PanelChanges, UiManager, ViewerSettings};
use crate::viewer::MeshViewer;

/// Window, GPU and UI shell around a [`MeshViewer`]
pub struct ViewerApp {
    config: ViewerConfig,
    viewer: MeshViewer,
    settings: ViewerSettings,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    last_frame: Instant,
    error: Option<ViewerError>,
}

impl ViewerApp {
    /// Builds the scene; the window and GPU are created once the event loop runs
    pub fn new(config: ViewerConfig) -> Result<Self, ViewerError> {
        let viewer = MeshViewer::new(&config)?;
        let settings = viewer.settings();

        Ok(Self {
            config,
            viewer,
            settings,
            window: None,
            render_engine: None,
            ui_manager: None,
            last_frame: Instant::now(),
            error: None,
        })
    }

    pub fn viewer(&self) -> &MeshViewer {
        &self.viewer
    }

    /// Runs the event loop until the window closes
    ///
    /// # Errors
    /// Returns the first error that stopped the viewer, if any.
    pub fn run(mut self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_config = &self.config.window;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.as_str())
                    .with_inner_size(PhysicalSize::new(window_config.width, window_config.height)),
            )?,
        );

        let (width, height) = window.inner_size().into();
        log::info!("Created window {}x{}", width, height);

        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
        ))?;
        render_engine.prepare_scene(self.viewer.scene_mut());
        self.viewer
            .scene_mut()
            .camera_manager
            .resize(width, height);

        let ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );

        self.window = Some(window);
        self.render_engine = Some(render_engine);
        self.ui_manager = Some(ui_manager);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), ViewerError> {
        let now = Instant::now();
        let delta_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.viewer.update(delta_time);

        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return Ok(());
        };

        let scene = self.viewer.scene();
        render_engine.update(scene.camera_manager.uniform(), &scene.lighting);

        let stats = scene.get_statistics();
        let settings = &mut self.settings;
        let mut changes = PanelChanges::default();

        let outcome = match self.ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame(
                scene,
                Some(|device: &wgpu::Device,
                      queue: &wgpu::Queue,
                      encoder: &mut wgpu::CommandEncoder,
                      view: &wgpu::TextureView| {
                    ui_manager.draw(device, queue, encoder, window, view, |ui| {
                        changes = settings_panel(ui, settings, &stats);
                    });
                }),
            )?,
            None => render_engine.render_frame(
                scene,
                None::<
                    fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
                >,
            )?,
        };

        if outcome == FrameOutcome::Skipped {
            log::debug!("Frame skipped");
        }

        // Applied between frames so the next frame draws the new material
        if let Some(wireframe) = changes.wireframe {
            self.viewer.set_wireframe(wireframe);
            self.settings = self.viewer.settings();
        }

        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn ui_wants_input(&self) -> bool {
        self.ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                if key_code == KeyCode::Escape && state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                self.viewer
                    .scene_mut()
                    .camera_manager
                    .process_key(key_code, state);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.viewer
                    .scene_mut()
                    .camera_manager
                    .process_mouse_button(button, state);
            }
            WindowEvent::Focused(false) => {
                self.viewer.scene_mut().camera_manager.controller.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.viewer.scene_mut().camera_manager.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.window.is_none() || self.ui_wants_input() {
            return;
        }

        if self.viewer.scene_mut().camera_manager.process_event(&event) {
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
