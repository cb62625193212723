// src/lib.rs
//! Cylinder Viewer
//!
//! Generates a capped cylinder mesh procedurally and shows it in a wgpu/winit
//! window with an orbit camera and a wireframe toggle.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use error::{ConfigError, GeometryError, ViewerError};
pub use gfx::geometry::{generate_axes, generate_cylinder, GeometryData};
pub use viewer::{MeshViewer, WireframeToggle};

/// Runs the viewer with the default configuration and environment overrides
pub fn run() -> Result<(), ViewerError> {
    ViewerApp::new(ViewerConfig::from_env()?)?.run()
}
