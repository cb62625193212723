//! # User Interface Module
//!
//! A Dear ImGui overlay for the viewer, built on `imgui-wgpu` and
//! `imgui-winit-support`.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture and
//!   frame-by-frame rendering
//! - [`settings_panel`] - The settings window with the "Wireframe" checkbox
//!
//! ## Input Handling
//!
//! While the UI wants mouse or keyboard input, those events are kept away from
//! the camera controls.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{settings_panel, PanelChanges, ViewerSettings};
