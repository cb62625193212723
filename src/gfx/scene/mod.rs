//! # Scene Management Module
//!
//! Organizes what the viewer draws: objects built from generated geometry,
//! the materials they reference by ID, the lighting and the orbit camera.
//!
//! ## Key Components
//!
//! - [`Scene`] - The container that owns objects, camera, lights and materials
//! - [`Object`] - A named mesh with a transform and a material reference
//! - [`Mesh`] - Interleaved vertices with triangle and line index lists
//! - [`Vertex3D`] - GPU vertex with position, normal, colour and texture coordinates
//!
//! ## Usage
//!
//! ```no_run
//! use cylinder_viewer::config::CameraConfig;
//! use cylinder_viewer::gfx::camera::CameraManager;
//! use cylinder_viewer::gfx::geometry::generate_cylinder;
//! use cylinder_viewer::gfx::scene::Scene;
//!
//! let mut scene = Scene::new(CameraManager::from_config(&CameraConfig::default()));
//! scene.add_geometry_object("cylinder", &generate_cylinder(20, 3.0), "shaded");
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, Mesh, Object};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
