//! # Graphics Module
//!
//! Everything needed to get the cylinder on screen.
//!
//! - **Geometry** ([`geometry`]) - Procedural cylinder and axes generation
//! - **Camera System** ([`camera`]) - Orbit camera with rotate, pan and zoom
//! - **Scene Management** ([`scene`]) - Objects, meshes and the vertex format
//! - **Resource Management** ([`resources`]) - Materials, textures and global uniforms
//! - **Rendering Pipeline** ([`rendering`]) - Gouraud and line pipelines, frame rendering
//!
//! ```no_run
//! use cylinder_viewer::gfx::geometry::generate_cylinder;
//!
//! let cylinder = generate_cylinder(20, 3.0);
//! assert_eq!(cylinder.triangle_count(), 80);
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
