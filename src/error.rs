//! Error types for the viewer
//!
//! Geometry and configuration problems are reported with their own enums so the
//! pure parts of the crate can be used without pulling in any GPU or windowing
//! error types. [`ViewerError`] wraps everything the application shell can hit.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid cylinder parameters or a geometry buffer that breaks its invariants
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("a cylinder needs at least 3 segments, got {0}")]
    TooFewSegments(u32),

    #[error("{segments} segments exceed the maximum of {max} addressable with 32-bit indices")]
    TooManySegments { segments: u32, max: u32 },

    #[error("cylinder height must be positive and finite, got {0}")]
    InvalidHeight(f32),

    #[error("{attribute} buffer has {actual} entries but there are {expected} vertices")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// A configuration override that could not be applied
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Everything that can stop the viewer from starting or presenting a frame
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to create or run the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create a rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to acquire the next frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("failed to load texture {path:?}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("pipeline setup failed: {0}")]
    Pipeline(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
