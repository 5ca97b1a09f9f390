//! Pivot Render System
//!
//! Fixed-capacity dynamic geometry rendering over wgpu: one two-attribute
//! vertex format, three primitive pipelines, CPU-writable buffers updated
//! by sub-range every frame.

pub mod batch;
pub mod camera;
pub mod context;
pub mod resources;
pub mod scene;

pub use wgpu;
pub use winit;

use thiserror::Error;

/// Render-layer failure taxonomy.
///
/// Resource faults are surfaced as values so callers can decide whether to
/// abort a batch draw or fall back; none of these are silently absorbed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter found")]
    AdapterUnavailable,

    #[error("failed to create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("failed to acquire GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("shader compilation failed: {0}")]
    Shader(String),

    #[error("GPU resource creation failed: {0}")]
    ResourceCreation(String),

    #[error("buffer write out of range: offset {offset} + {len} bytes exceeds capacity {capacity}")]
    BufferOverflow { offset: u64, len: u64, capacity: u64 },
}
