//! Compute backends for the HSB adjustment kernels.
//!
//! Provides a CPU (rayon) backend and an optional GPU (wgpu) backend that run
//! the same three per-pixel kernels: sRGB transfer, 3x4 affine color
//! transform, and Oklab hue rotation.
//!
//! # Architecture
//!
//! ```text
//! ProcessingBackend (dyn, boxed handles)
//!     +-- CpuBackend  -> CpuPrimitives  (rayon)
//!     +-- WgpuBackend -> WgpuPrimitives (compute shaders, feature "wgpu")
//! ```
//!
//! # Example
//!
//! ```rust
//! use hsb_compute::{Backend, Transfer, create_backend};
//!
//! let backend = create_backend(Backend::Cpu)?;
//! let mut handle = backend.upload(&[0.5, 0.5, 0.5, 1.0], 1, 1, 4)?;
//! backend.apply_transfer(handle.as_mut(), Transfer::SrgbToLinear)?;
//! let data = backend.download(handle.as_ref())?;
//! assert!((data[0] - 0.214).abs() < 0.01);
//! # Ok::<(), hsb_compute::ComputeError>(())
//! ```

pub mod backend;
pub mod kernel;
mod shaders;

pub use backend::{
    AsAny, Backend, BackendInfo, CpuBackend, CpuImage, CpuPrimitives, GpuLimits, GpuPrimitives,
    ImageHandle, ProcessingBackend, create_backend, describe_backends, detect_backends,
    select_best_backend,
};
#[cfg(feature = "wgpu")]
pub use backend::{WgpuBackend, WgpuImage, WgpuPrimitives};
pub use kernel::{AFFINE_IDENTITY, Affine, Transfer};

use thiserror::Error;

/// Compute operation errors.
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("Failed to create device: {0}")]
    DeviceCreation(String),

    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Image too large: {width}x{height} exceeds limit {limit}")]
    ImageTooLarge { width: u32, height: u32, limit: u32 },

    #[error("Invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

pub type ComputeResult<T> = Result<T, ComputeError>;
