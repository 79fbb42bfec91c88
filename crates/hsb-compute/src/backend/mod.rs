//! Compute backends for the adjustment kernels.
//!
//! Provides CPU (rayon) and wgpu backends with automatic selection.
//!
//! # Architecture
//!
//! ```text
//! ProcessingBackend (in-place, boxed handles)
//!     +-- CpuBackend  wraps CpuPrimitives
//!     +-- WgpuBackend wraps WgpuPrimitives
//! ```

mod cpu_backend;
mod detect;
mod gpu_primitives;
mod tiling;

#[cfg(feature = "wgpu")]
mod wgpu_backend;

pub use cpu_backend::{CpuBackend, CpuImage, CpuPrimitives};
pub use detect::{BackendInfo, describe_backends, detect_backends, select_best_backend};
pub use gpu_primitives::{AsAny, GpuPrimitives, ImageHandle};
pub use tiling::GpuLimits;

#[cfg(feature = "wgpu")]
pub use wgpu_backend::{WgpuBackend, WgpuImage, WgpuPrimitives};

#[cfg(not(feature = "wgpu"))]
use crate::ComputeError;
use crate::ComputeResult;
use crate::kernel::{Affine, Transfer};

/// Available compute backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Backend {
    /// Auto-select best available (wgpu > CPU).
    #[default]
    Auto,
    /// CPU backend using rayon for parallelization.
    Cpu,
    /// wgpu backend (Vulkan/Metal/DX12).
    Wgpu,
}

impl Backend {
    /// Check if this backend is available on current system.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Auto => true,
            Self::Cpu => true,
            #[cfg(feature = "wgpu")]
            Self::Wgpu => WgpuBackend::is_available(),
            #[cfg(not(feature = "wgpu"))]
            Self::Wgpu => false,
        }
    }

    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Wgpu => "wgpu",
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "wgpu" | "gpu" => Ok(Self::Wgpu),
            other => Err(format!("unknown backend '{other}' (expected auto, cpu or wgpu)")),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Object-safe backend with in-place operations on boxed handles.
pub trait ProcessingBackend: Send + Sync {
    /// Backend name.
    fn name(&self) -> &'static str;

    /// Available memory in bytes.
    fn available_memory(&self) -> u64;

    /// Backend limits.
    fn limits(&self) -> &GpuLimits;

    /// Upload image to backend memory.
    fn upload(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        channels: u32,
    ) -> ComputeResult<Box<dyn ImageHandle>>;

    /// Download image from backend memory.
    fn download(&self, handle: &dyn ImageHandle) -> ComputeResult<Vec<f32>>;

    /// sRGB decode or encode, in place.
    fn apply_transfer(&self, handle: &mut dyn ImageHandle, direction: Transfer)
    -> ComputeResult<()>;

    /// 3x4 affine color transform, in place.
    fn apply_affine(&self, handle: &mut dyn ImageHandle, matrix: &Affine) -> ComputeResult<()>;

    /// Oklab hue rotation, in place.
    fn apply_hue_rotate(&self, handle: &mut dyn ImageHandle, cos: f32, sin: f32)
    -> ComputeResult<()>;
}

/// Create a [`ProcessingBackend`] instance.
pub fn create_backend(backend: Backend) -> ComputeResult<Box<dyn ProcessingBackend>> {
    match backend {
        Backend::Auto => {
            let best = select_best_backend();
            create_backend(best)
        }
        Backend::Cpu => Ok(Box::new(CpuBackend::new())),
        Backend::Wgpu => {
            #[cfg(feature = "wgpu")]
            {
                Ok(Box::new(WgpuBackend::new()?))
            }
            #[cfg(not(feature = "wgpu"))]
            {
                Err(ComputeError::BackendNotAvailable(
                    "wgpu feature not enabled".to_string(),
                ))
            }
        }
    }
}
