//! Backend resource limits.

use crate::{ComputeError, ComputeResult};

/// Fraction of reported memory kept in reserve.
const VRAM_SAFETY_MARGIN: f64 = 0.4;
/// src + dst + staging.
const BUFFER_OVERHEAD: u64 = 3;

const DEFAULT_VRAM_BYTES: u64 = 2 * 1024 * 1024 * 1024; // 2 GB
const DEFAULT_MAX_TEXTURE_DIM: u32 = 16384;
const DEFAULT_MAX_BUFFER_BYTES: u64 = 256 * 1024 * 1024; // 256 MB

/// Threads per workgroup in every compute shader.
pub const WORKGROUP_SIZE: u32 = 256;
/// Per-dimension workgroup count every adapter accepts.
pub const MAX_WORKGROUPS_PER_DIM: u32 = 65535;

/// Workgroup grid with one invocation per pixel.
///
/// Small images get a single row. Larger ones wrap into rows of
/// [`MAX_WORKGROUPS_PER_DIM`] groups; invocations past the last pixel exit
/// early in the shader.
#[cfg_attr(not(feature = "wgpu"), allow(dead_code))]
pub(crate) fn workgroup_grid(pixels: u64) -> (u32, u32, u32) {
    let groups = pixels.div_ceil(WORKGROUP_SIZE as u64).max(1);
    let x = groups.min(MAX_WORKGROUPS_PER_DIM as u64);
    let y = groups.div_ceil(x);
    (x as u32, y.min(u32::MAX as u64) as u32, 1)
}

/// Backend resource limits.
#[derive(Debug, Clone)]
pub struct GpuLimits {
    /// Maximum image dimension (width or height).
    pub max_tile_dim: u32,
    /// Maximum single buffer size in bytes.
    pub max_buffer_bytes: u64,
    /// Usable memory in bytes (after safety margin).
    pub available_memory: u64,
}

impl Default for GpuLimits {
    fn default() -> Self {
        Self::with_vram(DEFAULT_VRAM_BYTES)
    }
}

impl GpuLimits {
    /// Limits for a device with `total_vram_bytes` of memory.
    pub fn with_vram(total_vram_bytes: u64) -> Self {
        Self {
            max_tile_dim: DEFAULT_MAX_TEXTURE_DIM,
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
            available_memory: (total_vram_bytes as f64 * (1.0 - VRAM_SAFETY_MARGIN)) as u64,
        }
    }

    /// Limits with no dimension or buffer cap.
    pub fn unbounded(available_memory: u64) -> Self {
        Self {
            max_tile_dim: u32::MAX,
            max_buffer_bytes: u64::MAX,
            available_memory,
        }
    }

    /// Bytes needed to run one kernel on a `w x h x c` image.
    pub fn required_bytes(width: u32, height: u32, channels: u32) -> u64 {
        width as u64 * height as u64 * channels as u64 * 4 * BUFFER_OVERHEAD
    }

    /// True if one buffer of this image fits the buffer limit.
    pub fn fits_buffer(&self, width: u32, height: u32, channels: u32) -> bool {
        width as u64 * height as u64 * channels as u64 * 4 <= self.max_buffer_bytes
    }

    /// True if the working set fits in memory.
    pub fn fits_memory(&self, width: u32, height: u32, channels: u32) -> bool {
        Self::required_bytes(width, height, channels) <= self.available_memory
    }

    /// Rejects images the backend cannot process in one pass.
    pub fn check(&self, width: u32, height: u32, channels: u32) -> ComputeResult<()> {
        if width == 0 || height == 0 {
            return Err(ComputeError::InvalidDimensions(width, height));
        }
        if width > self.max_tile_dim || height > self.max_tile_dim {
            return Err(ComputeError::ImageTooLarge {
                width,
                height,
                limit: self.max_tile_dim,
            });
        }
        let pixels = width as u64 * height as u64;
        let max_pixels = WORKGROUP_SIZE as u64 * (MAX_WORKGROUPS_PER_DIM as u64).pow(2);
        if pixels > max_pixels {
            return Err(ComputeError::OperationFailed(format!(
                "{}x{} exceeds {} pixels per dispatch",
                width, height, max_pixels
            )));
        }
        if !self.fits_buffer(width, height, channels) {
            return Err(ComputeError::OperationFailed(format!(
                "{}x{}x{} exceeds max buffer size {} bytes",
                width, height, channels, self.max_buffer_bytes
            )));
        }
        Ok(())
    }
}
