//! Typed kernel interface shared by the CPU and wgpu backends.

use super::GpuLimits;
use crate::ComputeResult;
use crate::kernel::{Affine, Transfer};

/// Handle to an image in backend memory.
pub trait ImageHandle: Send + Sync + AsAny {
    /// `(width, height, channels)`.
    fn dimensions(&self) -> (u32, u32, u32);

    /// Width.
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Height.
    fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Channel count.
    fn channels(&self) -> u32 {
        self.dimensions().2
    }

    /// Size in bytes of backend memory used.
    fn size_bytes(&self) -> u64 {
        let (width, height, channels) = self.dimensions();
        u64::from(width) * u64::from(height) * u64::from(channels) * size_of::<f32>() as u64
    }
}

/// Lets a backend recover its concrete handle from `dyn ImageHandle`.
pub trait AsAny: 'static {
    /// Shared downcast view.
    fn as_any(&self) -> &dyn std::any::Any;
    /// Mutable downcast view.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Core kernel operations. Every `exec_*` reads `src` and writes `dst`;
/// alpha is copied through unchanged.
pub trait GpuPrimitives: Send + Sync {
    /// Image storage owned by this backend.
    type Handle: ImageHandle;

    /// Copies interleaved samples into backend memory.
    fn upload(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        channels: u32,
    ) -> ComputeResult<Self::Handle>;

    /// Copies samples back to the host.
    fn download(&self, handle: &Self::Handle) -> ComputeResult<Vec<f32>>;

    /// Uninitialized target of the given shape.
    fn allocate(&self, width: u32, height: u32, channels: u32) -> ComputeResult<Self::Handle>;

    /// sRGB decode or encode.
    fn exec_transfer(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        direction: Transfer,
    ) -> ComputeResult<()>;

    /// 3x4 affine color transform.
    fn exec_affine(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        matrix: &Affine,
    ) -> ComputeResult<()>;

    /// Oklab hue rotation by the angle whose cosine and sine are given.
    fn exec_hue_rotate(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        cos: f32,
        sin: f32,
    ) -> ComputeResult<()>;

    /// Size limits for uploads and allocations.
    fn limits(&self) -> &GpuLimits;

    /// Short display name.
    fn name(&self) -> &'static str;
}
