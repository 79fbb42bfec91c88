//! CPU backend using rayon for parallelization.

use rayon::prelude::*;

use super::gpu_primitives::{AsAny, GpuPrimitives, ImageHandle};
use super::{GpuLimits, ProcessingBackend};
use crate::kernel::{self, Affine, Transfer};
use crate::{ComputeError, ComputeResult};

/// CPU image handle - data stored in RAM.
pub struct CpuImage {
    data: Vec<f32>,
    width: u32,
    height: u32,
    channels: u32,
}

impl CpuImage {
    pub fn new(data: Vec<f32>, width: u32, height: u32, channels: u32) -> Self {
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

impl AsAny for CpuImage {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl ImageHandle for CpuImage {
    fn dimensions(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.channels)
    }
}

/// CPU primitives implementation.
pub struct CpuPrimitives {
    limits: GpuLimits,
}

impl CpuPrimitives {
    pub fn new() -> Self {
        // System RAM, 4 GB when detection fails
        let available = sys_info::mem_info()
            .map(|m| m.avail * 1024)
            .unwrap_or(4 * 1024 * 1024 * 1024);

        Self {
            limits: GpuLimits::unbounded(available),
        }
    }

    /// Runs `f` over every RGB triplet of `src`, writing `dst` and copying alpha.
    fn map_rgb<F>(src: &CpuImage, dst: &mut CpuImage, f: F) -> ComputeResult<()>
    where
        F: Fn([f32; 3]) -> [f32; 3] + Sync,
    {
        if src.dimensions() != dst.dimensions() {
            return Err(ComputeError::BufferSizeMismatch {
                expected: src.data.len(),
                actual: dst.data.len(),
            });
        }
        let c = src.channels as usize;
        if c < 3 {
            return Err(ComputeError::OperationFailed(format!(
                "RGB kernel needs at least 3 channels, got {c}"
            )));
        }

        dst.data
            .par_chunks_mut(c)
            .zip(src.data.par_chunks(c))
            .for_each(|(out, inp)| {
                let rgb = f([inp[0], inp[1], inp[2]]);
                out[..3].copy_from_slice(&rgb);
                out[3..].copy_from_slice(&inp[3..]);
            });

        Ok(())
    }
}

impl Default for CpuPrimitives {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuPrimitives for CpuPrimitives {
    type Handle = CpuImage;

    fn upload(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        channels: u32,
    ) -> ComputeResult<Self::Handle> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ComputeError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(CpuImage::new(data.to_vec(), width, height, channels))
    }

    fn download(&self, handle: &Self::Handle) -> ComputeResult<Vec<f32>> {
        Ok(handle.data.clone())
    }

    fn allocate(&self, width: u32, height: u32, channels: u32) -> ComputeResult<Self::Handle> {
        let size = (width as usize) * (height as usize) * (channels as usize);
        Ok(CpuImage::new(vec![0.0; size], width, height, channels))
    }

    fn exec_transfer(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        direction: Transfer,
    ) -> ComputeResult<()> {
        Self::map_rgb(src, dst, |[r, g, b]| {
            [direction.apply(r), direction.apply(g), direction.apply(b)]
        })
    }

    fn exec_affine(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        matrix: &Affine,
    ) -> ComputeResult<()> {
        Self::map_rgb(src, dst, |rgb| kernel::affine(matrix, rgb))
    }

    fn exec_hue_rotate(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        cos: f32,
        sin: f32,
    ) -> ComputeResult<()> {
        Self::map_rgb(src, dst, |rgb| kernel::hue_rotate(rgb, cos, sin))
    }

    fn limits(&self) -> &GpuLimits {
        &self.limits
    }

    fn name(&self) -> &'static str {
        "CPU"
    }
}

/// CPU backend wrapper.
pub struct CpuBackend {
    primitives: CpuPrimitives,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            primitives: CpuPrimitives::new(),
        }
    }

    /// Get inner primitives.
    pub fn primitives(&self) -> &CpuPrimitives {
        &self.primitives
    }

    fn cpu_handle(handle: &mut dyn ImageHandle) -> ComputeResult<&mut CpuImage> {
        handle
            .as_any_mut()
            .downcast_mut::<CpuImage>()
            .ok_or_else(|| ComputeError::OperationFailed("Invalid handle type".into()))
    }

    /// Runs a src -> dst kernel and swaps the result into `handle`.
    fn run_in_place<F>(&self, handle: &mut dyn ImageHandle, op: F) -> ComputeResult<()>
    where
        F: FnOnce(&CpuPrimitives, &CpuImage, &mut CpuImage) -> ComputeResult<()>,
    {
        let cpu_handle = Self::cpu_handle(handle)?;
        let mut dst =
            self.primitives
                .allocate(cpu_handle.width, cpu_handle.height, cpu_handle.channels)?;
        op(&self.primitives, cpu_handle, &mut dst)?;
        *cpu_handle = dst;
        Ok(())
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "CPU"
    }

    fn available_memory(&self) -> u64 {
        self.primitives.limits.available_memory
    }

    fn limits(&self) -> &GpuLimits {
        &self.primitives.limits
    }

    fn upload(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        channels: u32,
    ) -> ComputeResult<Box<dyn ImageHandle>> {
        let handle = self.primitives.upload(data, width, height, channels)?;
        Ok(Box::new(handle))
    }

    fn download(&self, handle: &dyn ImageHandle) -> ComputeResult<Vec<f32>> {
        let cpu_handle = handle
            .as_any()
            .downcast_ref::<CpuImage>()
            .ok_or_else(|| ComputeError::OperationFailed("Invalid handle type".into()))?;
        self.primitives.download(cpu_handle)
    }

    fn apply_transfer(
        &self,
        handle: &mut dyn ImageHandle,
        direction: Transfer,
    ) -> ComputeResult<()> {
        self.run_in_place(handle, |p, src, dst| p.exec_transfer(src, dst, direction))
    }

    fn apply_affine(&self, handle: &mut dyn ImageHandle, matrix: &Affine) -> ComputeResult<()> {
        self.run_in_place(handle, |p, src, dst| p.exec_affine(src, dst, matrix))
    }

    fn apply_hue_rotate(
        &self,
        handle: &mut dyn ImageHandle,
        cos: f32,
        sin: f32,
    ) -> ComputeResult<()> {
        self.run_in_place(handle, |p, src, dst| p.exec_hue_rotate(src, dst, cos, sin))
    }
}
