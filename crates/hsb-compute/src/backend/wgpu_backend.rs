//! wgpu compute backend.
//!
//! One compute pipeline per kernel. Images live in storage buffers of
//! interleaved `f32`; each invocation handles one pixel.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::gpu_primitives::{AsAny, GpuPrimitives};
use super::tiling::workgroup_grid;
use super::{GpuLimits, ImageHandle, ProcessingBackend};
use crate::kernel::{Affine, Transfer};
use crate::shaders;
use crate::{ComputeError, ComputeResult};

// =============================================================================
// Uniform Buffers
// =============================================================================

/// `[width, height, channels, extra]`; `extra` selects the transfer direction.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct DimsUniform {
    dims: [u32; 4],
}

/// Affine rows padded to vec4.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct AffineUniform {
    rows: [[f32; 4]; 3],
}

/// Hue rotation: [cos, sin, 0, 0]
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct RotationUniform {
    rot: [f32; 4],
}

// =============================================================================
// WgpuImage Handle
// =============================================================================

/// Image in a storage buffer.
pub struct WgpuImage {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    channels: u32,
    size_bytes: u64,
}

impl AsAny for WgpuImage {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl ImageHandle for WgpuImage {
    fn dimensions(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.channels)
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

// =============================================================================
// Pipelines
// =============================================================================

struct Pipelines {
    transfer: wgpu::ComputePipeline,
    affine: wgpu::ComputePipeline,
    hue_rotate: wgpu::ComputePipeline,
}

// =============================================================================
// WgpuPrimitives
// =============================================================================

/// Device, queue and the three kernel pipelines.
pub struct WgpuPrimitives {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipelines: Pipelines,
    limits: GpuLimits,
    adapter_name: String,
}

impl WgpuPrimitives {
    /// True if an adapter can be opened.
    pub fn is_available() -> bool {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .is_some()
        })
    }

    /// Opens the high-performance adapter.
    pub fn new() -> ComputeResult<Self> {
        pollster::block_on(Self::new_async())
    }

    /// Async variant of [`WgpuPrimitives::new`].
    pub async fn new_async() -> ComputeResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ComputeError::NoAdapter)?;

        let adapter_limits = adapter.limits();
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("hsb_compute_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter_limits.clone(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| ComputeError::DeviceCreation(e.to_string()))?;

        let adapter_info = adapter.get_info();
        tracing::debug!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "wgpu device created"
        );

        let limits = GpuLimits {
            max_tile_dim: adapter_limits.max_texture_dimension_2d,
            max_buffer_bytes: adapter_limits
                .max_buffer_size
                .min(adapter_limits.max_storage_buffer_binding_size as u64),
            available_memory: estimate_vram(&adapter_info, adapter_limits.max_buffer_size),
        };

        let pipelines = Self::create_pipelines(&device);

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            pipelines,
            limits,
            adapter_name: adapter_info.name,
        })
    }

    /// Adapter name as reported by the driver.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn create_pipelines(device: &wgpu::Device) -> Pipelines {
        let create_pipeline = |source: &str, label: &str| -> wgpu::ComputePipeline {
            let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: None, // Auto layout
                module: &module,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            })
        };

        Pipelines {
            transfer: create_pipeline(shaders::SRGB_TRANSFER, "transfer_pipeline"),
            affine: create_pipeline(shaders::AFFINE, "affine_pipeline"),
            hue_rotate: create_pipeline(shaders::HUE_ROTATE, "hue_rotate_pipeline"),
        }
    }

    fn create_dims_buffer(&self, w: u32, h: u32, c: u32, extra: u32) -> wgpu::Buffer {
        let uniform = DimsUniform {
            dims: [w, h, c, extra],
        };
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("dims_uniform"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM,
            })
    }

    fn create_uniform<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM,
            })
    }

    fn check_pair(src: &WgpuImage, dst: &WgpuImage) -> ComputeResult<()> {
        if src.dimensions() != dst.dimensions() {
            return Err(ComputeError::BufferSizeMismatch {
                expected: src.size_bytes as usize,
                actual: dst.size_bytes as usize,
            });
        }
        if src.channels < 3 {
            return Err(ComputeError::OperationFailed(format!(
                "RGB kernel needs at least 3 channels, got {}",
                src.channels
            )));
        }
        Ok(())
    }

    /// Binds src/dst/dims (+ optional params at binding 3) and dispatches one
    /// invocation per pixel.
    fn run_kernel(
        &self,
        pipeline: &wgpu::ComputePipeline,
        label: &str,
        src: &WgpuImage,
        dst: &WgpuImage,
        extra: u32,
        params: Option<&wgpu::Buffer>,
    ) {
        let (w, h, c) = src.dimensions();
        let dims_buf = self.create_dims_buffer(w, h, c, extra);

        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: src.buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: dst.buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: dims_buf.as_entire_binding(),
            },
        ];
        if let Some(params) = params {
            entries.push(wgpu::BindGroupEntry {
                binding: 3,
                resource: params.as_entire_binding(),
            });
        }

        let layout = pipeline.get_bind_group_layout(0);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &layout,
            entries: &entries,
        });

        let workgroups = workgroup_grid(w as u64 * h as u64);
        self.dispatch_and_wait(pipeline, &bind_group, workgroups);
    }

    /// Submits `encoder` and blocks until the queue drains.
    fn dispatch_and_wait(
        &self,
        pipeline: &wgpu::ComputePipeline,
        bind_group: &wgpu::BindGroup,
        workgroups: (u32, u32, u32),
    ) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("compute_encoder"),
            });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("compute_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.dispatch_workgroups(workgroups.0, workgroups.1, workgroups.2);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
    }
}

impl GpuPrimitives for WgpuPrimitives {
    type Handle = WgpuImage;

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
        self.limits.check(width, height, channels)?;

        let size_bytes = (data.len() * 4) as u64;
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("image_buffer"),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            });

        Ok(WgpuImage {
            buffer,
            width,
            height,
            channels,
            size_bytes,
        })
    }

    fn download(&self, handle: &Self::Handle) -> ComputeResult<Vec<f32>> {
        let size = handle.size_bytes;

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staging_buffer"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&Default::default());
        encoder.copy_buffer_to_buffer(&handle.buffer, 0, &staging, 0, size);
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        self.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|_| ComputeError::OperationFailed("Map channel closed".into()))?
            .map_err(|e| ComputeError::OperationFailed(format!("Map failed: {e}")))?;

        let data = slice.get_mapped_range();
        let result: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();

        Ok(result)
    }

    fn allocate(&self, width: u32, height: u32, channels: u32) -> ComputeResult<Self::Handle> {
        self.limits.check(width, height, channels)?;
        let size_bytes = (width as u64) * (height as u64) * (channels as u64) * 4;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("output_buffer"),
            size: size_bytes,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(WgpuImage {
            buffer,
            width,
            height,
            channels,
            size_bytes,
        })
    }

    fn exec_transfer(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        direction: Transfer,
    ) -> ComputeResult<()> {
        Self::check_pair(src, dst)?;
        self.run_kernel(
            &self.pipelines.transfer,
            "transfer_bind_group",
            src,
            dst,
            direction as u32,
            None,
        );
        Ok(())
    }

    fn exec_affine(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        matrix: &Affine,
    ) -> ComputeResult<()> {
        Self::check_pair(src, dst)?;
        let uniform = AffineUniform {
            rows: [
                [matrix[0], matrix[1], matrix[2], matrix[3]],
                [matrix[4], matrix[5], matrix[6], matrix[7]],
                [matrix[8], matrix[9], matrix[10], matrix[11]],
            ],
        };
        let params = self.create_uniform("affine_uniform", &uniform);
        self.run_kernel(
            &self.pipelines.affine,
            "affine_bind_group",
            src,
            dst,
            0,
            Some(&params),
        );
        Ok(())
    }

    fn exec_hue_rotate(
        &self,
        src: &Self::Handle,
        dst: &mut Self::Handle,
        cos: f32,
        sin: f32,
    ) -> ComputeResult<()> {
        Self::check_pair(src, dst)?;
        let uniform = RotationUniform {
            rot: [cos, sin, 0.0, 0.0],
        };
        let params = self.create_uniform("rotation_uniform", &uniform);
        self.run_kernel(
            &self.pipelines.hue_rotate,
            "hue_rotate_bind_group",
            src,
            dst,
            0,
            Some(&params),
        );
        Ok(())
    }

    fn limits(&self) -> &GpuLimits {
        &self.limits
    }

    fn name(&self) -> &'static str {
        "wgpu"
    }
}

// =============================================================================
// WgpuBackend (ProcessingBackend)
// =============================================================================

/// [`ProcessingBackend`] over [`WgpuPrimitives`].
pub struct WgpuBackend {
    primitives: WgpuPrimitives,
}

impl WgpuBackend {
    /// True if an adapter can be opened.
    pub fn is_available() -> bool {
        WgpuPrimitives::is_available()
    }

    /// Opens the high-performance adapter.
    pub fn new() -> ComputeResult<Self> {
        Ok(Self {
            primitives: WgpuPrimitives::new()?,
        })
    }

    /// Get inner primitives.
    pub fn primitives(&self) -> &WgpuPrimitives {
        &self.primitives
    }

    fn run_in_place<F>(&self, handle: &mut dyn ImageHandle, op: F) -> ComputeResult<()>
    where
        F: FnOnce(&WgpuPrimitives, &WgpuImage, &mut WgpuImage) -> ComputeResult<()>,
    {
        let wgpu_handle = handle
            .as_any_mut()
            .downcast_mut::<WgpuImage>()
            .ok_or_else(|| ComputeError::OperationFailed("Invalid handle type".into()))?;

        let (w, h, c) = wgpu_handle.dimensions();
        let mut dst = self.primitives.allocate(w, h, c)?;
        op(&self.primitives, wgpu_handle, &mut dst)?;

        std::mem::swap(&mut wgpu_handle.buffer, &mut dst.buffer);
        Ok(())
    }
}

impl ProcessingBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
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
        let wgpu_handle = handle
            .as_any()
            .downcast_ref::<WgpuImage>()
            .ok_or_else(|| ComputeError::OperationFailed("Invalid handle type".into()))?;
        self.primitives.download(wgpu_handle)
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

// =============================================================================
// VRAM Estimation
// =============================================================================

fn estimate_vram(info: &wgpu::AdapterInfo, max_buffer_bytes: u64) -> u64 {
    if let Ok(mb) = std::env::var("HSB_GPU_MEMORY_MB") {
        if let Ok(mb) = mb.parse::<u64>() {
            return mb.saturating_mul(1024 * 1024);
        }
    }

    const MIB: u64 = 1 << 20;
    const GIB: u64 = 1 << 30;

    // wgpu exposes no VRAM query; twice the largest buffer is a usable guess.
    let guess = max_buffer_bytes.saturating_mul(2);
    let (lo, hi) = match info.device_type {
        wgpu::DeviceType::DiscreteGpu => (2 * GIB, 24 * GIB),
        wgpu::DeviceType::IntegratedGpu => (512 * MIB, 4 * GIB),
        wgpu::DeviceType::VirtualGpu => (GIB, 8 * GIB),
        _ => (256 * MIB, 2 * GIB),
    };
    guess.clamp(lo, hi) / 5 * 4
}
