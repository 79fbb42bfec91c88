//! Offscreen wgpu render target.
//!
//! Each drawable is an `Rgba8Unorm` texture. Writes go through the queue;
//! `commit_and_present` submits and keeps the texture as the presented frame.

use std::sync::Arc;

use hsb_core::{ColorSpace, PixelBuffer};
use wgpu::{Device, DeviceDescriptor, Features, Instance, Limits, Queue};

use crate::error::{RenderError, RenderResult, SurfaceError};
use crate::surface::{Drawable, RenderSurface, blit_clipped, display_rgba8};

/// Device and queue shared by the surface and its drawables.
pub struct GpuContext {
    device: Arc<Device>,
    queue: Arc<Queue>,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Creates a context on the high-performance adapter.
    pub fn new() -> RenderResult<Self> {
        pollster::block_on(Self::new_async(wgpu::PowerPreference::HighPerformance))
    }

    async fn new_async(power: wgpu::PowerPreference) -> RenderResult<Self> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: power,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::Gpu("no suitable adapter".into()))?;

        let adapter_info = adapter.get_info();

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("hsb-render"),
                    required_features: Features::empty(),
                    required_limits: Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::Gpu(e.to_string()))?;

        tracing::debug!(adapter = %adapter_info.name, backend = ?adapter_info.backend, "render context created");

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }

    /// Adapter name.
    pub fn device_name(&self) -> &str {
        &self.adapter_info.name
    }

    /// Graphics API in use (Vulkan, Metal, DX12, ...).
    pub fn backend(&self) -> wgpu::Backend {
        self.adapter_info.backend
    }
}

/// Texture-backed drawable.
pub struct TextureDrawable {
    texture: wgpu::Texture,
    queue: Arc<Queue>,
    width: u32,
    height: u32,
}

impl TextureDrawable {
    /// Underlying texture.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl Drawable for TextureDrawable {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_image(
        &mut self,
        image: &PixelBuffer,
        color_space: ColorSpace,
    ) -> Result<(), SurfaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::EmptyDrawable {
                width: self.width,
                height: self.height,
            });
        }
        let rgba = display_rgba8(image, color_space)?;
        let mut texels = vec![0u8; self.width as usize * self.height as usize * 4];
        blit_clipped(&mut texels, (self.width, self.height), &rgba, image.dimensions());

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }
}

/// Offscreen surface handing out fresh textures.
pub struct TextureSurface {
    ctx: GpuContext,
    size: (u32, u32),
    presented: u64,
    last: Option<wgpu::Texture>,
}

impl TextureSurface {
    /// Surface on a new [`GpuContext`].
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self::with_context(GpuContext::new()?, width, height))
    }

    /// Surface on an existing context.
    pub fn with_context(ctx: GpuContext, width: u32, height: u32) -> Self {
        Self {
            ctx,
            size: (width, height),
            presented: 0,
            last: None,
        }
    }

    /// GPU context.
    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    /// Frames presented.
    pub fn presented_count(&self) -> u64 {
        self.presented
    }

    /// Texture of the most recent presented frame.
    pub fn last_texture(&self) -> Option<&wgpu::Texture> {
        self.last.as_ref()
    }
}

impl RenderSurface for TextureSurface {
    type Drawable = TextureDrawable;

    fn acquire_drawable(&mut self) -> Option<TextureDrawable> {
        let (width, height) = self.size;
        let texture = self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hsb_drawable"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        Some(TextureDrawable {
            texture,
            queue: Arc::clone(&self.ctx.queue),
            width,
            height,
        })
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_drawable_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn commit_and_present(&mut self, drawable: TextureDrawable) {
        self.ctx.queue.submit(std::iter::empty());
        self.presented += 1;
        self.last = Some(drawable.texture);
    }
}
