//! # hsb-render
//!
//! Ties the adjustment pipeline to a display: a lock-free parameter
//! container for UI writers, a surface abstraction, and the per-tick
//! [`FrameRenderer`].
//!
//! # Example
//!
//! ```rust
//! use hsb_core::{ColorSpace, Origin, PixelBuffer};
//! use hsb_render::{FrameRenderer, HeadlessSurface, RenderConfig};
//!
//! let source = PixelBuffer::filled(8, 8, [0.7, 0.3, 0.2, 1.0], Origin::BottomLeft, ColorSpace::DeviceRgb);
//! let (renderer, params) = FrameRenderer::from_config(source, &RenderConfig::default())?;
//! let mut surface = HeadlessSurface::new(8, 8);
//!
//! params.set_hue(0.8);
//! assert!(renderer.render_frame(&mut surface).is_presented());
//!
//! params.reset_parameters();
//! assert!(params.snapshot().is_identity());
//! # Ok::<(), hsb_render::RenderError>(())
//! ```
//!
//! # Features
//!
//! - `wgpu` - [`TextureSurface`] on a wgpu device, and the wgpu compute backend

#![warn(missing_docs)]

pub mod config;
mod error;
pub mod params;
pub mod renderer;
pub mod surface;

#[cfg(feature = "wgpu")]
pub mod texture;

pub use config::{DEFAULT_FRAME_RATE, RenderConfig};
pub use error::{FrameError, RenderError, RenderResult, SurfaceError};
pub use params::ParameterState;
pub use renderer::{FrameOutcome, FrameRenderer, FrameStats};
pub use surface::{
    Drawable, HeadlessDrawable, HeadlessSurface, PresentedFrame, RenderSurface, display_rgba8,
};

#[cfg(feature = "wgpu")]
pub use texture::{GpuContext, TextureDrawable, TextureSurface};
