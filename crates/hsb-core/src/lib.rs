//! # hsb-core
//!
//! Core types for the HSB (hue, saturation, brightness) adjustment pipeline.
//!
//! - [`PixelBuffer`] - Immutable-by-default RGBA `f32` bitmap with declared
//!   [`Origin`] and [`ColorSpace`]
//! - [`Rect`] - Image extent
//! - [`transfer`] - sRGB encode/decode
//! - [`oklab`] - Linear RGB to Oklab and back
//! - [`pixel`] - Rec.709 luma weights
//!
//! ## Crate Structure
//!
//! ```text
//! hsb-core (this crate)
//!    ^
//!    |
//!    +-- hsb-compute (CPU / wgpu kernels)
//!    +-- hsb-ops (ColorAdjustPipeline)
//!    +-- hsb-io (asset loading)
//!    +-- hsb-render (FrameRenderer)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization for [`Origin`] and [`ColorSpace`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod oklab;
pub mod pixel;
pub mod rect;
pub mod transfer;

pub use error::*;
pub use image::{CHANNELS, ColorSpace, Origin, PixelBuffer};
pub use rect::Rect;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{ColorSpace, Origin, PixelBuffer};
    pub use crate::rect::Rect;
}
