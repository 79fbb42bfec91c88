//! # hsb-ops
//!
//! Hue, saturation and brightness adjustment for a decoded image.
//!
//! # Modules
//!
//! - [`params`] - [`HsbParameters`] and slider ranges
//! - [`color_controls`] - Stage 1: saturation and brightness as one affine
//! - [`hue_adjust`] - Stage 2: hue rotation in OkLCh
//! - [`pipeline`] - [`ColorAdjustPipeline`] running both stages on a backend
//!
//! # Example
//!
//! ```rust
//! use hsb_core::{ColorSpace, Origin, PixelBuffer};
//! use hsb_ops::{ColorAdjustPipeline, HsbParameters};
//!
//! let src = PixelBuffer::filled(4, 4, [0.8, 0.4, 0.2, 1.0], Origin::TopLeft, ColorSpace::DeviceRgb);
//! let pipeline = ColorAdjustPipeline::new();
//!
//! let out = pipeline.apply(&src, HsbParameters::new(0.5, 1.2, 0.05))?;
//! assert_eq!(out.dimensions(), (4, 4));
//! # Ok::<(), hsb_ops::FilterEvaluationError>(())
//! ```
//!
//! # Order
//!
//! Color controls always run before hue. The two stages do not commute:
//! brightness shifts every pixel toward or away from white in linear light,
//! which changes where a later hue rotation lands.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color_controls;
mod error;
pub mod hue_adjust;
pub mod params;
pub mod pipeline;

pub use color_controls::ColorControls;
pub use error::{FilterEvaluationError, FilterResult, Stage};
pub use hue_adjust::HueAdjust;
pub use params::{BRIGHTNESS_RANGE, HUE_RANGE, HsbParameters, SATURATION_RANGE, SliderRange};
pub use pipeline::{ColorAdjustPipeline, adjust_pixel};
