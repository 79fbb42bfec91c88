//! Error types for hsb-core buffer operations.
//!
//! # Usage
//!
//! ```rust
//! use hsb_core::{ColorSpace, Origin, PixelBuffer};
//!
//! let err = PixelBuffer::from_data(2, 2, vec![0.0; 3], Origin::TopLeft, ColorSpace::DeviceRgb)
//!     .unwrap_err();
//! assert!(err.is_dimension_error());
//! ```
//!
//! # Used By
//!
//! - [`crate::image::PixelBuffer`] - Construction checks
//! - `hsb-io` - Decoded asset validation
//! - `hsb-compute` - Handle round-trips

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or accessing a [`crate::PixelBuffer`].
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Sample count does not match the declared dimensions.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// What was wrong
        reason: String,
    },

    /// Two buffers were expected to have the same size.
    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        /// Expected width
        expected_width: u32,
        /// Expected height
        expected_height: u32,
        /// Actual width
        actual_width: u32,
        /// Actual height
        actual_height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`].
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] from `(width, height)` pairs.
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        }
    }

    /// Returns true for size-related errors.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. } | Self::DimensionMismatch { .. }
        )
    }

    /// Returns true for out-of-bounds access.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_dimensions(4, 2, "expected 32 elements, got 3");
        assert_eq!(
            err.to_string(),
            "invalid dimensions 4x2: expected 32 elements, got 3"
        );

        let err = Error::dimension_mismatch((8, 8), (4, 4));
        assert!(err.to_string().contains("8x8"));
        assert!(err.to_string().contains("4x4"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::invalid_dimensions(1, 1, "x").is_dimension_error());
        assert!(Error::dimension_mismatch((1, 1), (2, 2)).is_dimension_error());

        let oob = Error::OutOfBounds {
            x: 5,
            y: 0,
            width: 4,
            height: 4,
        };
        assert!(oob.is_bounds_error());
        assert!(!oob.is_dimension_error());
    }
}
