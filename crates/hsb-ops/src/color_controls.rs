//! Brightness and saturation as one affine operator.
//!
//! Works in linear light:
//!
//! ```text
//! luma = 0.2126 r + 0.7152 g + 0.0722 b
//! out  = luma + saturation * (in - luma) + brightness
//! ```
//!
//! Saturation scales each pixel's distance from its own neutral gray, so
//! `saturation = 0` yields a gray of equal luma and `1` leaves chroma alone.
//! Brightness is added after scaling. Nothing is clamped.

use hsb_compute::kernel::{self, AFFINE_IDENTITY, Affine};
use hsb_core::pixel::REC709_LUMA;

/// First stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorControls {
    /// Chroma multiplier.
    pub saturation: f32,
    /// Additive offset.
    pub brightness: f32,
}

impl Default for ColorControls {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            brightness: 0.0,
        }
    }
}

impl ColorControls {
    /// Creates the stage.
    pub fn new(saturation: f32, brightness: f32) -> Self {
        Self {
            saturation,
            brightness,
        }
    }

    /// Create identity (no change).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Check if this is identity (no-op).
    pub fn is_identity(&self) -> bool {
        self.saturation == 1.0 && self.brightness == 0.0
    }

    /// The combined 3x4 matrix: `M[i][j] = s * δij + (1 - s) * w[j]`, offset `b`.
    pub fn matrix(&self) -> Affine {
        let s = self.saturation;
        let mut m = AFFINE_IDENTITY;
        for row in 0..3 {
            for (col, &w) in REC709_LUMA.iter().enumerate() {
                let diag = if row == col { s } else { 0.0 };
                m[row * 4 + col] = diag + (1.0 - s) * w;
            }
            m[row * 4 + 3] = self.brightness;
        }
        m
    }

    /// Apply to one linear RGB pixel.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        kernel::affine(&self.matrix(), rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsb_core::pixel::luminance_rec709;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity() {
        let cc = ColorControls::identity();
        assert!(cc.is_identity());
        let rgb = [0.8, 0.3, 0.1];
        let out = cc.apply(rgb);
        for i in 0..3 {
            assert!((out[i] - rgb[i]).abs() < EPSILON);
        }
    }

    #[test]
    fn test_zero_saturation_is_luma_gray() {
        let rgb = [0.8, 0.3, 0.1];
        let luma = luminance_rec709(rgb);
        let out = ColorControls::new(0.0, 0.0).apply(rgb);
        for v in out {
            assert!((v - luma).abs() < EPSILON);
        }
    }

    #[test]
    fn test_saturation_preserves_luma() {
        let rgb = [0.8, 0.3, 0.1];
        let luma = luminance_rec709(rgb);
        for s in [0.0, 0.5, 1.5, 2.0] {
            let out = ColorControls::new(s, 0.0).apply(rgb);
            assert!((luminance_rec709(out) - luma).abs() < EPSILON, "s={}", s);
        }
    }

    #[test]
    fn test_brightness_is_additive() {
        let out = ColorControls::new(1.0, 0.25).apply([0.1, 0.2, 0.3]);
        assert!((out[0] - 0.35).abs() < EPSILON);
        assert!((out[1] - 0.45).abs() < EPSILON);
        assert!((out[2] - 0.55).abs() < EPSILON);
    }

    #[test]
    fn test_no_clamping() {
        let out = ColorControls::new(2.0, 1.0).apply([1.0, 0.0, 0.0]);
        assert!(out[0] > 1.0);
        let out = ColorControls::new(2.0, -1.0).apply([0.0, 1.0, 0.0]);
        assert!(out[0] < 0.0);
    }

    #[test]
    fn test_matrix_matches_formula() {
        let cc = ColorControls::new(1.3, -0.1);
        let rgb = [0.2, 0.6, 0.9];
        let luma = luminance_rec709(rgb);
        let expected = rgb.map(|c| luma + 1.3 * (c - luma) - 0.1);
        let out = cc.apply(rgb);
        for i in 0..3 {
            assert!((out[i] - expected[i]).abs() < EPSILON);
        }
    }
}
