//! Hue rotation in OkLCh.
//!
//! The pixel is converted to Oklab, its `(a, b)` chroma vector is rotated by
//! the angle, and the result is converted back. Lightness and chroma are
//! unchanged; neutrals (a = b = 0) are fixed points.

use hsb_compute::kernel;

/// Second stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HueAdjust {
    /// Rotation in radians.
    pub angle: f32,
}

impl HueAdjust {
    /// Creates the stage.
    pub fn new(angle: f32) -> Self {
        Self { angle }
    }

    /// Check if this is identity (no-op).
    pub fn is_identity(&self) -> bool {
        self.angle == 0.0
    }

    /// `(cos, sin)` of the angle, as consumed by the kernels.
    #[inline]
    pub fn rotation(&self) -> (f32, f32) {
        let (sin, cos) = self.angle.sin_cos();
        (cos, sin)
    }

    /// Apply to one linear RGB pixel.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let (cos, sin) = self.rotation();
        kernel::hue_rotate(rgb, cos, sin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsb_core::oklab::{linear_srgb_to_oklab, oklab_to_oklch};
    use std::f32::consts::{PI, TAU};

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_zero_angle() {
        let rgb = [0.9, 0.4, 0.05];
        let out = HueAdjust::new(0.0).apply(rgb);
        for i in 0..3 {
            assert!((out[i] - rgb[i]).abs() < EPSILON);
        }
    }

    #[test]
    fn test_full_turn() {
        let rgb = [0.9, 0.4, 0.05];
        let out = HueAdjust::new(TAU).apply(rgb);
        for i in 0..3 {
            assert!((out[i] - rgb[i]).abs() < EPSILON);
        }
    }

    #[test]
    fn test_gray_is_fixed() {
        let out = HueAdjust::new(PI / 2.0).apply([0.18, 0.18, 0.18]);
        for v in out {
            assert!((v - 0.18).abs() < EPSILON);
        }
    }

    #[test]
    fn test_preserves_lightness_and_chroma() {
        let rgb = [0.5, 0.2, 0.1];
        let out = HueAdjust::new(2.0).apply(rgb);
        let before = oklab_to_oklch(linear_srgb_to_oklab(rgb));
        let after = oklab_to_oklch(linear_srgb_to_oklab(out));
        assert!((before[0] - after[0]).abs() < EPSILON);
        assert!((before[1] - after[1]).abs() < EPSILON);
        assert!((before[2] - after[2]).abs() > 0.1);
    }

    #[test]
    fn test_opposite_angles_cancel() {
        let rgb = [0.3, 0.6, 0.2];
        let out = HueAdjust::new(-1.1).apply(HueAdjust::new(1.1).apply(rgb));
        for i in 0..3 {
            assert!((out[i] - rgb[i]).abs() < EPSILON);
        }
    }
}
