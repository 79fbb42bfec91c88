//! Luma weights shared by the saturation stage and its GPU kernel.

/// Rec.709 luminance coefficient for the red channel.
pub const REC709_LUMA_R: f32 = 0.2126;

/// Rec.709 luminance coefficient for the green channel.
pub const REC709_LUMA_G: f32 = 0.7152;

/// Rec.709 luminance coefficient for the blue channel.
pub const REC709_LUMA_B: f32 = 0.0722;

/// Rec.709 luminance coefficients as `[R, G, B]`.
pub const REC709_LUMA: [f32; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Rec.709 luminance of a linear RGB triplet.
///
/// ```rust
/// use hsb_core::pixel::luminance_rec709;
///
/// assert!((luminance_rec709([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn luminance_rec709(rgb: [f32; 3]) -> f32 {
    rgb[0] * REC709_LUMA_R + rgb[1] * REC709_LUMA_G + rgb[2] * REC709_LUMA_B
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f32 = REC709_LUMA.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_green_dominates() {
        assert!(luminance_rec709([0.0, 1.0, 0.0]) > luminance_rec709([1.0, 0.0, 1.0]));
    }
}
