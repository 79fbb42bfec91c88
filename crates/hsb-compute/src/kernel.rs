//! Per-pixel kernel math shared by the CPU backend.
//!
//! The WGSL sources in `shaders` mirror these functions line for line.

use hsb_core::{oklab, transfer};

/// 3x4 row-major affine transform: `out[i] = m[i*4..i*4+3] . rgb + m[i*4+3]`.
pub type Affine = [f32; 12];

/// Affine transform that leaves RGB unchanged.
pub const AFFINE_IDENTITY: Affine = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0,
];

/// Direction of the sRGB transfer kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Transfer {
    /// Decode sRGB to linear light (EOTF).
    SrgbToLinear = 0,
    /// Encode linear light to sRGB (OETF).
    LinearToSrgb = 1,
}

impl Transfer {
    /// Applies the transfer to one channel value.
    #[inline]
    pub fn apply(self, v: f32) -> f32 {
        match self {
            Self::SrgbToLinear => transfer::eotf(v),
            Self::LinearToSrgb => transfer::oetf(v),
        }
    }
}

/// Applies an [`Affine`] to an RGB triplet.
#[inline]
pub fn affine(m: &Affine, rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    [
        m[0] * r + m[1] * g + m[2] * b + m[3],
        m[4] * r + m[5] * g + m[6] * b + m[7],
        m[8] * r + m[9] * g + m[10] * b + m[11],
    ]
}

/// Rotates the hue of a linear RGB triplet in Oklab.
#[inline]
pub fn hue_rotate(rgb: [f32; 3], cos: f32, sin: f32) -> [f32; 3] {
    let lab = oklab::linear_srgb_to_oklab(rgb);
    oklab::oklab_to_linear_srgb(oklab::rotate_ab(lab, cos, sin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_affine_identity() {
        let rgb = [0.3, -0.2, 1.7];
        assert_eq!(affine(&AFFINE_IDENTITY, rgb), rgb);
    }

    #[test]
    fn test_affine_offset() {
        let mut m = AFFINE_IDENTITY;
        m[3] = 0.1;
        m[7] = 0.2;
        m[11] = 0.3;
        let out = affine(&m, [0.0, 0.0, 0.0]);
        assert_eq!(out, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_hue_rotate_zero_is_identity() {
        let rgb = [0.7, 0.3, 0.1];
        let out = hue_rotate(rgb, 1.0, 0.0);
        for i in 0..3 {
            assert_abs_diff_eq!(out[i], rgb[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn test_hue_rotate_keeps_gray() {
        let out = hue_rotate([0.4, 0.4, 0.4], 0.0, 1.0);
        for v in out {
            assert_abs_diff_eq!(v, 0.4, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_transfer_directions() {
        let lin = Transfer::SrgbToLinear.apply(0.5);
        assert_abs_diff_eq!(Transfer::LinearToSrgb.apply(lin), 0.5, epsilon = 1e-6);
    }
}
