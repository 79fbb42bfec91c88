//! sRGB transfer function.
//!
//! Piecewise curve with a linear segment near black and a 2.4 power above
//! it (IEC 61966-2-1). Inputs outside [0, 1] are accepted: negatives stay on
//! the linear segment, values above 1 continue the power curve.

/// sRGB EOTF: decodes sRGB encoded values to linear light.
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use hsb_core::transfer::eotf;
///
/// let linear = eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: encodes linear light to sRGB.
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

/// Applies [`eotf`] to an RGB triplet.
#[inline]
pub fn eotf_rgb(rgb: [f32; 3]) -> [f32; 3] {
    [eotf(rgb[0]), eotf(rgb[1]), eotf(rgb[2])]
}

/// Applies [`oetf`] to an RGB triplet.
#[inline]
pub fn oetf_rgb(rgb: [f32; 3]) -> [f32; 3] {
    [oetf(rgb[0]), oetf(rgb[1]), oetf(rgb[2])]
}

/// Decodes an RGBA buffer in place. Alpha is left alone.
pub fn decode_rgba_inplace(buffer: &mut [f32]) {
    for px in buffer.chunks_exact_mut(4) {
        px[0] = eotf(px[0]);
        px[1] = eotf(px[1]);
        px[2] = eotf(px[2]);
    }
}

/// Encodes an RGBA buffer in place. Alpha is left alone.
pub fn encode_rgba_inplace(buffer: &mut [f32]) {
    for px in buffer.chunks_exact_mut(4) {
        px[0] = oetf(px[0]);
        px[1] = oetf(px[1]);
        px[2] = oetf(px[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for i in 0..=100 {
            let v = i as f32 / 100.0;
            let back = oetf(eotf(v));
            assert!((v - back).abs() < 1e-5, "v={}, back={}", v, back);
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(eotf(0.0), 0.0);
        assert!((eotf(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(oetf(0.0), 0.0);
        assert!((oetf(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_inputs() {
        // Negative values stay on the linear toe.
        assert!((eotf(-0.1) - (-0.1 / 12.92)).abs() < 1e-7);
        assert!((oetf(eotf(-0.1)) + 0.1).abs() < 1e-6);
        // Above one keeps increasing.
        assert!(eotf(1.2) > 1.0);
        assert!((oetf(eotf(1.2)) - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_rgba_inplace_keeps_alpha() {
        let mut buf = [0.5, 0.5, 0.5, 0.5, 1.0, 0.0, 0.25, 0.75];
        decode_rgba_inplace(&mut buf);
        assert_eq!(buf[3], 0.5);
        assert_eq!(buf[7], 0.75);
        assert!((buf[0] - 0.214).abs() < 0.01);
        encode_rgba_inplace(&mut buf);
        assert!((buf[0] - 0.5).abs() < 1e-5);
        assert!((buf[6] - 0.25).abs() < 1e-5);
    }
}
