//! Oklab perceptual color space.
//!
//! Conversions between linear sRGB and Oklab (Björn Ottosson, 2020), plus
//! the polar OkLCh helpers used by the hue stage. Rotating the `(a, b)`
//! plane changes hue while keeping lightness `L` and chroma
//! `sqrt(a² + b²)` fixed.
//!
//! ```rust
//! use hsb_core::oklab::{linear_srgb_to_oklab, oklab_to_linear_srgb};
//!
//! let lab = linear_srgb_to_oklab([1.0, 1.0, 1.0]);
//! assert!((lab[0] - 1.0).abs() < 1e-4);
//! let rgb = oklab_to_linear_srgb(lab);
//! assert!((rgb[1] - 1.0).abs() < 1e-4);
//! ```

use glam::Vec3;

/// Linear sRGB to LMS cone response (rows).
pub const RGB_TO_LMS: [Vec3; 3] = [
    Vec3::new(0.412_221_47, 0.536_332_55, 0.051_445_995),
    Vec3::new(0.211_903_5, 0.680_699_5, 0.107_396_96),
    Vec3::new(0.088_302_46, 0.281_718_85, 0.629_978_7),
];

/// Non-linear LMS to Lab (rows).
pub const LMS_TO_LAB: [Vec3; 3] = [
    Vec3::new(0.210_454_26, 0.793_617_8, -0.004_072_047),
    Vec3::new(1.977_998_5, -2.428_592_2, 0.450_593_7),
    Vec3::new(0.025_904_037, 0.782_771_77, -0.808_675_77),
];

/// Lab to non-linear LMS (rows).
pub const LAB_TO_LMS: [Vec3; 3] = [
    Vec3::new(1.0, 0.396_337_78, 0.215_803_76),
    Vec3::new(1.0, -0.105_561_346, -0.063_854_17),
    Vec3::new(1.0, -0.089_484_18, -1.291_485_5),
];

/// LMS to linear sRGB (rows).
pub const LMS_TO_RGB: [Vec3; 3] = [
    Vec3::new(4.076_741_7, -3.307_711_6, 0.230_969_94),
    Vec3::new(-1.268_438, 2.609_757_4, -0.341_319_38),
    Vec3::new(-0.004_196_086_3, -0.703_418_6, 1.707_614_7),
];

#[inline]
fn mul_rows(rows: &[Vec3; 3], v: Vec3) -> Vec3 {
    Vec3::new(rows[0].dot(v), rows[1].dot(v), rows[2].dot(v))
}

/// Converts linear sRGB to Oklab `[L, a, b]`.
#[inline]
pub fn linear_srgb_to_oklab(rgb: [f32; 3]) -> [f32; 3] {
    let lms = mul_rows(&RGB_TO_LMS, Vec3::from_array(rgb));
    let lms_ = Vec3::new(lms.x.cbrt(), lms.y.cbrt(), lms.z.cbrt());
    mul_rows(&LMS_TO_LAB, lms_).to_array()
}

/// Converts Oklab `[L, a, b]` to linear sRGB.
#[inline]
pub fn oklab_to_linear_srgb(lab: [f32; 3]) -> [f32; 3] {
    let lms_ = mul_rows(&LAB_TO_LMS, Vec3::from_array(lab));
    let lms = lms_ * lms_ * lms_;
    mul_rows(&LMS_TO_RGB, lms).to_array()
}

/// Rotates the `(a, b)` plane by an angle given as its cosine and sine.
#[inline]
pub fn rotate_ab(lab: [f32; 3], cos: f32, sin: f32) -> [f32; 3] {
    let [l, a, b] = lab;
    [l, a * cos - b * sin, a * sin + b * cos]
}

/// Oklab to OkLCh `[L, C, h]`, hue in radians.
#[inline]
pub fn oklab_to_oklch(lab: [f32; 3]) -> [f32; 3] {
    let [l, a, b] = lab;
    [l, a.hypot(b), b.atan2(a)]
}

/// OkLCh `[L, C, h]` to Oklab.
#[inline]
pub fn oklch_to_oklab(lch: [f32; 3]) -> [f32; 3] {
    let [l, c, h] = lch;
    [l, c * h.cos(), c * h.sin()]
}
