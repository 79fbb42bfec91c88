//! Hue, saturation and brightness parameters.

use std::f32::consts::PI;

use crate::error::{FilterEvaluationError, FilterResult};

/// Inclusive control range with a rest value, for host sliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// Value at rest (and after reset).
    pub default: f32,
}

impl SliderRange {
    /// Clamps `v` into the range. The pipeline itself never clamps.
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    /// True if `v` lies within the range.
    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    /// Maps `t` in [0, 1] linearly onto the range.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }
}

/// Hue slider: radians.
pub const HUE_RANGE: SliderRange = SliderRange {
    min: -PI,
    max: PI,
    default: 0.0,
};

/// Saturation slider: multiplier.
pub const SATURATION_RANGE: SliderRange = SliderRange {
    min: 0.0,
    max: 2.0,
    default: 1.0,
};

/// Brightness slider: additive offset.
pub const BRIGHTNESS_RANGE: SliderRange = SliderRange {
    min: -1.0,
    max: 1.0,
    default: 0.0,
};

/// The three live adjustment values.
///
/// Values are taken as given. Host UIs use the slider ranges above, but any
/// finite value is a valid input to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HsbParameters {
    /// Hue rotation in radians.
    pub hue: f32,
    /// Chroma multiplier (1.0 = unchanged, 0.0 = gray).
    pub saturation: f32,
    /// Additive offset in linear light.
    pub brightness: f32,
}

impl Default for HsbParameters {
    fn default() -> Self {
        Self {
            hue: HUE_RANGE.default,
            saturation: SATURATION_RANGE.default,
            brightness: BRIGHTNESS_RANGE.default,
        }
    }
}

impl HsbParameters {
    /// Creates parameters from explicit values.
    pub fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Neutral parameters: hue 0, saturation 1, brightness 0.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Exact comparison against [`HsbParameters::identity`].
    pub fn is_identity(&self) -> bool {
        self.hue == 0.0 && self.saturation == 1.0 && self.brightness == 0.0
    }

    /// Returns a copy with `hue` replaced.
    pub fn with_hue(mut self, hue: f32) -> Self {
        self.hue = hue;
        self
    }

    /// Returns a copy with `saturation` replaced.
    pub fn with_saturation(mut self, saturation: f32) -> Self {
        self.saturation = saturation;
        self
    }

    /// Returns a copy with `brightness` replaced.
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    /// Copy with each value clamped to its slider range.
    pub fn clamped_to_sliders(&self) -> Self {
        Self {
            hue: HUE_RANGE.clamp(self.hue),
            saturation: SATURATION_RANGE.clamp(self.saturation),
            brightness: BRIGHTNESS_RANGE.clamp(self.brightness),
        }
    }

    /// Fails with [`FilterEvaluationError::NonFiniteParameter`] on NaN or infinity.
    pub fn validate(&self) -> FilterResult<()> {
        for (name, value) in [
            ("hue", self.hue),
            ("saturation", self.saturation),
            ("brightness", self.brightness),
        ] {
            if !value.is_finite() {
                return Err(FilterEvaluationError::NonFiniteParameter { name, value });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for HsbParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hue={:.3} sat={:.3} bright={:.3}",
            self.hue, self.saturation, self.brightness
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = HsbParameters::default();
        assert_eq!(p, HsbParameters::new(0.0, 1.0, 0.0));
        assert!(p.is_identity());
        assert!(!p.with_hue(0.1).is_identity());
    }

    #[test]
    fn test_ranges() {
        assert!(HUE_RANGE.contains(PI));
        assert!(HUE_RANGE.contains(-PI));
        assert!(!SATURATION_RANGE.contains(-0.01));
        assert_eq!(BRIGHTNESS_RANGE.clamp(3.0), 1.0);
        assert_eq!(SATURATION_RANGE.lerp(0.5), 1.0);
    }

    #[test]
    fn test_out_of_range_is_valid() {
        let p = HsbParameters::new(10.0, 5.0, -3.0);
        assert!(p.validate().is_ok());
        assert_eq!(p.clamped_to_sliders(), HsbParameters::new(PI, 2.0, -1.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = HsbParameters::identity()
            .with_saturation(f32::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            FilterEvaluationError::NonFiniteParameter {
                name: "saturation",
                ..
            }
        ));

        assert!(
            HsbParameters::identity()
                .with_brightness(f32::INFINITY)
                .validate()
                .is_err()
        );
    }
}
