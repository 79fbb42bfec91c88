//! Shared live parameters.
//!
//! UI threads write single fields as sliders move. The render path reads all
//! three once per frame. Each field is its own atomic, so a snapshot may mix
//! values from different UI events; the next frame picks up the rest.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use hsb_ops::HsbParameters;

/// `f32` stored as bits in an [`AtomicU32`].
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(v: f32) -> Self {
        Self(AtomicU32::new(v.to_bits()))
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::SeqCst))
    }

    #[inline]
    fn store(&self, v: f32) {
        self.0.store(v.to_bits(), Ordering::SeqCst);
    }
}

/// Lock-free parameter container shared between UI writers and the renderer.
///
/// Setters store values as given. Range limits belong to the host's sliders.
#[derive(Debug)]
pub struct ParameterState {
    hue: AtomicF32,
    saturation: AtomicF32,
    brightness: AtomicF32,
}

impl ParameterState {
    /// Creates a container holding `initial`.
    pub fn new(initial: HsbParameters) -> Self {
        Self {
            hue: AtomicF32::new(initial.hue),
            saturation: AtomicF32::new(initial.saturation),
            brightness: AtomicF32::new(initial.brightness),
        }
    }

    /// Creates a shared container holding `initial`.
    pub fn shared(initial: HsbParameters) -> Arc<Self> {
        Arc::new(Self::new(initial))
    }

    /// Hue slider moved.
    pub fn set_hue(&self, hue: f32) {
        self.hue.store(hue);
    }

    /// Saturation slider moved.
    pub fn set_saturation(&self, saturation: f32) {
        self.saturation.store(saturation);
    }

    /// Brightness slider moved.
    pub fn set_brightness(&self, brightness: f32) {
        self.brightness.store(brightness);
    }

    /// Stores all three fields, one at a time.
    pub fn set_all(&self, params: HsbParameters) {
        self.set_hue(params.hue);
        self.set_saturation(params.saturation);
        self.set_brightness(params.brightness);
    }

    /// Restores hue 0, saturation 1, brightness 0.
    pub fn reset_parameters(&self) {
        self.set_all(HsbParameters::identity());
        tracing::debug!("parameters reset");
    }

    /// Reads the three fields.
    pub fn snapshot(&self) -> HsbParameters {
        HsbParameters {
            hue: self.hue.load(),
            saturation: self.saturation.load(),
            brightness: self.brightness.load(),
        }
    }
}

impl Default for ParameterState {
    fn default() -> Self {
        Self::new(HsbParameters::identity())
    }
}
