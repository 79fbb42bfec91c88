//! Two-stage color adjustment: color controls, then hue.
//!
//! [`ColorAdjustPipeline::apply`] is a pure function of the source image and
//! a parameter snapshot. Every call starts from the given source, so nothing
//! accumulates between frames.
//!
//! ```text
//! source --decode--> linear --ColorControls--> --HueAdjust--> --encode--> output
//!          (sRGB only)                                          (sRGB only)
//! ```

use std::time::Instant;

use hsb_compute::{Backend, ComputeResult, ProcessingBackend, Transfer, create_backend};
use hsb_core::image::CHANNELS;
use hsb_core::{ColorSpace, PixelBuffer};
use tracing::{debug, trace};

use crate::color_controls::ColorControls;
use crate::error::{FilterEvaluationError, FilterResult, Stage};
use crate::hue_adjust::HueAdjust;
use crate::params::HsbParameters;

/// Applies [`HsbParameters`] to a source image on a compute backend.
pub struct ColorAdjustPipeline {
    backend: Box<dyn ProcessingBackend>,
}

impl ColorAdjustPipeline {
    /// Pipeline on the CPU backend.
    pub fn new() -> Self {
        Self {
            backend: Box::new(hsb_compute::CpuBackend::new()),
        }
    }

    /// Pipeline on the requested backend.
    pub fn with_backend(backend: Backend) -> ComputeResult<Self> {
        let backend = create_backend(backend)?;
        debug!(backend = backend.name(), "color adjust pipeline created");
        Ok(Self { backend })
    }

    /// Pipeline on an already constructed backend.
    pub fn from_backend(backend: Box<dyn ProcessingBackend>) -> Self {
        Self { backend }
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Produces the adjusted image.
    ///
    /// The output has the source's dimensions, origin and color space. Alpha
    /// is copied unchanged.
    ///
    /// # Errors
    ///
    /// - [`FilterEvaluationError::EmptyImage`] for a zero-area source
    /// - [`FilterEvaluationError::NonFiniteParameter`] for NaN/inf parameters
    /// - [`FilterEvaluationError::MalformedImage`] for NaN/inf source samples,
    ///   or when the stages produce them
    /// - [`FilterEvaluationError::Backend`] when a stage fails; later stages
    ///   do not run
    pub fn apply(
        &self,
        source: &PixelBuffer,
        params: HsbParameters,
    ) -> FilterResult<PixelBuffer> {
        let (width, height) = source.dimensions();
        if source.is_empty() {
            return Err(FilterEvaluationError::EmptyImage { width, height });
        }
        params.validate()?;
        if let Some(i) = first_non_finite(source.data()) {
            return Err(FilterEvaluationError::MalformedImage(format!(
                "source sample {} is not finite",
                i
            )));
        }

        let start = Instant::now();
        let backend = self.backend.as_ref();
        let encoded = !source.color_space().is_linear();

        let mut handle = backend
            .upload(source.data(), width, height, CHANNELS as u32)
            .map_err(|e| FilterEvaluationError::backend(Stage::Upload, e))?;

        if encoded {
            backend
                .apply_transfer(handle.as_mut(), Transfer::SrgbToLinear)
                .map_err(|e| FilterEvaluationError::backend(Stage::Decode, e))?;
        }

        let controls = ColorControls::new(params.saturation, params.brightness);
        backend
            .apply_affine(handle.as_mut(), &controls.matrix())
            .map_err(|e| FilterEvaluationError::backend(Stage::ColorControls, e))?;

        let (cos, sin) = HueAdjust::new(params.hue).rotation();
        backend
            .apply_hue_rotate(handle.as_mut(), cos, sin)
            .map_err(|e| FilterEvaluationError::backend(Stage::HueAdjust, e))?;

        if encoded {
            backend
                .apply_transfer(handle.as_mut(), Transfer::LinearToSrgb)
                .map_err(|e| FilterEvaluationError::backend(Stage::Encode, e))?;
        }

        let data = backend
            .download(handle.as_ref())
            .map_err(|e| FilterEvaluationError::backend(Stage::Download, e))?;
        if let Some(i) = first_non_finite(&data) {
            return Err(FilterEvaluationError::MalformedImage(format!(
                "output sample {} is not finite",
                i
            )));
        }
        let output = source
            .with_data(data)
            .map_err(|e| FilterEvaluationError::MalformedImage(e.to_string()))?;

        trace!(
            width,
            height,
            %params,
            backend = backend.name(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "pipeline::apply"
        );
        Ok(output)
    }
}

impl Default for ColorAdjustPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ColorAdjustPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorAdjustPipeline")
            .field("backend", &self.backend.name())
            .finish()
    }
}

fn first_non_finite(data: &[f32]) -> Option<usize> {
    data.iter().position(|v| !v.is_finite())
}

/// Single-pixel version of [`ColorAdjustPipeline::apply`].
///
/// `color_space` describes how `rgba` is encoded, exactly as for a source
/// buffer.
pub fn adjust_pixel(
    rgba: [f32; CHANNELS],
    params: HsbParameters,
    color_space: ColorSpace,
) -> [f32; CHANNELS] {
    let encoded = !color_space.is_linear();
    let mut rgb = [rgba[0], rgba[1], rgba[2]];
    if encoded {
        rgb = hsb_core::transfer::eotf_rgb(rgb);
    }
    rgb = ColorControls::new(params.saturation, params.brightness).apply(rgb);
    rgb = HueAdjust::new(params.hue).apply(rgb);
    if encoded {
        rgb = hsb_core::transfer::oetf_rgb(rgb);
    }
    [rgb[0], rgb[1], rgb[2], rgba[3]]
}
