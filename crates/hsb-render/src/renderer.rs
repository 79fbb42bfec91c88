//! Per-tick frame renderer.
//!
//! Each call to [`FrameRenderer::render_frame`] is an independent cycle over
//! the constant source, the current parameter snapshot and a fresh drawable.
//! Nothing carries over from one frame to the next.

use std::fmt;
use std::sync::Arc;

use hsb_core::{ColorSpace, PixelBuffer};
use hsb_ops::{ColorAdjustPipeline, HsbParameters};
use tracing::{trace, warn};

use crate::config::RenderConfig;
use crate::error::{FrameError, RenderError, RenderResult};
use crate::params::ParameterState;
use crate::surface::{Drawable, RenderSurface};

/// Result of one tick.
#[derive(Debug)]
pub enum FrameOutcome {
    /// The frame was committed and presented.
    Presented {
        /// Width of the presented drawable.
        width: u32,
        /// Height of the presented drawable.
        height: u32,
    },
    /// No drawable this tick. Not an error.
    Skipped,
    /// Processing or writing failed. Nothing was presented.
    Dropped(FrameError),
}

impl FrameOutcome {
    /// True for [`FrameOutcome::Presented`].
    pub fn is_presented(&self) -> bool {
        matches!(self, Self::Presented { .. })
    }

    /// True for [`FrameOutcome::Skipped`].
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// True for [`FrameOutcome::Dropped`].
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped(_))
    }
}

/// Running tally of frame outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Presented frames.
    pub presented: u64,
    /// Ticks without a drawable.
    pub skipped: u64,
    /// Ticks whose frame failed.
    pub dropped: u64,
}

impl FrameStats {
    /// Counts `outcome`.
    pub fn record(&mut self, outcome: &FrameOutcome) {
        match outcome {
            FrameOutcome::Presented { .. } => self.presented += 1,
            FrameOutcome::Skipped => self.skipped += 1,
            FrameOutcome::Dropped(_) => self.dropped += 1,
        }
    }

    /// All ticks counted.
    pub fn ticks(&self) -> u64 {
        self.presented + self.skipped + self.dropped
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks: {} presented, {} skipped, {} dropped",
            self.ticks(),
            self.presented,
            self.skipped,
            self.dropped
        )
    }
}

/// Drives the pipeline once per display tick.
pub struct FrameRenderer {
    source: PixelBuffer,
    params: Arc<ParameterState>,
    pipeline: ColorAdjustPipeline,
    output_color_space: ColorSpace,
}

impl FrameRenderer {
    /// Creates a renderer over a loaded source.
    ///
    /// # Errors
    ///
    /// [`RenderError::EmptySource`] if the source has no pixels.
    pub fn new(
        source: PixelBuffer,
        params: Arc<ParameterState>,
        pipeline: ColorAdjustPipeline,
        config: &RenderConfig,
    ) -> RenderResult<Self> {
        if source.is_empty() {
            return Err(RenderError::EmptySource {
                width: source.width(),
                height: source.height(),
            });
        }
        config.validate()?;
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            backend = pipeline.backend_name(),
            output = config.output_color_space.name(),
            "renderer ready"
        );
        Ok(Self {
            source,
            params,
            pipeline,
            output_color_space: config.output_color_space,
        })
    }

    /// Builds the pipeline and parameter container from `config`.
    ///
    /// Returns the renderer and the parameter handle for UI writers.
    pub fn from_config(
        source: PixelBuffer,
        config: &RenderConfig,
    ) -> RenderResult<(Self, Arc<ParameterState>)> {
        let pipeline = ColorAdjustPipeline::with_backend(config.backend)?;
        let params = ParameterState::shared(config.initial);
        let renderer = Self::new(source, Arc::clone(&params), pipeline, config)?;
        Ok((renderer, params))
    }

    /// The constant source image.
    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    /// Shared parameter container.
    pub fn params(&self) -> &Arc<ParameterState> {
        &self.params
    }

    /// Compute backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.pipeline.backend_name()
    }

    /// Color space drawables are written in.
    pub fn output_color_space(&self) -> ColorSpace {
        self.output_color_space
    }

    /// Applies the current parameters without touching a surface.
    pub fn render_offscreen(&self) -> Result<(PixelBuffer, HsbParameters), FrameError> {
        let snapshot = self.params.snapshot();
        let output = self.pipeline.apply(&self.source, snapshot)?;
        Ok((output, snapshot))
    }

    /// Renders one tick into `surface`.
    ///
    /// Never panics on per-frame failures and never retries. The next call
    /// proceeds normally whatever this one returned.
    pub fn render_frame<S: RenderSurface>(&self, surface: &mut S) -> FrameOutcome {
        let Some(mut drawable) = surface.acquire_drawable() else {
            trace!("no drawable, frame skipped");
            return FrameOutcome::Skipped;
        };

        let (output, snapshot) = match self.render_offscreen() {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(error = %e, "frame dropped");
                return FrameOutcome::Dropped(e);
            }
        };

        let (image_width, image_height) = output.dimensions();
        surface.set_drawable_size(image_width, image_height);

        if let Err(e) = drawable.write_image(&output, self.output_color_space) {
            warn!(error = %e, "frame dropped: drawable write failed");
            return FrameOutcome::Dropped(e.into());
        }

        let (width, height) = drawable.size();
        surface.commit_and_present(drawable);
        trace!(width, height, params = %snapshot, "frame presented");
        FrameOutcome::Presented { width, height }
    }
}

impl fmt::Debug for FrameRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("source", &self.source)
            .field("params", &self.params.snapshot())
            .field("backend", &self.pipeline.backend_name())
            .field("output_color_space", &self.output_color_space)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;
    use hsb_core::Origin;

    fn source() -> PixelBuffer {
        PixelBuffer::filled(
            4,
            3,
            [0.6, 0.4, 0.2, 1.0],
            Origin::BottomLeft,
            ColorSpace::DeviceRgb,
        )
    }

    fn renderer() -> FrameRenderer {
        FrameRenderer::new(
            source(),
            ParameterState::shared(HsbParameters::identity()),
            ColorAdjustPipeline::new(),
            &RenderConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_source_rejected() {
        let empty = PixelBuffer::empty(Origin::BottomLeft, ColorSpace::DeviceRgb);
        let err = FrameRenderer::new(
            empty,
            Arc::new(ParameterState::default()),
            ColorAdjustPipeline::new(),
            &RenderConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::EmptySource { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RenderConfig {
            frame_rate: 0,
            ..Default::default()
        };
        let err = FrameRenderer::new(
            source(),
            Arc::new(ParameterState::default()),
            ColorAdjustPipeline::new(),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_present_sets_drawable_size() {
        let renderer = renderer();
        let mut surface = HeadlessSurface::new(1, 1);

        let first = renderer.render_frame(&mut surface);
        // First drawable was acquired before the resize.
        assert!(matches!(first, FrameOutcome::Presented { width: 1, height: 1 }));
        assert_eq!(surface.drawable_size(), (4, 3));
        assert_eq!(surface.last_frame().unwrap().width, 1);

        let second = renderer.render_frame(&mut surface);
        assert!(matches!(second, FrameOutcome::Presented { width: 4, height: 3 }));
        let frame = surface.last_frame().unwrap();
        assert_eq!((frame.width, frame.height), (4, 3));
        assert_eq!(frame.pixel(3, 2), [153, 102, 51, 255]);
    }

    #[test]
    fn test_skip_has_no_side_effects() {
        let renderer = renderer();
        let mut surface = HeadlessSurface::new(4, 3);
        surface.withhold(1);

        let outcome = renderer.render_frame(&mut surface);
        assert!(outcome.is_skipped());
        assert_eq!(surface.presented_count(), 0);
        assert!(surface.last_frame().is_none());
    }

    #[test]
    fn test_non_finite_parameter_drops_frame() {
        let renderer = renderer();
        let mut surface = HeadlessSurface::new(4, 3);

        renderer.params().set_saturation(f32::INFINITY);
        let outcome = renderer.render_frame(&mut surface);
        assert!(matches!(outcome, FrameOutcome::Dropped(FrameError::Filter(_))));
        assert_eq!(surface.presented_count(), 0);

        renderer.params().set_saturation(1.0);
        assert!(renderer.render_frame(&mut surface).is_presented());
        assert_eq!(surface.presented_count(), 1);
    }

    #[test]
    fn test_write_failure_drops_frame() {
        let renderer = renderer();
        let mut surface = HeadlessSurface::new(4, 3);
        surface.set_reject_writes(true);

        let outcome = renderer.render_frame(&mut surface);
        assert!(matches!(outcome, FrameOutcome::Dropped(FrameError::Surface(_))));
        assert_eq!(surface.presented_count(), 0);

        surface.set_reject_writes(false);
        assert!(renderer.render_frame(&mut surface).is_presented());
    }

    #[test]
    fn test_stats() {
        let mut stats = FrameStats::default();
        stats.record(&FrameOutcome::Presented {
            width: 1,
            height: 1,
        });
        stats.record(&FrameOutcome::Skipped);
        stats.record(&FrameOutcome::Skipped);
        assert_eq!(stats.ticks(), 3);
        assert_eq!(stats.to_string(), "3 ticks: 1 presented, 2 skipped, 0 dropped");
    }

    #[test]
    fn test_debug_shows_backend() {
        let s = format!("{:?}", renderer());
        assert!(s.contains("FrameRenderer"));
        assert!(s.contains("CPU"));
    }
}
