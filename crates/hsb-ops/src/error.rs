//! Error types for the adjustment pipeline.

use hsb_compute::ComputeError;
use thiserror::Error;

/// Pipeline step in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Copying the source into backend memory.
    Upload,
    /// sRGB to linear decode.
    Decode,
    /// Brightness/saturation affine.
    ColorControls,
    /// Hue rotation.
    HueAdjust,
    /// Linear to sRGB encode.
    Encode,
    /// Reading the result back.
    Download,
}

impl Stage {
    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Decode => "decode",
            Self::ColorControls => "color-controls",
            Self::HueAdjust => "hue-adjust",
            Self::Encode => "encode",
            Self::Download => "download",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A filter stage could not produce an output image.
///
/// Recoverable: the caller drops the frame and tries again next tick.
#[derive(Error, Debug)]
pub enum FilterEvaluationError {
    /// Source has zero width or height.
    #[error("cannot filter empty image ({width}x{height})")]
    EmptyImage {
        /// Source width
        width: u32,
        /// Source height
        height: u32,
    },

    /// A parameter is NaN or infinite.
    #[error("parameter {name} is not finite: {value}")]
    NonFiniteParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// The backend failed while running a stage.
    #[error("{stage} stage failed: {source}")]
    Backend {
        /// Failing stage
        stage: Stage,
        /// Backend error
        #[source]
        source: ComputeError,
    },

    /// Non-finite samples, or output that does not match the source layout.
    #[error("malformed image: {0}")]
    MalformedImage(String),
}

impl FilterEvaluationError {
    /// Wraps a backend error for `stage`.
    pub fn backend(stage: Stage, source: ComputeError) -> Self {
        Self::Backend { stage, source }
    }

    /// Stage that failed, if the failure came from the backend.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Backend { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for pipeline operations.
pub type FilterResult<T> = Result<T, FilterEvaluationError>;
