//! Error types for the render loop.

use hsb_compute::ComputeError;
use hsb_ops::FilterEvaluationError;
use thiserror::Error;

/// A drawable could not take the frame.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The drawable has no pixels to write into.
    #[error("drawable has zero size ({width}x{height})")]
    EmptyDrawable {
        /// Drawable width.
        width: u32,
        /// Drawable height.
        height: u32,
    },

    /// The target refused the write.
    #[error("drawable rejected the write: {0}")]
    Rejected(String),

    /// The image could not be prepared for display.
    #[error("cannot prepare image for display: {0}")]
    Image(#[from] hsb_core::Error),
}

/// Why a frame was dropped.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The adjustment pipeline failed.
    #[error(transparent)]
    Filter(#[from] FilterEvaluationError),

    /// Writing into the drawable failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Setup failures. Raised before the first frame, never per frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source image has no pixels.
    #[error("source image is empty ({width}x{height})")]
    EmptySource {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// The requested compute backend could not be created.
    #[error("compute backend unavailable: {0}")]
    Backend(#[from] ComputeError),

    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    Config(String),

    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// GPU surface setup failed.
    #[error("GPU surface error: {0}")]
    Gpu(String),
}

/// Result alias for setup operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
