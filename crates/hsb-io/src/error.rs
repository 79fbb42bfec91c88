//! Error types for asset loading.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or save an image asset.
///
/// Loading the source image is a startup step; callers treat this as fatal.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Asset does not exist.
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    Decode(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    Encode(String),

    /// Decoded data did not form a valid image.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] hsb_core::Error),
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetLoadError>;
