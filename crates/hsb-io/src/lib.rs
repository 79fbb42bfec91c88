//! # hsb-io
//!
//! Loads the source asset into a [`PixelBuffer`] and saves rendered frames.
//!
//! # Example
//!
//! ```rust,ignore
//! use hsb_core::Origin;
//!
//! let source = hsb_io::load_asset("assets/neon.png", Origin::BottomLeft)?;
//! hsb_io::write_png("out.png", &source)?;
//! ```
//!
//! Files store rows top-first. When the asset is declared with
//! [`Origin::BottomLeft`] the rows are reordered on load so that row 0 is the
//! bottom of the picture, and reordered back on save.

mod error;
pub mod jpeg;
pub mod png;

pub use error::{AssetLoadError, AssetResult};

use std::path::Path;

use hsb_core::{Origin, PixelBuffer};
use tracing::{debug, trace};

/// Supported asset formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
}

impl ImageFormat {
    /// Format from a file extension (case-insensitive).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Format from leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }
}

/// Detects the format of `path` by extension, then by content.
pub fn detect_format<P: AsRef<Path>>(path: P) -> AssetResult<ImageFormat> {
    let path = path.as_ref();
    if let Some(format) = ImageFormat::from_extension(path) {
        return Ok(format);
    }
    let mut header = [0u8; 8];
    let n = {
        use std::io::Read;
        let mut file = std::fs::File::open(path)?;
        file.read(&mut header)?
    };
    ImageFormat::sniff(&header[..n])
        .ok_or_else(|| AssetLoadError::UnsupportedFormat(path.display().to_string()))
}

/// Loads the source asset with its declared origin.
///
/// # Errors
///
/// [`AssetLoadError::NotFound`] if the file does not exist, otherwise any
/// decode failure. Callers treat this as fatal at startup.
pub fn load_asset<P: AsRef<Path>>(path: P, origin: Origin) -> AssetResult<PixelBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AssetLoadError::NotFound(path.to_path_buf()));
    }

    let format = detect_format(path)?;
    let image = match format {
        ImageFormat::Png => png::read(path)?,
        ImageFormat::Jpeg => jpeg::read(path)?,
    };
    if image.is_empty() {
        return Err(AssetLoadError::Decode(format!(
            "{} decoded to an empty image",
            path.display()
        )));
    }

    debug!(
        path = %path.display(),
        format = format.name(),
        width = image.width(),
        height = image.height(),
        origin = origin.name(),
        "asset loaded"
    );
    Ok(image.to_origin(origin))
}

/// Saves an image as 8-bit PNG, top row first.
pub fn write_png<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> AssetResult<()> {
    let path = path.as_ref();
    png::write(path, image)?;
    trace!(path = %path.display(), "png written");
    Ok(())
}
