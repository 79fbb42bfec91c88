//! CLI command implementations

pub mod adjust;
pub mod backends;
pub mod info;
pub mod play;

use anyhow::{Context, Result};
use hsb_core::{Origin, PixelBuffer};
use std::path::Path;

/// Load the source asset. Failure here is fatal.
pub fn load_image(path: &Path, origin: Origin) -> Result<PixelBuffer> {
    hsb_io::load_asset(path, origin).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image as PNG
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    hsb_io::write_png(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
