//! One-shot adjustment.

use crate::AdjustArgs;
use anyhow::{Context, Result};
use hsb_ops::{ColorAdjustPipeline, HsbParameters};
use std::time::Instant;

/// Loads the input, applies the parameters once, writes PNG.
pub fn run(args: AdjustArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input, args.origin.into())?;
    let params = HsbParameters::new(args.hue, args.saturation, args.brightness);

    let pipeline = ColorAdjustPipeline::with_backend(args.backend)
        .with_context(|| format!("Backend '{}' unavailable", args.backend))?;

    if verbose {
        println!(
            "Adjusting {} ({}x{}) on {}: {}",
            args.input.display(),
            image.width(),
            image.height(),
            pipeline.backend_name(),
            params
        );
    }

    let start = Instant::now();
    let output = pipeline
        .apply(&image, params)
        .with_context(|| format!("Failed to adjust: {}", args.input.display()))?;
    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "adjusted");

    super::save_image(&args.output, &output)?;

    if verbose {
        println!("Saved {}", args.output.display());
    }
    Ok(())
}
