//! Image info command.

use crate::InfoArgs;
use anyhow::Result;
use std::fs;

/// Prints dimensions, layout and mean color of each input.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    let origin = args.origin.into();
    for (i, path) in args.input.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let file_size = fs::metadata(path)?.len();
        let format = hsb_io::detect_format(path)?;
        let image = super::load_image(path, origin)?;
        let mean = image.mean();

        println!("{}", path.display());
        println!("  Format:      {}", format.name());
        println!("  Resolution:  {}x{}", image.width(), image.height());
        println!("  Pixels:      {}", image.pixel_count());
        println!("  Origin:      {}", image.origin().name());
        println!("  Color space: {}", image.color_space().name());
        println!("  File size:   {}", super::format_size(file_size));
        println!(
            "  Mean RGBA:   {:.4} {:.4} {:.4} {:.4}",
            mean[0], mean[1], mean[2], mean[3]
        );
        if verbose {
            println!("  Extent:      {}", image.extent());
        }
    }
    Ok(())
}
