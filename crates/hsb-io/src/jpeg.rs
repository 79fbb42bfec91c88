//! JPEG reading.
//!
//! RGB, grayscale and CMYK JPEGs decode to opaque RGBA.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hsb_core::{ColorSpace, Origin, PixelBuffer};

use crate::{AssetLoadError, AssetResult};

/// Reads a JPEG file. Rows are returned top-first ([`Origin::TopLeft`]).
pub fn read<P: AsRef<Path>>(path: P) -> AssetResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    read_from(file)
}

/// Decodes JPEG data from a reader.
pub fn read_from<R: Read>(reader: R) -> AssetResult<PixelBuffer> {
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(reader));
    let pixels = decoder
        .decode()
        .map_err(|e| AssetLoadError::Decode(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| AssetLoadError::Decode("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let rgb: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l16| [l16[0], l16[0], l16[0]])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - cmyk[3] as f32 / 255.0;
                let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0) as u8;
                [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
            })
            .collect(),
    };

    Ok(PixelBuffer::from_rgb8(
        width,
        height,
        &rgb,
        Origin::TopLeft,
        ColorSpace::DeviceRgb,
    )?)
}
