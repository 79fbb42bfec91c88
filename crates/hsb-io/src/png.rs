//! PNG format support.
//!
//! Reads 8-bit and 16-bit RGB, RGBA, gray and gray+alpha images (palette and
//! low bit depths are expanded by the decoder) into an RGBA `f32`
//! [`PixelBuffer`]. Writes 8-bit RGBA with an sRGB chunk.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek};
use std::path::Path;

use hsb_core::{ColorSpace, Origin, PixelBuffer};

use crate::{AssetLoadError, AssetResult};

/// Reads a PNG file. Rows are returned top-first ([`Origin::TopLeft`]).
pub fn read<P: AsRef<Path>>(path: P) -> AssetResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    read_from(BufReader::new(file))
}

/// Decodes PNG data from a reader.
pub fn read_from<R: BufRead + Seek>(reader: R) -> AssetResult<PixelBuffer> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| AssetLoadError::Decode(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| AssetLoadError::Decode("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| AssetLoadError::Decode(e.to_string()))?;

    let bytes = &buf[..info.buffer_size()];
    let samples: Vec<f32> = match info.bit_depth {
        png::BitDepth::Eight => bytes.iter().map(|&b| b as f32 / 255.0).collect(),
        png::BitDepth::Sixteen => bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]) as f32 / 65535.0)
            .collect(),
        other => {
            return Err(AssetLoadError::UnsupportedFormat(format!(
                "PNG bit depth {:?}",
                other
            )));
        }
    };

    let data: Vec<f32> = match info.color_type {
        png::ColorType::Rgba => samples,
        png::ColorType::Rgb => samples
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 1.0])
            .collect(),
        png::ColorType::Grayscale => samples.iter().flat_map(|&g| [g, g, g, 1.0]).collect(),
        png::ColorType::GrayscaleAlpha => samples
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(AssetLoadError::UnsupportedFormat(
                "indexed PNG was not expanded".into(),
            ));
        }
    };

    Ok(PixelBuffer::from_data(
        info.width,
        info.height,
        data,
        Origin::TopLeft,
        ColorSpace::DeviceRgb,
    )?)
}

/// Writes an image as 8-bit RGBA PNG.
///
/// Rows are written top-first whatever the buffer's origin. Values are
/// clamped to [0, 1].
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> AssetResult<()> {
    if image.is_empty() {
        return Err(AssetLoadError::Encode(format!(
            "cannot encode empty image {}x{}",
            image.width(),
            image.height()
        )));
    }
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| AssetLoadError::Encode(e.to_string()))?;

    let bytes = image.to_origin(Origin::TopLeft).to_rgba8();
    png_writer
        .write_image_data(&bytes)
        .map_err(|e| AssetLoadError::Encode(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> PixelBuffer {
        let mut bytes = Vec::new();
        for y in 0..h {
            for x in 0..w {
                bytes.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, 64, 200]);
            }
        }
        PixelBuffer::from_rgba8(w, h, &bytes, Origin::TopLeft, ColorSpace::DeviceRgb).unwrap()
    }

    #[test]
    fn test_roundtrip_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        let image = checker(16, 8);

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded.dimensions(), (16, 8));
        assert_eq!(loaded.origin(), Origin::TopLeft);
        assert_eq!(loaded.to_rgba8(), image.to_rgba8());
    }

    #[test]
    fn test_bottom_left_written_top_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flipped.png");
        let top_first = checker(4, 4);
        let bottom_first = top_first.to_origin(Origin::BottomLeft);

        write(&path, &bottom_first).unwrap();
        let loaded = read(&path).unwrap();
        assert_eq!(loaded.to_rgba8(), top_first.to_rgba8());
    }

    #[test]
    fn test_read_rgb_and_gray() {
        let dir = tempfile::tempdir().unwrap();

        let rgb_path = dir.path().join("rgb.png");
        {
            let file = File::create(&rgb_path).unwrap();
            let mut enc = png::Encoder::new(BufWriter::new(file), 2, 1);
            enc.set_color(png::ColorType::Rgb);
            enc.set_depth(png::BitDepth::Eight);
            let mut w = enc.write_header().unwrap();
            w.write_image_data(&[255, 0, 0, 0, 0, 255]).unwrap();
        }
        let rgb = read(&rgb_path).unwrap();
        assert_eq!(rgb.pixel(0, 0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb.pixel(1, 0), [0.0, 0.0, 1.0, 1.0]);

        let gray_path = dir.path().join("gray16.png");
        {
            let file = File::create(&gray_path).unwrap();
            let mut enc = png::Encoder::new(BufWriter::new(file), 1, 1);
            enc.set_color(png::ColorType::Grayscale);
            enc.set_depth(png::BitDepth::Sixteen);
            let mut w = enc.write_header().unwrap();
            w.write_image_data(&[0xFF, 0xFF]).unwrap();
        }
        let gray = read(&gray_path).unwrap();
        assert_eq!(gray.pixel(0, 0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = read_from(std::io::Cursor::new(b"not a png".to_vec())).unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode(_)));
    }

    #[test]
    fn test_write_empty_fails() {
        let dir = tempfile::tempdir().unwrap();
        let empty = PixelBuffer::empty(Origin::TopLeft, ColorSpace::DeviceRgb);
        assert!(matches!(
            write(dir.path().join("e.png"), &empty),
            Err(AssetLoadError::Encode(_))
        ));
    }
}
