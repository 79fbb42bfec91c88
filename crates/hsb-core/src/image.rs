//! RGBA pixel buffer with declared origin and color space.
//!
//! [`PixelBuffer`] is the decoded source bitmap and every image derived from
//! it. Samples are `f32`, four channels, row-major, stored behind an
//! [`Arc`] so clones are cheap and mutation copies on write.
//!
//! # Memory Layout
//!
//! ```text
//! data[0..4]   = pixel (0, 0) RGBA
//! data[4..8]   = pixel (1, 0) RGBA
//! ...
//! data[w*4..]  = pixel (0, 1) RGBA
//! ```
//!
//! Row 0 is the first stored row. Whether that row is the top or the bottom
//! of the picture is recorded by [`Origin`]; the buffer never reorders rows
//! on its own.
//!
//! # Example
//!
//! ```rust
//! use hsb_core::{ColorSpace, Origin, PixelBuffer};
//!
//! let img = PixelBuffer::filled(4, 2, [0.5, 0.25, 1.0, 1.0], Origin::TopLeft, ColorSpace::DeviceRgb);
//! assert_eq!(img.dimensions(), (4, 2));
//! assert_eq!(img.pixel(3, 1), [0.5, 0.25, 1.0, 1.0]);
//! ```

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::rect::Rect;

/// Channels per pixel (RGBA).
pub const CHANNELS: usize = 4;

/// Which edge of the picture the first stored row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Origin {
    /// Row 0 is the top of the picture.
    #[default]
    TopLeft,
    /// Row 0 is the bottom of the picture (texture-style).
    BottomLeft,
}

impl Origin {
    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::BottomLeft => "bottom-left",
        }
    }
}

/// Encoding of the RGB samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColorSpace {
    /// Device RGB with the sRGB transfer curve applied.
    #[default]
    DeviceRgb,
    /// Scene-linear RGB with sRGB/Rec.709 primaries.
    LinearRgb,
}

impl ColorSpace {
    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::DeviceRgb => "device-rgb",
            Self::LinearRgb => "linear-rgb",
        }
    }

    /// True if samples are already linear light.
    pub fn is_linear(self) -> bool {
        matches!(self, Self::LinearRgb)
    }
}

/// Decoded RGBA `f32` image.
///
/// Origin and color space are fixed at construction and carried over to
/// every buffer created with [`PixelBuffer::with_data`].
#[derive(Clone)]
pub struct PixelBuffer {
    data: Arc<Vec<f32>>,
    width: u32,
    height: u32,
    origin: Origin,
    color_space: ColorSpace,
}

impl PixelBuffer {
    /// Creates a buffer of transparent black pixels.
    pub fn new(width: u32, height: u32, origin: Origin, color_space: ColorSpace) -> Self {
        let len = width as usize * height as usize * CHANNELS;
        Self {
            data: Arc::new(vec![0.0; len]),
            width,
            height,
            origin,
            color_space,
        }
    }

    /// Creates a zero-sized buffer.
    pub fn empty(origin: Origin, color_space: ColorSpace) -> Self {
        Self::new(0, 0, origin, color_space)
    }

    /// Creates a buffer from existing RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height * 4`.
    pub fn from_data(
        width: u32,
        height: u32,
        data: Vec<f32>,
        origin: Origin,
        color_space: ColorSpace,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            origin,
            color_space,
        })
    }

    /// Creates a buffer with every pixel set to `pixel`.
    pub fn filled(
        width: u32,
        height: u32,
        pixel: [f32; CHANNELS],
        origin: Origin,
        color_space: ColorSpace,
    ) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
            origin,
            color_space,
        }
    }

    /// Creates a buffer from 8-bit RGBA bytes, normalized to [0, 1].
    pub fn from_rgba8(
        width: u32,
        height: u32,
        bytes: &[u8],
        origin: Origin,
        color_space: ColorSpace,
    ) -> Result<Self> {
        let data = bytes.iter().map(|&b| b as f32 / 255.0).collect();
        Self::from_data(width, height, data, origin, color_space)
    }

    /// Creates a buffer from 8-bit RGB bytes with opaque alpha.
    pub fn from_rgb8(
        width: u32,
        height: u32,
        bytes: &[u8],
        origin: Origin,
        color_space: ColorSpace,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} RGB bytes, got {}", expected, bytes.len()),
            ));
        }
        let mut data = Vec::with_capacity(expected / 3 * CHANNELS);
        for px in bytes.chunks_exact(3) {
            data.extend_from_slice(&[
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
                1.0,
            ]);
        }
        Self::from_data(width, height, data, origin, color_space)
    }

    /// Builds a new buffer with this buffer's size, origin and color space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data` has the wrong length.
    pub fn with_data(&self, data: Vec<f32>) -> Result<Self> {
        Self::from_data(self.width, self.height, data, self.origin, self.color_space)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Full image rectangle at (0, 0).
    #[inline]
    pub fn extent(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True if the image has zero width or height.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Declared origin.
    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Declared color space.
    #[inline]
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Raw RGBA samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable samples. Copies the storage if it is shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// True if both buffers point at the same storage.
    pub fn shares_storage(&self, other: &PixelBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Pixel at stored coordinates. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; CHANNELS] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Pixel at stored coordinates, or `None` when out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; CHANNELS]> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Writes a pixel at stored coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [f32; CHANNELS]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let i = self.index(x, y);
        self.data_mut()[i..i + CHANNELS].copy_from_slice(&pixel);
        Ok(())
    }

    /// One stored row of samples.
    pub fn row(&self, y: u32) -> &[f32] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Returns a copy whose rows follow `origin`.
    ///
    /// When the origins differ the rows are flipped vertically; otherwise the
    /// storage is shared.
    pub fn to_origin(&self, origin: Origin) -> PixelBuffer {
        if origin == self.origin {
            return self.clone();
        }
        let stride = self.width as usize * CHANNELS;
        let mut data = Vec::with_capacity(self.data.len());
        for y in (0..self.height).rev() {
            data.extend_from_slice(self.row(y));
        }
        debug_assert_eq!(data.len(), stride * self.height as usize);
        Self {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
            origin,
            color_space: self.color_space,
        }
    }

    /// Quantizes to 8-bit RGBA in stored row order.
    ///
    /// Values are clamped to [0, 1] and rounded.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8)
            .collect()
    }

    /// Average RGBA over all pixels. Zero for an empty image.
    pub fn mean(&self) -> [f32; CHANNELS] {
        let mut sum = [0.0f64; CHANNELS];
        for px in self.data.chunks_exact(CHANNELS) {
            for (s, &v) in sum.iter_mut().zip(px) {
                *s += v as f64;
            }
        }
        let n = self.pixel_count().max(1) as f64;
        sum.map(|s| (s / n) as f32)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("origin", &self.origin)
            .field("color_space", &self.color_space)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&[x as f32, y as f32, 0.0, 1.0]);
            }
        }
        PixelBuffer::from_data(w, h, data, Origin::TopLeft, ColorSpace::DeviceRgb).unwrap()
    }

    #[test]
    fn test_from_data_length_check() {
        let err = PixelBuffer::from_data(2, 2, vec![0.0; 15], Origin::TopLeft, ColorSpace::DeviceRgb)
            .unwrap_err();
        assert!(err.is_dimension_error());

        let ok = PixelBuffer::from_data(2, 2, vec![0.0; 16], Origin::TopLeft, ColorSpace::DeviceRgb);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_empty() {
        let img = PixelBuffer::empty(Origin::BottomLeft, ColorSpace::DeviceRgb);
        assert!(img.is_empty());
        assert!(img.extent().is_empty());
        assert_eq!(img.mean(), [0.0; 4]);
    }

    #[test]
    fn test_pixel_access() {
        let mut img = ramp(3, 2);
        assert_eq!(img.pixel(2, 1), [2.0, 1.0, 0.0, 1.0]);
        assert!(img.get_pixel(3, 0).is_none());

        img.set_pixel(0, 0, [9.0, 9.0, 9.0, 0.5]).unwrap();
        assert_eq!(img.pixel(0, 0), [9.0, 9.0, 9.0, 0.5]);
        assert!(img.set_pixel(5, 5, [0.0; 4]).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_copy_on_write() {
        let a = ramp(2, 2);
        let mut b = a.clone();
        assert!(a.shares_storage(&b));

        b.data_mut()[0] = 42.0;
        assert!(!a.shares_storage(&b));
        assert_eq!(a.pixel(0, 0)[0], 0.0);
        assert_eq!(b.pixel(0, 0)[0], 42.0);
    }

    #[test]
    fn test_with_data_keeps_metadata() {
        let src = PixelBuffer::new(2, 1, Origin::BottomLeft, ColorSpace::LinearRgb);
        let out = src.with_data(vec![1.0; 8]).unwrap();
        assert_eq!(out.origin(), Origin::BottomLeft);
        assert_eq!(out.color_space(), ColorSpace::LinearRgb);
        assert_eq!(out.dimensions(), (2, 1));
        assert!(src.with_data(vec![1.0; 4]).is_err());
    }

    #[test]
    fn test_to_origin_flips_rows() {
        let img = ramp(2, 3);
        let flipped = img.to_origin(Origin::BottomLeft);
        assert_eq!(flipped.origin(), Origin::BottomLeft);
        assert_eq!(flipped.pixel(1, 0), img.pixel(1, 2));
        assert_eq!(flipped.pixel(0, 2), img.pixel(0, 0));

        let same = img.to_origin(Origin::TopLeft);
        assert!(same.shares_storage(&img));
    }

    #[test]
    fn test_rgba8_conversion() {
        let img = PixelBuffer::from_rgba8(
            1,
            1,
            &[255, 0, 128, 255],
            Origin::TopLeft,
            ColorSpace::DeviceRgb,
        )
        .unwrap();
        assert_eq!(img.to_rgba8(), vec![255, 0, 128, 255]);

        let rgb = PixelBuffer::from_rgb8(2, 1, &[0, 0, 0, 255, 255, 255], Origin::TopLeft, ColorSpace::DeviceRgb)
            .unwrap();
        assert_eq!(rgb.pixel(1, 0), [1.0, 1.0, 1.0, 1.0]);
        assert!(
            PixelBuffer::from_rgb8(2, 1, &[0; 5], Origin::TopLeft, ColorSpace::DeviceRgb).is_err()
        );
    }

    #[test]
    fn test_to_rgba8_clamps() {
        let img = PixelBuffer::filled(1, 1, [1.5, -0.2, 0.5, 1.0], Origin::TopLeft, ColorSpace::DeviceRgb);
        assert_eq!(img.to_rgba8(), vec![255, 0, 128, 255]);
    }
}
