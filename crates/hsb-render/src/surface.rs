//! Render targets.
//!
//! A [`RenderSurface`] hands out one [`Drawable`] per tick, takes a size hint
//! and presents. The renderer calls them in that order and never names a
//! graphics API.
//!
//! [`HeadlessSurface`] keeps drawables in memory as RGBA8 and records what
//! was presented. It can withhold drawables to imitate a display that is not
//! ready.

use hsb_core::transfer::{decode_rgba_inplace, encode_rgba_inplace};
use hsb_core::{ColorSpace, Origin, PixelBuffer};

use crate::error::SurfaceError;

/// One frame's writable target.
pub trait Drawable {
    /// Pixel size of the target.
    fn size(&self) -> (u32, u32);

    /// Renders `image` into the target in `color_space`.
    ///
    /// The image is placed at the top-left corner. Parts outside the target
    /// are clipped; uncovered target pixels stay transparent black.
    fn write_image(&mut self, image: &PixelBuffer, color_space: ColorSpace)
    -> Result<(), SurfaceError>;
}

/// Host-provided presentation target.
pub trait RenderSurface {
    /// Drawable type handed out per tick.
    type Drawable: Drawable;

    /// Current drawable, or `None` if the target is not ready this tick.
    fn acquire_drawable(&mut self) -> Option<Self::Drawable>;

    /// Logical size used for the next drawables.
    fn drawable_size(&self) -> (u32, u32);

    /// Changes the logical size.
    fn set_drawable_size(&mut self, width: u32, height: u32);

    /// Submits and shows `drawable`.
    fn commit_and_present(&mut self, drawable: Self::Drawable);
}

/// Converts `image` to top-first RGBA8 in `target` color space.
///
/// Values are clamped to [0, 1] only here, at quantization.
pub fn display_rgba8(image: &PixelBuffer, target: ColorSpace) -> Result<Vec<u8>, SurfaceError> {
    let top_first = image.to_origin(Origin::TopLeft);
    if top_first.color_space() == target {
        return Ok(top_first.to_rgba8());
    }
    let mut data = top_first.data().to_vec();
    match target {
        ColorSpace::LinearRgb => decode_rgba_inplace(&mut data),
        ColorSpace::DeviceRgb => encode_rgba_inplace(&mut data),
    }
    Ok(top_first.with_data(data)?.to_rgba8())
}

/// Copies the overlapping top-left region of `src` into `dst` (RGBA8).
pub(crate) fn blit_clipped(dst: &mut [u8], dst_size: (u32, u32), src: &[u8], src_size: (u32, u32)) {
    let w = dst_size.0.min(src_size.0) as usize * 4;
    let h = dst_size.1.min(src_size.1) as usize;
    let dst_stride = dst_size.0 as usize * 4;
    let src_stride = src_size.0 as usize * 4;
    for y in 0..h {
        dst[y * dst_stride..y * dst_stride + w]
            .copy_from_slice(&src[y * src_stride..y * src_stride + w]);
    }
}

// =============================================================================
// Headless surface
// =============================================================================

/// In-memory drawable.
#[derive(Debug)]
pub struct HeadlessDrawable {
    id: u64,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    reject_writes: bool,
}

impl HeadlessDrawable {
    /// Sequence number of the acquire that produced this drawable.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// RGBA8 contents, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl Drawable for HeadlessDrawable {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_image(
        &mut self,
        image: &PixelBuffer,
        color_space: ColorSpace,
    ) -> Result<(), SurfaceError> {
        if self.reject_writes {
            return Err(SurfaceError::Rejected(format!("drawable #{}", self.id)));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::EmptyDrawable {
                width: self.width,
                height: self.height,
            });
        }
        let rgba = display_rgba8(image, color_space)?;
        blit_clipped(
            &mut self.pixels,
            (self.width, self.height),
            &rgba,
            image.dimensions(),
        );
        Ok(())
    }
}

/// A presented frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedFrame {
    /// Drawable sequence number.
    pub id: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 contents, top row first.
    pub pixels: Vec<u8>,
}

impl PresentedFrame {
    /// RGBA8 at (x, y), y counted from the top.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Converts back to a top-left [`PixelBuffer`] in `color_space`.
    pub fn to_pixel_buffer(&self, color_space: ColorSpace) -> Result<PixelBuffer, SurfaceError> {
        Ok(PixelBuffer::from_rgba8(
            self.width,
            self.height,
            &self.pixels,
            Origin::TopLeft,
            color_space,
        )?)
    }
}

/// Offscreen surface backed by `Vec<u8>` drawables.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    size: (u32, u32),
    withheld: u32,
    skip_every: Option<u32>,
    reject_writes: bool,
    acquires: u64,
    acquired: u64,
    presented: u64,
    last: Option<PresentedFrame>,
}

impl HeadlessSurface {
    /// Surface whose drawables start at `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }

    /// Withholds the drawable on every `k`-th acquire (1-based). `0` disables.
    pub fn with_skip_every(mut self, k: u32) -> Self {
        self.skip_every = (k > 0).then_some(k);
        self
    }

    /// Withholds the drawable on the next `n` acquires.
    pub fn withhold(&mut self, n: u32) {
        self.withheld = n;
    }

    /// Makes drawables refuse writes until switched off.
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Calls to [`RenderSurface::acquire_drawable`], served or not.
    pub fn acquire_calls(&self) -> u64 {
        self.acquires
    }

    /// Drawables handed out.
    pub fn drawables_served(&self) -> u64 {
        self.acquired
    }

    /// Frames committed and presented.
    pub fn presented_count(&self) -> u64 {
        self.presented
    }

    /// Most recent presented frame.
    pub fn last_frame(&self) -> Option<&PresentedFrame> {
        self.last.as_ref()
    }

    fn ready(&mut self) -> bool {
        if self.withheld > 0 {
            self.withheld -= 1;
            return false;
        }
        match self.skip_every {
            Some(k) => self.acquires % k as u64 != 0,
            None => true,
        }
    }
}

impl RenderSurface for HeadlessSurface {
    type Drawable = HeadlessDrawable;

    fn acquire_drawable(&mut self) -> Option<HeadlessDrawable> {
        self.acquires += 1;
        if !self.ready() {
            tracing::trace!(acquire = self.acquires, "drawable withheld");
            return None;
        }
        self.acquired += 1;
        let (width, height) = self.size;
        Some(HeadlessDrawable {
            id: self.acquires,
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            reject_writes: self.reject_writes,
        })
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_drawable_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn commit_and_present(&mut self, drawable: HeadlessDrawable) {
        self.presented += 1;
        self.last = Some(PresentedFrame {
            id: drawable.id,
            width: drawable.width,
            height: drawable.height,
            pixels: drawable.pixels,
        });
    }
}
