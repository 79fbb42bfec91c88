//! Image extents.

/// Pixel-aligned extent. `y` counts rows in the owning buffer's origin.
///
/// # Example
///
/// ```rust
/// use hsb_core::Rect;
///
/// let extent = Rect::from_size(640, 480);
/// assert_eq!(extent.area(), 307_200);
/// assert_eq!(extent.to_string(), "640x480+0+0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rect {
    /// First column
    pub x: u32,
    /// First row
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Extent at `(x, y)`.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at (0, 0) with the given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// True if the pixel at `(col, row)` is covered.
    #[inline]
    pub const fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.x && col - self.x < self.width && row >= self.y && row - self.y < self.height
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}
