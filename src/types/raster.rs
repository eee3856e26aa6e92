//! RGBA raster buffers.

use image::RgbaImage;

use crate::error::{Result, TrapError};

/// Pixel value used for "no content".
pub const CLEAR: [u8; 4] = [0, 0, 0, 0];

/// An 8-bit RGBA raster in row-major order.
///
/// The buffer length is always `width * height * 4`. Alpha 0 means no
/// content; any other alpha means opaque content at that exact colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Create a fully transparent raster.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "raster must be at least 1x1, got {width}x{height}");
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap an existing RGBA buffer, checking it against the declared size.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TrapError::dimension(format!(
                "raster must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TrapError::dimension(format!(
                "buffer of {} bytes does not match {}x{} RGBA ({} bytes)",
                data.len(),
                width,
                height,
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Set the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Whether the pixel at (x, y) has content.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.data[self.offset(x, y) + 3] > 0
    }

    /// Like [`Raster::is_opaque`], treating out-of-bounds positions as empty.
    pub fn is_opaque_at(&self, x: i64, y: i64) -> bool {
        x >= 0
            && y >= 0
            && x < i64::from(self.width)
            && y < i64::from(self.height)
            && self.is_opaque(x as u32, y as u32)
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Build a same-sized raster by transforming every pixel.
    pub fn map_pixels(&self, mut f: impl FnMut([u8; 4]) -> [u8; 4]) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            data: self.pixels().flat_map(|p| f(p)).collect(),
        }
    }

    /// Number of pixels with content.
    pub fn opaque_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|p| p[3] > 0).count()
    }

    /// Fail with `DimensionMismatch` unless `other` has the same size.
    pub fn ensure_same_size(&self, other: &Raster, what: &str) -> Result<()> {
        if self.size() != other.size() {
            return Err(TrapError::dimension(format!(
                "{} is {}x{}, expected {}x{}",
                what, other.width, other.height, self.width, self.height
            )));
        }
        Ok(())
    }
}

impl TryFrom<RgbaImage> for Raster {
    type Error = TrapError;

    /// `RgbaImage` tolerates a buffer longer than its dimensions, so the
    /// length is checked again here.
    fn try_from(img: RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Raster::from_rgba(width, height, img.into_raw())
    }
}

impl From<Raster> for RgbaImage {
    fn from(raster: Raster) -> Self {
        // The buffer length invariant makes this infallible.
        RgbaImage::from_raw(raster.width, raster.height, raster.data)
            .unwrap_or_else(|| unreachable!("raster buffer length invariant violated"))
    }
}
