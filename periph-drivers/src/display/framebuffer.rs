//! Packed 1-bit framebuffer
//!
//! Layout matches the controller's horizontal addressing mode, prefixed with
//! one control byte so the whole buffer can be sent in a single write:
//!
//! ```text
//! byte 0        control byte (start line command)
//! byte 1..      page 0: column 0..width, bit n = row n
//! ...           page 1: rows 8..16, and so on
//! ```
//!
//! Pixel `(x, y)` lives in byte `1 + x + (y / 8) * width`, bit `y % 8`.

use heapless::Vec;

/// Offset of the first pixel byte
pub const DATA_OFFSET: usize = 1;

/// Pixel coordinate outside the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelOutOfBounds {
    pub x: i32,
    pub y: i32,
}

/// Framebuffer for a `width` x `height` panel, backed by at most `N` bytes
///
/// The length is `width * ceil(height / 8) + 1`. When `height` is not a
/// multiple of 8 the last page is allocated in full, so this is larger than
/// `ceil(width * height / 8) + 1` (1025 rather than 961 bytes for 128x60).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer<const N: usize> {
    width: u16,
    height: u16,
    bytes: Vec<u8, N>,
}

impl<const N: usize> Framebuffer<N> {
    /// Bytes needed for a panel of the given size, control byte included
    ///
    /// Partial pages are rounded up so every row has a home.
    pub const fn required_len(width: u16, height: u16) -> usize {
        width as usize * (height as usize).div_ceil(8) + DATA_OFFSET
    }

    /// Allocate a zeroed framebuffer
    ///
    /// Returns `None` for an empty panel or one that does not fit in `N`.
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let mut bytes = Vec::new();
        bytes
            .resize(Self::required_len(width, height), 0)
            .ok()?;

        Some(Self {
            width,
            height,
            bytes,
        })
    }

    /// Panel width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Panel height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Byte index and bit position for a pixel, if it is on the panel
    pub fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }

        let (x, y) = (x as usize, y as usize);
        let index = DATA_OFFSET + x + (y / 8) * self.width as usize;
        Some((index, (y % 8) as u8))
    }

    /// Turn a single pixel on or off
    ///
    /// Only the addressed bit changes. Out-of-range coordinates leave the
    /// buffer untouched.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) -> Result<(), PixelOutOfBounds> {
        let (index, bit) = self.locate(x, y).ok_or(PixelOutOfBounds { x, y })?;

        if on {
            self.bytes[index] |= 1 << bit;
        } else {
            self.bytes[index] &= !(1 << bit);
        }
        Ok(())
    }

    /// Read back a single pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        self.locate(x, y)
            .map(|(index, bit)| self.bytes[index] & (1 << bit) != 0)
    }

    /// Zero all pixel data, keeping the control byte
    pub fn clear(&mut self) {
        self.bytes[DATA_OFFSET..].fill(0);
    }

    /// Control byte sent ahead of the pixel data
    pub fn control_byte(&self) -> u8 {
        self.bytes[0]
    }

    /// Replace the control byte
    pub fn set_control_byte(&mut self, value: u8) {
        self.bytes[0] = value;
    }

    /// Pixel data without the control byte
    pub fn pixels(&self) -> &[u8] {
        &self.bytes[DATA_OFFSET..]
    }

    /// Whole buffer as sent on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
