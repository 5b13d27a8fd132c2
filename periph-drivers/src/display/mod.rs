//! SSD1306 OLED display
//!
//! - [`command`]: opcode tables and payload encoding (no I/O)
//! - [`framebuffer`]: packed 1 bit per pixel page buffer (no I/O)
//! - [`ssd1306`]: the driver tying both to a bus channel

pub mod command;
pub mod framebuffer;
pub mod ssd1306;

#[cfg(feature = "graphics")]
mod graphics;

pub use command::{ContrastOutOfRange, ScrollMode};
pub use framebuffer::{Framebuffer, PixelOutOfBounds};
pub use ssd1306::{Ssd1306, Ssd1306Config, DEFAULT_BUFFER_LEN};

/// Errors that can occur while driving the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// Bus transfer failed
    Bus(E),
    /// Pixel coordinate outside the panel
    PixelOutOfBounds { x: i32, y: i32 },
    /// Contrast level outside 0..=255
    ContrastOutOfRange(i32),
    /// Display has been closed
    Closed,
    /// Panel size is zero or does not fit the framebuffer
    InvalidDimensions { width: u16, height: u16 },
}

impl<E> From<PixelOutOfBounds> for DisplayError<E> {
    fn from(e: PixelOutOfBounds) -> Self {
        DisplayError::PixelOutOfBounds { x: e.x, y: e.y }
    }
}

impl<E> From<ContrastOutOfRange> for DisplayError<E> {
    fn from(e: ContrastOutOfRange) -> Self {
        DisplayError::ContrastOutOfRange(e.0)
    }
}

/// Driver lifecycle
///
/// A display starts `Open` and becomes `Closed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayState {
    /// Channel held, commands accepted
    Open,
    /// Channel released; every operation fails with [`DisplayError::Closed`]
    Closed,
}
