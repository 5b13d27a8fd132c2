//! SSD1306 OLED driver
//!
//! Driver for SSD1306-based monochrome OLED panels over I2C.
//!
//! Drawing is purely local: [`Ssd1306::set_pixel`] and
//! [`Ssd1306::clear_pixels`] only touch the in-memory framebuffer, and
//! nothing reaches the panel until [`Ssd1306::show`] sends the whole frame.
//! Presentation settings (contrast, inversion, flip, mirror, scrolling) go
//! out immediately as controller commands.
//!
//! # Usage
//!
//! ```ignore
//! let mut display = Ssd1306::open(&mut manager, "I2C-1", Ssd1306Config::default())?;
//! display.set_pixel(10, 20, true)?;
//! display.show()?;
//! display.start_scroll(0, 7, ScrollMode::LeftHorizontal)?;
//! display.close()?;
//! ```

use core::mem;

use periph_hal::{I2cChannel, I2cManager, COMMAND_REGISTER};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::command::{self, cmd, FLIP, INVERSION, MIRROR, POWER};
use super::{DisplayError, DisplayState, Framebuffer, ScrollMode};

/// I2C address with SA0 tied to ground
pub const ADDRESS_SA0_LOW: u8 = 0x3C;

/// I2C address with SA0 tied high
pub const ADDRESS_SA0_HIGH: u8 = 0x3D;

/// Default panel dimensions
pub const DEFAULT_WIDTH: u16 = 128;
pub const DEFAULT_HEIGHT: u16 = 64;

/// Framebuffer capacity for the default 128x64 panel
pub const DEFAULT_BUFFER_LEN: usize =
    Framebuffer::<0>::required_len(DEFAULT_WIDTH, DEFAULT_HEIGHT);

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ssd1306Config {
    /// I2C address, used when opening through an [`I2cManager`]
    pub address: u8,
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
}

impl Default for Ssd1306Config {
    fn default() -> Self {
        Self {
            address: ADDRESS_SA0_LOW,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Ssd1306Config {
    /// 128x32 panel at the default address
    pub const fn w128_h32() -> Self {
        Self {
            address: ADDRESS_SA0_LOW,
            width: 128,
            height: 32,
        }
    }
}

enum Link<CH> {
    Open(CH),
    Closed,
}

/// SSD1306 driver
///
/// `N` is the framebuffer capacity in bytes; the default fits a 128x64
/// panel. Smaller panels work with the default too.
pub struct Ssd1306<CH, const N: usize = DEFAULT_BUFFER_LEN> {
    address: u8,
    link: Link<CH>,
    framebuffer: Framebuffer<N>,
}

impl<CH: I2cChannel> Ssd1306<CH> {
    /// Initialize a display on an already open channel
    ///
    /// On any failure the channel is closed before the error is returned.
    pub fn new(channel: CH, config: Ssd1306Config) -> Result<Self, DisplayError<CH::Error>> {
        Self::new_sized(channel, config)
    }

    /// Open `config.address` on the named bus and initialize the display
    pub fn open<M>(
        manager: &mut M,
        bus: &str,
        config: Ssd1306Config,
    ) -> Result<Self, DisplayError<CH::Error>>
    where
        M: I2cManager<Channel = CH>,
    {
        let channel = manager
            .open(bus, config.address)
            .map_err(DisplayError::Bus)?;
        Self::new(channel, config)
    }
}

impl<CH: I2cChannel, const N: usize> Ssd1306<CH, N> {
    /// Like [`Ssd1306::new`], with a framebuffer capacity of `N` bytes
    pub fn new_sized(channel: CH, config: Ssd1306Config) -> Result<Self, DisplayError<CH::Error>> {
        let Some(framebuffer) = Framebuffer::new(config.width, config.height) else {
            warn!(
                "SSD1306 {}x{} does not fit a {} byte framebuffer",
                config.width,
                config.height,
                N
            );
            let _ = channel.close();
            return Err(DisplayError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        };

        let mut display = Self {
            address: channel.address(),
            link: Link::Open(channel),
            framebuffer,
        };

        if let Err(e) = display.init() {
            warn!("SSD1306 init failed at 0x{:02x}, closing channel", display.address);
            let _ = display.close();
            return Err(e);
        }

        Ok(display)
    }

    /// Recommended power-up sequence
    ///
    /// If this changes, power cycle the panel before testing.
    fn init(&mut self) -> Result<(), DisplayError<CH::Error>> {
        debug!(
            "SSD1306 init at 0x{:02x} ({}x{})",
            self.address,
            self.framebuffer.width(),
            self.framebuffer.height()
        );

        self.channel()?
            .write(&command::INIT_PAYLOAD)
            .map_err(DisplayError::Bus)?;

        // Pixels stay invisible to the controller until the first show()
        self.framebuffer.set_control_byte(cmd::SET_START_LINE);

        // Clear any scroll left running by a previous session
        self.stop_scroll()
    }

    fn channel(&mut self) -> Result<&mut CH, DisplayError<CH::Error>> {
        match &mut self.link {
            Link::Open(channel) => Ok(channel),
            Link::Closed => Err(DisplayError::Closed),
        }
    }

    fn ensure_open(&self) -> Result<(), DisplayError<CH::Error>> {
        match self.link {
            Link::Open(_) => Ok(()),
            Link::Closed => Err(DisplayError::Closed),
        }
    }

    /// Send a single command byte
    fn command(&mut self, opcode: u8) -> Result<(), DisplayError<CH::Error>> {
        self.channel()?
            .write_reg_byte(COMMAND_REGISTER, opcode)
            .map_err(DisplayError::Bus)
    }

    /// Panel width in pixels
    pub fn width(&self) -> u16 {
        self.framebuffer.width()
    }

    /// Panel height in pixels
    pub fn height(&self) -> u16 {
        self.framebuffer.height()
    }

    /// Bus address of the controller
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current lifecycle state
    pub fn state(&self) -> DisplayState {
        match self.link {
            Link::Open(_) => DisplayState::Open,
            Link::Closed => DisplayState::Closed,
        }
    }

    /// `true` until [`close`](Self::close)
    pub fn is_open(&self) -> bool {
        self.state() == DisplayState::Open
    }

    /// Read-only view of the framebuffer
    pub fn framebuffer(&self) -> &Framebuffer<N> {
        &self.framebuffer
    }

    /// Read back a pixel from the framebuffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        self.framebuffer.pixel(x, y)
    }

    /// Set a pixel on or off
    ///
    /// Rendered on the next [`show`](Self::show).
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) -> Result<(), DisplayError<CH::Error>> {
        self.ensure_open()?;
        self.framebuffer.set_pixel(x, y, on)?;
        Ok(())
    }

    /// Clear all pixels
    ///
    /// Rendered on the next [`show`](Self::show).
    pub fn clear_pixels(&mut self) -> Result<(), DisplayError<CH::Error>> {
        self.ensure_open()?;
        self.framebuffer.clear();
        Ok(())
    }

    /// Render the framebuffer to the panel
    ///
    /// The framebuffer is only read, so a failed transfer leaves it intact
    /// and the call can simply be repeated.
    pub fn show(&mut self) -> Result<(), DisplayError<CH::Error>> {
        let Link::Open(channel) = &mut self.link else {
            return Err(DisplayError::Closed);
        };

        trace!("SSD1306 show ({} bytes)", self.framebuffer.as_bytes().len());
        channel
            .write_reg_byte(COMMAND_REGISTER, command::render_trigger())
            .map_err(DisplayError::Bus)?;
        channel
            .write(self.framebuffer.as_bytes())
            .map_err(DisplayError::Bus)
    }

    /// Set the contrast level (0-255)
    ///
    /// The level is checked before anything is sent.
    pub fn set_contrast(&mut self, level: i32) -> Result<(), DisplayError<CH::Error>> {
        self.ensure_open()?;
        let [select, level] = command::contrast(level)?;
        self.command(select)?;
        self.command(level)
    }

    /// Turn the panel on or off
    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError<CH::Error>> {
        self.command(POWER.opcode(on))
    }

    /// Invert all pixels
    pub fn set_display_inverse(&mut self, on: bool) -> Result<(), DisplayError<CH::Error>> {
        self.command(INVERSION.opcode(on))
    }

    /// Flip the image vertically
    pub fn set_display_flip(&mut self, on: bool) -> Result<(), DisplayError<CH::Error>> {
        self.command(FLIP.opcode(on))
    }

    /// Mirror the image horizontally
    pub fn set_display_mirror(&mut self, on: bool) -> Result<(), DisplayError<CH::Error>> {
        self.command(MIRROR.opcode(on))
    }

    /// Start continuous hardware scrolling between two rows
    ///
    /// Rows are sent as given; the controller defines what out-of-range
    /// values do.
    pub fn start_scroll(
        &mut self,
        start_y: u8,
        finish_y: u8,
        mode: ScrollMode,
    ) -> Result<(), DisplayError<CH::Error>> {
        debug!("SSD1306 scroll {} rows {}..{}", mode, start_y, finish_y);

        let payload = command::scroll_payload(start_y, finish_y, mode);
        self.channel()?
            .write(&payload)
            .map_err(DisplayError::Bus)?;
        self.command(cmd::ACTIVATE_SCROLL)
    }

    /// Stop scrolling
    pub fn stop_scroll(&mut self) -> Result<(), DisplayError<CH::Error>> {
        debug!("SSD1306 scroll stop");
        self.command(cmd::DEACTIVATE_SCROLL)
    }

    /// Close the channel
    ///
    /// The display is `Closed` afterwards even if the channel reports an
    /// error while closing. Closing an already closed display does nothing.
    pub fn close(&mut self) -> Result<(), DisplayError<CH::Error>> {
        match mem::replace(&mut self.link, Link::Closed) {
            Link::Open(channel) => {
                debug!("SSD1306 close at 0x{:02x}", self.address);
                channel.close().map_err(DisplayError::Bus)
            }
            Link::Closed => Ok(()),
        }
    }

    /// Give the channel back without closing it
    ///
    /// Returns `None` if the display was already closed.
    pub fn release(self) -> Option<CH> {
        match self.link {
            Link::Open(channel) => Some(channel),
            Link::Closed => None,
        }
    }
}
