//! Peripheral driver implementations
//!
//! Drivers for small register-addressed devices on an I2C bus. Each driver
//! owns an open [`periph_hal::I2cChannel`] and never touches the bus
//! hardware directly:
//!
//! - SSD1306 monochrome OLED controller (framebuffer, scrolling, contrast)
//! - AT24C serial EEPROM (paged writes, hardware address pins)
//! - SHTC1 temperature / humidity sensor

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod display;
pub mod eeprom;
pub mod sensor;

#[cfg(test)]
mod mock;

pub use display::{DisplayError, DisplayState, ScrollMode, Ssd1306, Ssd1306Config};
pub use eeprom::{AddressWidth, At24c, At24cConfig, EepromError};
pub use sensor::{Measurement, Precision, Shtc1, Shtc1Error};
