//! AT24C serial EEPROM
//!
//! Byte-addressable memory behind a register-style bus channel. Reads are a
//! single register read; writes are split into page-sized chunks, each
//! followed by the chip's write-cycle delay.

pub mod at24c;

pub use at24c::{At24c, NoPin, ADDRESS_PREFIX, MAX_ADDRESS_PINS, MAX_BUS_NAME_LEN};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur while accessing the EEPROM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError<E> {
    /// Bus transfer failed
    Bus(E),
    /// Write attempted while the driver is read-only
    ReadOnly,
    /// Zero-length read or write
    EmptyTransfer,
    /// Access past the end of the memory
    OutOfRange { offset: usize, len: usize },
    /// Bus address lacks the `0b1010xxx` prefix
    InvalidAddress(u8),
    /// Address change requested on a driver without address pins
    NoAddressPins,
    /// Bus name longer than [`MAX_BUS_NAME_LEN`]
    BusNameTooLong,
    /// Capacity or page size inconsistent with the addressing mode
    InvalidConfig,
}

/// Width of the in-chip memory address sent ahead of each transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddressWidth {
    /// One address byte (up to 256 bytes)
    One,
    /// Two address bytes, big-endian (up to 64 KiB)
    Two,
}

impl AddressWidth {
    /// Largest capacity reachable with this width
    pub const fn max_capacity(self) -> usize {
        match self {
            AddressWidth::One => 0x100,
            AddressWidth::Two => 0x1_0000,
        }
    }
}

/// Memory geometry and timing for one AT24C part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct At24cConfig {
    /// Total size in bytes
    pub capacity: usize,
    /// Write page size in bytes
    pub page_size: usize,
    /// Memory address width
    pub address_width: AddressWidth,
    /// Delay after each page write (write cycle time)
    pub write_delay_us: u32,
    /// Delay after each read
    pub read_delay_us: u32,
}

impl At24cConfig {
    const fn part(capacity: usize, page_size: usize, address_width: AddressWidth) -> Self {
        Self {
            capacity,
            page_size,
            address_width,
            write_delay_us: 5_000,
            read_delay_us: 0,
        }
    }

    /// 2 Kbit, 8 byte pages
    pub const fn at24c02() -> Self {
        Self::part(256, 8, AddressWidth::One)
    }

    /// 32 Kbit, 32 byte pages
    pub const fn at24c32() -> Self {
        Self::part(4 * 1024, 32, AddressWidth::Two)
    }

    /// 64 Kbit, 32 byte pages
    pub const fn at24c64() -> Self {
        Self::part(8 * 1024, 32, AddressWidth::Two)
    }

    /// 128 Kbit, 64 byte pages
    pub const fn at24c128() -> Self {
        Self::part(16 * 1024, 64, AddressWidth::Two)
    }

    /// 256 Kbit, 64 byte pages
    pub const fn at24c256() -> Self {
        Self::part(32 * 1024, 64, AddressWidth::Two)
    }

    /// Check the geometry against the addressing mode
    pub fn is_valid(&self) -> bool {
        self.capacity > 0
            && self.capacity <= self.address_width.max_capacity()
            && self.page_size > 0
            && self.page_size <= self.capacity
    }
}

impl Default for At24cConfig {
    fn default() -> Self {
        Self::at24c32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for config in [
            At24cConfig::at24c02(),
            At24cConfig::at24c32(),
            At24cConfig::at24c64(),
            At24cConfig::at24c128(),
            At24cConfig::at24c256(),
        ] {
            assert!(config.is_valid());
            assert_eq!(config.capacity % config.page_size, 0);
        }
    }

    #[test]
    fn test_invalid_geometry() {
        let mut config = At24cConfig::at24c02();
        config.capacity = 512;
        assert!(!config.is_valid());

        let mut config = At24cConfig::at24c32();
        config.page_size = 0;
        assert!(!config.is_valid());
    }
}
