//! AT24C driver
//!
//! # Example
//!
//! ```ignore
//! let mut eeprom = At24c::new(channel, delay, At24cConfig::at24c32())?;
//! eeprom.write(0x10, b"hello")?;
//!
//! let mut buf = [0u8; 5];
//! eeprom.read(0x10, &mut buf)?;
//! ```
//!
//! Parts with strap pins wired to GPIOs can be opened with
//! [`At24c::with_address_pins`] and moved with [`At24c::change_address`].

use core::mem;

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};
use periph_hal::{I2cChannel, I2cManager, OutputPin, Register};

use super::{AddressWidth, At24cConfig, EepromError};

/// Fixed upper bits of every AT24C bus address
pub const ADDRESS_PREFIX: u8 = 0b101_0000;

/// Bits of the bus address that must match [`ADDRESS_PREFIX`]
const PREFIX_MASK: u8 = 0b111_1000;

/// A0..A2
pub const MAX_ADDRESS_PINS: usize = 3;

pub const MAX_BUS_NAME_LEN: usize = 16;

/// Pin type for drivers without address pins
#[derive(Debug)]
pub enum NoPin {}

impl OutputPin for NoPin {
    fn set_high(&mut self) {
        match *self {}
    }

    fn set_low(&mut self) {
        match *self {}
    }

    fn is_set_high(&self) -> bool {
        match *self {}
    }
}

fn check_address<E>(address: u8) -> Result<(), EepromError<E>> {
    if address & PREFIX_MASK != ADDRESS_PREFIX {
        return Err(EepromError::InvalidAddress(address));
    }
    Ok(())
}

/// AT24C EEPROM on a bus channel
pub struct At24c<CH, D, P = NoPin> {
    channel: CH,
    delay: D,
    config: At24cConfig,
    address: u8,
    /// Bus the channel was opened on, kept for address changes
    bus: String<MAX_BUS_NAME_LEN>,
    /// Pin `i` drives address bit `i`
    pins: Vec<P, MAX_ADDRESS_PINS>,
    read_only: bool,
}

impl<CH: I2cChannel, D: DelayNs> At24c<CH, D, NoPin> {
    /// Wrap an already-open channel
    ///
    /// The channel is closed if the address or config is rejected.
    pub fn new(
        channel: CH,
        delay: D,
        config: At24cConfig,
    ) -> Result<Self, EepromError<CH::Error>> {
        let address = channel.address();
        if let Err(e) = Self::validate(address, &config) {
            warn!("AT24C rejected at 0x{:02x}, closing channel", address);
            let _ = channel.close();
            return Err(e);
        }

        debug!("AT24C at 0x{:02x}, {} bytes", address, config.capacity);

        Ok(Self {
            channel,
            delay,
            config,
            address,
            bus: String::new(),
            pins: Vec::new(),
            read_only: false,
        })
    }
}

impl<CH: I2cChannel, D: DelayNs, P: OutputPin> At24c<CH, D, P> {
    /// Drive the address pins to `address` and open a channel there
    pub fn with_address_pins<M>(
        manager: &mut M,
        bus: &str,
        pins: Vec<P, MAX_ADDRESS_PINS>,
        address: u8,
        delay: D,
        config: At24cConfig,
    ) -> Result<Self, EepromError<CH::Error>>
    where
        M: I2cManager<Channel = CH>,
    {
        Self::validate(address, &config)?;

        let mut bus_name = String::new();
        bus_name
            .push_str(bus)
            .map_err(|_| EepromError::BusNameTooLong)?;

        let mut pins = pins;
        drive_pins(&mut pins, address);

        let channel = manager.open(bus, address).map_err(EepromError::Bus)?;
        debug!(
            "AT24C at 0x{:02x} on {}, {} address pins",
            address,
            bus,
            pins.len()
        );

        Ok(Self {
            channel,
            delay,
            config,
            address,
            bus: bus_name,
            pins,
            read_only: false,
        })
    }

    fn validate(address: u8, config: &At24cConfig) -> Result<(), EepromError<CH::Error>> {
        check_address::<CH::Error>(address)?;
        if !config.is_valid() {
            return Err(EepromError::InvalidConfig);
        }
        Ok(())
    }

    /// Memory size in bytes
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn config(&self) -> &At24cConfig {
        &self.config
    }

    /// Current bus address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Reject writes while set
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<(), EepromError<CH::Error>> {
        if len == 0 {
            return Err(EepromError::EmptyTransfer);
        }
        match offset.checked_add(len) {
            Some(end) if end <= self.config.capacity => Ok(()),
            _ => Err(EepromError::OutOfRange { offset, len }),
        }
    }

    /// Memory address register for an in-range offset
    fn register(&self, offset: usize) -> Register {
        match self.config.address_width {
            AddressWidth::One => Register::Byte(offset as u8),
            AddressWidth::Two => Register::Word(offset as u16),
        }
    }

    /// Fill `buf` from memory starting at `offset`
    pub fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), EepromError<CH::Error>> {
        self.check_range(offset, buf.len())?;

        let reg = self.register(offset);
        self.channel
            .read_reg_buffer(reg, buf)
            .map_err(EepromError::Bus)?;
        if self.config.read_delay_us > 0 {
            self.delay.delay_us(self.config.read_delay_us);
        }
        Ok(())
    }

    /// Write `data` to memory starting at `offset`
    ///
    /// The data is split so no chunk crosses a page boundary; the chip would
    /// otherwise wrap within the page. Each chunk waits out the write cycle.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError<CH::Error>> {
        if self.read_only {
            return Err(EepromError::ReadOnly);
        }
        self.check_range(offset, data.len())?;

        let page_size = self.config.page_size;
        let mut offset = offset;
        let mut rest = data;

        while !rest.is_empty() {
            let room = page_size - offset % page_size;
            let (chunk, tail) = rest.split_at(room.min(rest.len()));

            trace!("AT24C page write at 0x{:04x}, {} bytes", offset, chunk.len());
            let reg = self.register(offset);
            self.channel
                .write_reg_buffer(reg, chunk)
                .map_err(EepromError::Bus)?;
            self.delay.delay_us(self.config.write_delay_us);

            offset += chunk.len();
            rest = tail;
        }
        Ok(())
    }

    /// Move the chip to a new bus address via its address pins
    ///
    /// The new channel is opened before the old one is closed. If opening
    /// fails the pins are driven back and the driver keeps its old channel.
    pub fn change_address<M>(
        &mut self,
        manager: &mut M,
        address: u8,
    ) -> Result<(), EepromError<CH::Error>>
    where
        M: I2cManager<Channel = CH>,
    {
        if self.pins.is_empty() {
            return Err(EepromError::NoAddressPins);
        }
        check_address::<CH::Error>(address)?;

        drive_pins(&mut self.pins, address);
        let channel = match manager.open(&self.bus, address) {
            Ok(channel) => channel,
            Err(e) => {
                warn!("AT24C reopen at 0x{:02x} failed", address);
                drive_pins(&mut self.pins, self.address);
                return Err(EepromError::Bus(e));
            }
        };

        debug!("AT24C moved 0x{:02x} -> 0x{:02x}", self.address, address);
        self.address = address;
        let old = mem::replace(&mut self.channel, channel);
        old.close().map_err(EepromError::Bus)
    }

    /// Close the channel and release the address pins
    pub fn close(self) -> Result<(), EepromError<CH::Error>> {
        debug!("AT24C at 0x{:02x} closed", self.address);
        self.channel.close().map_err(EepromError::Bus)
    }
}

fn drive_pins<P: OutputPin>(pins: &mut [P], address: u8) {
    for (i, pin) in pins.iter_mut().enumerate() {
        pin.set_state(address & (1 << i) != 0);
    }
}
