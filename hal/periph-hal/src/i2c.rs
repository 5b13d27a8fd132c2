//! I2C channel abstractions
//!
//! A channel is one device on one bus: the address is fixed when the channel
//! is opened, so every operation below only names the device register.

/// Device register selector
///
/// Most peripherals use a single register byte. Larger EEPROMs and some
/// sensors take a 16-bit word, which goes out on the wire big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// 8-bit register address
    Byte(u8),
    /// 16-bit register address (sent MSB first)
    Word(u16),
}

/// Register 0, used by command-style controllers for every command byte
pub const COMMAND_REGISTER: Register = Register::Byte(0);

impl Register {
    /// Number of address bytes this register occupies on the wire
    pub const fn encoded_len(&self) -> usize {
        match self {
            Register::Byte(_) => 1,
            Register::Word(_) => 2,
        }
    }

    /// Encode the register address into `buf`, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8; 2]) -> &'a [u8] {
        match *self {
            Register::Byte(reg) => {
                buf[0] = reg;
                &buf[..1]
            }
            Register::Word(reg) => {
                *buf = reg.to_be_bytes();
                &buf[..2]
            }
        }
    }
}

impl From<u8> for Register {
    fn from(reg: u8) -> Self {
        Register::Byte(reg)
    }
}

impl From<u16> for Register {
    fn from(reg: u16) -> Self {
        Register::Word(reg)
    }
}

/// An open I2C channel to a single device
///
/// Implementations are blocking: every call returns once the transfer is
/// done or has failed. Errors are handed back unchanged; drivers never retry.
pub trait I2cChannel {
    /// Error type for channel operations
    type Error;

    /// 7-bit address this channel talks to
    fn address(&self) -> u8;

    /// Write raw bytes to the device
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read raw bytes from the device
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write a single byte to a register
    fn write_reg_byte(&mut self, reg: Register, value: u8) -> Result<(), Self::Error>;

    /// Write a buffer starting at a register
    fn write_reg_buffer(&mut self, reg: Register, data: &[u8]) -> Result<(), Self::Error>;

    /// Read a buffer starting at a register
    ///
    /// This is a write of the register address followed by a read with
    /// repeated start.
    fn read_reg_buffer(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Close the channel
    ///
    /// Consumes the channel, so a closed channel can never be used again.
    fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Opens channels by bus name
///
/// Bus discovery is platform specific (device nodes, board pin maps, ...),
/// so drivers only ever see this trait.
pub trait I2cManager {
    /// Channel type handed out by this manager
    type Channel: I2cChannel;

    /// Open a channel to `address` on the named bus
    fn open(
        &mut self,
        bus: &str,
        address: u8,
    ) -> Result<Self::Channel, <Self::Channel as I2cChannel>::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_register_encoding() {
        let mut buf = [0u8; 2];
        assert_eq!(Register::Byte(0x42).encode(&mut buf), &[0x42]);
        assert_eq!(Register::Byte(0x42).encoded_len(), 1);
    }

    #[test]
    fn test_word_register_is_big_endian() {
        let mut buf = [0u8; 2];
        assert_eq!(Register::Word(0xEFC8).encode(&mut buf), &[0xEF, 0xC8]);
        assert_eq!(Register::Word(0xEFC8).encoded_len(), 2);
    }

    #[test]
    fn test_register_from_int() {
        assert_eq!(Register::from(7u8), Register::Byte(7));
        assert_eq!(Register::from(0x0100u16), Register::Word(0x0100));
        assert_eq!(COMMAND_REGISTER, Register::Byte(0));
    }
}
