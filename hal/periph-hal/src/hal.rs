//! `embedded-hal` bridge
//!
//! Wraps any `embedded_hal::i2c::I2c` bus together with a device address so
//! it can be handed to a driver as an [`I2cChannel`].

use embedded_hal::i2c::{I2c, Operation};

use crate::i2c::{I2cChannel, Register};

/// I2C channel backed by an `embedded-hal` bus
pub struct HalChannel<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> HalChannel<I2C> {
    /// Bind `i2c` to the device at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Give the underlying bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> I2cChannel for HalChannel<I2C> {
    type Error = I2C::Error;

    fn address(&self) -> u8 {
        self.address
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(self.address, buf)
    }

    fn write_reg_byte(&mut self, reg: Register, value: u8) -> Result<(), Self::Error> {
        let mut frame = [0u8; 3];
        let mut addr = [0u8; 2];
        let reg = reg.encode(&mut addr);
        frame[..reg.len()].copy_from_slice(reg);
        frame[reg.len()] = value;
        self.i2c.write(self.address, &frame[..reg.len() + 1])
    }

    fn write_reg_buffer(&mut self, reg: Register, data: &[u8]) -> Result<(), Self::Error> {
        let mut addr = [0u8; 2];
        let reg = reg.encode(&mut addr);
        // Adjacent writes in one transaction go out without a repeated start
        self.i2c.transaction(
            self.address,
            &mut [Operation::Write(reg), Operation::Write(data)],
        )
    }

    fn read_reg_buffer(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut addr = [0u8; 2];
        let reg = reg.encode(&mut addr);
        self.i2c.write_read(self.address, reg, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = 0x3C;

    #[test]
    fn test_write_reg_byte() {
        let expectations = [Transaction::write(ADDR, vec![0x00, 0xAF])];
        let mut channel = HalChannel::new(I2cMock::new(&expectations), ADDR);

        channel.write_reg_byte(Register::Byte(0), 0xAF).unwrap();

        channel.release().done();
    }

    #[test]
    fn test_write_reg_byte_word_register() {
        let expectations = [Transaction::write(0x50, vec![0x01, 0x20, 0x5A])];
        let mut channel = HalChannel::new(I2cMock::new(&expectations), 0x50);

        channel.write_reg_byte(Register::Word(0x0120), 0x5A).unwrap();

        channel.release().done();
    }

    #[test]
    fn test_write_reg_buffer_is_one_transaction() {
        let expectations = [
            Transaction::transaction_start(0x50),
            Transaction::write(0x50, vec![0x10]),
            Transaction::write(0x50, vec![1, 2, 3]),
            Transaction::transaction_end(0x50),
        ];
        let mut channel = HalChannel::new(I2cMock::new(&expectations), 0x50);

        channel
            .write_reg_buffer(Register::Byte(0x10), &[1, 2, 3])
            .unwrap();

        channel.release().done();
    }

    #[test]
    fn test_read_reg_buffer() {
        let expectations = [Transaction::write_read(
            0x70,
            vec![0xEF, 0xC8],
            vec![0x08, 0x87],
        )];
        let mut channel = HalChannel::new(I2cMock::new(&expectations), 0x70);

        let mut id = [0u8; 2];
        channel
            .read_reg_buffer(Register::Word(0xEFC8), &mut id)
            .unwrap();
        assert_eq!(id, [0x08, 0x87]);

        channel.release().done();
    }

    #[test]
    fn test_plain_write_and_read() {
        let expectations = [
            Transaction::write(0x70, vec![0x7C, 0xA2]),
            Transaction::read(0x70, vec![1, 2, 3]),
        ];
        let mut channel = HalChannel::new(I2cMock::new(&expectations), 0x70);

        channel.write(&[0x7C, 0xA2]).unwrap();
        let mut buf = [0u8; 3];
        channel.read(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(channel.address(), 0x70);

        channel.release().done();
    }
}
