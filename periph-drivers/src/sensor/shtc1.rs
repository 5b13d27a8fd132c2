//! Sensirion SHTC1 temperature and humidity sensor
//!
//! A measurement is one command write followed by a 6 byte read:
//!
//! ```text
//! [T_msb, T_lsb, T_crc, RH_msb, RH_lsb, RH_crc]
//! ```
//!
//! In blocking mode the driver waits out the conversion time between the
//! two transfers. Values are reported in fixed point (milli-units).

use embedded_hal::delay::DelayNs;
use periph_hal::{I2cChannel, I2cManager, Register};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed bus address
pub const ADDRESS: u8 = 0x70;

/// Command words, sent MSB first
pub mod cmd {
    pub const MEASURE_HIGH_BLOCKING: [u8; 2] = [0x7C, 0xA2];
    pub const MEASURE_HIGH: [u8; 2] = [0x78, 0x66];
    pub const MEASURE_LOW_BLOCKING: [u8; 2] = [0x64, 0x58];
    pub const MEASURE_LOW: [u8; 2] = [0x60, 0x9C];
    pub const SOFT_RESET: [u8; 2] = [0x80, 0x5D];
    /// ID register, read as a 16-bit register
    pub const READ_ID: u16 = 0xEFC8;
}

/// Bits of the ID register that identify the part
const ID_MASK: u16 = 0x3F;
const ID_SHTC1: u16 = 0x07;

/// Errors that can occur while talking to the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shtc1Error<E> {
    /// Bus transfer failed
    Bus(E),
    /// Checksum mismatch on a measurement word
    Crc,
}

/// Measurement repeatability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    #[default]
    High,
    Low,
}

impl Precision {
    /// Conversion time in milliseconds
    pub const fn delay_ms(self) -> u32 {
        match self {
            Precision::High => 15,
            Precision::Low => 1,
        }
    }

    /// Measurement command for this precision
    pub const fn command(self, blocking: bool) -> [u8; 2] {
        match (self, blocking) {
            (Precision::High, true) => cmd::MEASURE_HIGH_BLOCKING,
            (Precision::High, false) => cmd::MEASURE_HIGH,
            (Precision::Low, true) => cmd::MEASURE_LOW_BLOCKING,
            (Precision::Low, false) => cmd::MEASURE_LOW,
        }
    }
}

/// One temperature and humidity sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Temperature in milli-degrees Celsius
    pub temperature_milli_c: i32,
    /// Relative humidity in milli-percent
    pub humidity_milli_pct: i32,
}

impl Measurement {
    /// Decode a raw 6 byte response, checking both CRCs
    pub fn from_bytes<E>(data: &[u8; 6]) -> Result<Self, Shtc1Error<E>> {
        let temperature = checked_word::<E>(&data[0..3])?;
        let humidity = checked_word::<E>(&data[3..6])?;

        Ok(Self {
            temperature_milli_c: temperature_milli_c(temperature),
            humidity_milli_pct: humidity_milli_pct(humidity),
        })
    }
}

/// CRC-8 used by Sensirion sensors (poly 0x31, init 0xFF)
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0xFFu8;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x31;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

fn checked_word<E>(chunk: &[u8]) -> Result<u16, Shtc1Error<E>> {
    if crc8(&chunk[..2]) != chunk[2] {
        return Err(Shtc1Error::Crc);
    }
    Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
}

/// T = -45 + 175 * raw / 2^16
pub fn temperature_milli_c(raw: u16) -> i32 {
    (-45_000 + ((175_000 * raw as i64) >> 16)) as i32
}

/// RH = 100 * raw / 2^16
pub fn humidity_milli_pct(raw: u16) -> i32 {
    ((100_000 * raw as i64) >> 16) as i32
}

/// Check an ID register value against the SHTC1 signature
pub fn is_shtc1_id(id: u16) -> bool {
    id & ID_MASK == ID_SHTC1
}

/// SHTC1 sensor driver
pub struct Shtc1<CH, D> {
    channel: CH,
    delay: D,
    precision: Precision,
    blocking: bool,
}

impl<CH: I2cChannel, D: DelayNs> Shtc1<CH, D> {
    /// Wrap an already-open channel
    pub fn new(channel: CH, delay: D) -> Self {
        Self {
            channel,
            delay,
            precision: Precision::default(),
            blocking: true,
        }
    }

    /// Open a channel to [`ADDRESS`] on `bus`
    pub fn open<M>(manager: &mut M, bus: &str, delay: D) -> Result<Self, Shtc1Error<CH::Error>>
    where
        M: I2cManager<Channel = CH>,
    {
        let channel = manager.open(bus, ADDRESS).map_err(Shtc1Error::Bus)?;
        debug!("SHTC1 opened on {}", bus);
        Ok(Self::new(channel, delay))
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Wait for the conversion before reading (default) or read right away
    pub fn set_blocking(&mut self, blocking: bool) {
        self.blocking = blocking;
    }

    /// Read the ID register
    pub fn id(&mut self) -> Result<u16, Shtc1Error<CH::Error>> {
        let mut buf = [0u8; 2];
        self.channel
            .read_reg_buffer(Register::Word(cmd::READ_ID), &mut buf)
            .map_err(Shtc1Error::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read the ID register and check it identifies an SHTC1
    pub fn is_correct_id(&mut self) -> Result<bool, Shtc1Error<CH::Error>> {
        Ok(is_shtc1_id(self.id()?))
    }

    /// Run one measurement
    pub fn measure(&mut self) -> Result<Measurement, Shtc1Error<CH::Error>> {
        let command = self.precision.command(self.blocking);
        self.channel.write(&command).map_err(Shtc1Error::Bus)?;

        if self.blocking {
            self.delay.delay_ms(self.precision.delay_ms());
        }

        let mut data = [0u8; 6];
        self.channel.read(&mut data).map_err(Shtc1Error::Bus)?;

        let measurement = Measurement::from_bytes::<CH::Error>(&data)?;
        trace!(
            "SHTC1 {} mC, {} m%RH",
            measurement.temperature_milli_c,
            measurement.humidity_milli_pct
        );
        Ok(measurement)
    }

    /// Temperature in milli-degrees Celsius (one full measurement)
    pub fn read_temperature(&mut self) -> Result<i32, Shtc1Error<CH::Error>> {
        Ok(self.measure()?.temperature_milli_c)
    }

    /// Relative humidity in milli-percent (one full measurement)
    pub fn read_humidity(&mut self) -> Result<i32, Shtc1Error<CH::Error>> {
        Ok(self.measure()?.humidity_milli_pct)
    }

    pub fn reset(&mut self) -> Result<(), Shtc1Error<CH::Error>> {
        debug!("SHTC1 soft reset");
        self.channel
            .write(&cmd::SOFT_RESET)
            .map_err(Shtc1Error::Bus)
    }

    pub fn close(self) -> Result<(), Shtc1Error<CH::Error>> {
        self.channel.close().map_err(Shtc1Error::Bus)
    }
}
