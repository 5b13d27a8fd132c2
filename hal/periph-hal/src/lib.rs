//! Periph Hardware Abstraction Layer
//!
//! This crate defines the bus abstraction that the Periph drivers are
//! written against. A driver never talks to a chip-specific I2C peripheral
//! directly; it owns an already-open [`I2cChannel`] bound to one device
//! address and issues register-style reads and writes through it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  periph-drivers (SSD1306, AT24C, SHTC1) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  periph-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  HalChannel   │       │ board-specific│
//! │ (embedded-hal)│       │  I2cManager   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cChannel`] - An open, addressed register channel
//! - [`i2c::I2cManager`] - Opens channels by bus name and address
//! - [`gpio::OutputPin`] - Digital output (hardware address select lines)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod hal;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use hal::HalChannel;
pub use i2c::{I2cChannel, I2cManager, Register, COMMAND_REGISTER};
