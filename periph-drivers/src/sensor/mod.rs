//! Environmental sensors

pub mod shtc1;

pub use shtc1::{Measurement, Precision, Shtc1, Shtc1Error};
