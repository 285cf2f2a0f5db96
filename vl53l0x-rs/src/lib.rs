#![no_std]
#![deny(missing_docs)]
//! # VL53L0X - Continuous ranging client for the ST VL53L0X Time-of-Flight Sensor
//! The sensor is soft-reset, put in back-to-back (continuous) ranging mode, and
//! the final range in millimeters is read from the result status block.
//!
//! The ranging status and error codes in the result block are not interpreted.
mod driver;
mod error;
mod register;

pub use driver::{DEFAULT_ADDRESS, Vl53l0x, Vl53l0xBuilder};
pub use error::Error;
pub use register::{RESET_DELAY_MS, RangeStatus, START_DELAY_MS};
