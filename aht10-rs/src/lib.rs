#![no_std]
#![warn(missing_docs)]
//! # AHT10 - Driver for the Aosong AHT10 Humidity and Temperature Sensor
//! This crate provides a blocking driver for the AHT10 sensor on top of the
//! [`embedded_hal::i2c::I2c`] trait. A measurement is a fixed command sequence
//! followed by a settle delay and a 6-byte read-back, which is decoded into
//! relative humidity and temperature.
mod address;
mod command;
mod driver;
mod error;
mod measurement;

pub use address::SlaveAddress;
pub use command::{Command, INIT_DELAY_MS, MEASUREMENT_DELAY_MS};
pub use driver::{Aht10, Aht10Builder};
pub use error::Error;
pub use measurement::{Humidity, Reading, Status, Temperature, decode};
