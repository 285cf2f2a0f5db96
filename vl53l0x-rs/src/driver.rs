use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

use crate::{
    Error,
    register::{
        RESET_DELAY_MS, RESET_SEQUENCE, RESULT_BLOCK_LEN, RESULT_RANGE_STATUS, RangeStatus,
        START_DELAY_MS, SYSRANGE_MODE_BACK_TO_BACK, SYSRANGE_START,
    },
};

/// Factory default I2C address of the VL53L0X.
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// Represents the VL53L0X sensor running in continuous ranging mode.
pub struct Vl53l0x<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
}

#[derive(Debug)]
/// Builder for a VL53L0X sensor.
pub struct Vl53l0xBuilder {
    pub(crate) address: u8,
}

impl Default for Vl53l0xBuilder {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
        }
    }
}

impl Vl53l0xBuilder {
    /// Set the 7-bit address of the VL53L0X sensor.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Build the VL53L0X sensor, reset it and start continuous ranging.
    ///
    /// Blocks for [`RESET_DELAY_MS`] + [`START_DELAY_MS`].
    pub fn build<T: I2c<SevenBitAddress>, D: DelayNs>(
        self,
        i2c: T,
        delay: &mut D,
    ) -> Result<Vl53l0x<T>, Error<T::Error>> {
        let mut dev = Vl53l0x {
            i2c,
            address: self.address,
        };
        dev.initialize(delay)?;
        Ok(dev)
    }
}

impl<T: I2c<SevenBitAddress>> Vl53l0x<T> {
    /// Get the address of the device.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Soft-reset the sensor and enter continuous ranging mode.
    ///
    /// Must run once before the first distance read.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>> {
        for (register, value) in RESET_SEQUENCE {
            self.write_register(register, value)?;
        }
        delay.delay_ms(RESET_DELAY_MS);
        self.write_register(SYSRANGE_START, SYSRANGE_MODE_BACK_TO_BACK)?;
        delay.delay_ms(START_DELAY_MS);
        Ok(())
    }

    /// Read the result block.
    ///
    /// The register pointer is set in its own write transaction, followed by a
    /// separate 12-byte read.
    pub fn read_status(&mut self) -> Result<RangeStatus, Error<T::Error>> {
        self.i2c.write(self.address, &[RESULT_RANGE_STATUS])?;
        let mut raw = [0u8; RESULT_BLOCK_LEN];
        self.i2c.read(self.address, &mut raw)?;
        Ok(RangeStatus { raw })
    }

    /// Read the latest range in millimeters.
    pub fn read_distance(&mut self) -> Result<u16, Error<T::Error>> {
        Ok(self.read_status()?.distance_mm())
    }

    /// Give the bus back, consuming the driver.
    pub fn release(self) -> T {
        self.i2c
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<T::Error>> {
        self.i2c.write(self.address, &[register, value])?;
        Ok(())
    }
}
