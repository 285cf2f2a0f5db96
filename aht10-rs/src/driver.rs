use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

use crate::{
    Error, Reading, SlaveAddress,
    command::{Command, INIT_DELAY_MS, MEASUREMENT_DELAY_MS},
};

/// Represents the AHT10 sensor.
///
/// The driver owns its bus for its whole lifetime; [`Aht10::release`] hands it back.
pub struct Aht10<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
}

#[derive(Debug, Default)]
/// Builder for an AHT10 sensor.
pub struct Aht10Builder {
    pub(crate) address: SlaveAddress,
}

impl Aht10Builder {
    /// Set the address of the AHT10 sensor.
    pub fn with_address(mut self, address: SlaveAddress) -> Self {
        self.address = address;
        self
    }

    /// Build the AHT10 sensor and run the power-up initialization.
    ///
    /// Blocks for [`INIT_DELAY_MS`].
    pub fn build<T: I2c<SevenBitAddress>, D: DelayNs>(
        self,
        i2c: T,
        delay: &mut D,
    ) -> Result<Aht10<T>, Error<T::Error>> {
        let mut dev = Aht10 {
            i2c,
            address: self.address.into_bits(),
        };
        dev.initialize(delay)?;
        Ok(dev)
    }
}

impl<T: I2c<SevenBitAddress>> Aht10<T> {
    /// Get the address of the device.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Send the initialization command and wait for the sensor to settle.
    ///
    /// Must run once after power-up, before the first measurement.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>> {
        self.send(Command::Initialize)?;
        delay.delay_ms(INIT_DELAY_MS);
        Ok(())
    }

    /// Start a conversion and wait [`MEASUREMENT_DELAY_MS`] for it to complete.
    pub fn trigger_measurement<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Error<T::Error>> {
        self.send(Command::Trigger)?;
        delay.delay_ms(MEASUREMENT_DELAY_MS);
        Ok(())
    }

    /// Read the 6-byte status and data block.
    pub fn read_raw(&mut self) -> Result<[u8; 6], Error<T::Error>> {
        let mut buf = [0u8; 6];
        self.i2c.read(self.address, &mut buf)?;
        Ok(buf)
    }

    /// Run one full measurement cycle: trigger, wait, read back and decode.
    pub fn measure<D: DelayNs>(&mut self, delay: &mut D) -> Result<Reading, Error<T::Error>> {
        self.trigger_measurement(delay)?;
        let raw = self.read_raw()?;
        Ok(Reading::from_raw(&raw))
    }

    /// Give the bus back, consuming the driver.
    pub fn release(self) -> T {
        self.i2c
    }

    fn send(&mut self, cmd: Command) -> Result<(), Error<T::Error>> {
        self.i2c.write(self.address, &cmd.bytes())?;
        Ok(())
    }
}
