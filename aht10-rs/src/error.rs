#[derive(Debug)]
/// Represents errors that can occur while interacting with the AHT10 sensor.
pub enum Error<E> {
    /// An error occurred while communicating with the I2C bus.
    I2c(E),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}
