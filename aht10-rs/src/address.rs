use bitfield_struct::bitfield;

#[bitfield(u8)]
/// Represents the slave address for the AHT10 sensor.
/// The default address is 0x38. Pulling the ADDR pin high sets the `a0` bit,
/// moving the sensor to 0x39.
pub struct SlaveAddress {
    /// ADDR pin level.
    #[bits(1, default = false)]
    pub a0: bool,
    #[bits(7, default = 0x38 >> 1)]
    reserved: u8,
}
