use bitfield_struct::bitfield;

/// Full scale of the 20-bit humidity and temperature words.
const FULL_SCALE: f64 = (1u32 << 20) as f64;

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
/// Status byte, the first byte of every read-back.
pub struct Status {
    #[bits(3)]
    __: u8,
    /// Calibration coefficients are loaded.
    #[bits(1)]
    pub calibrated: bool,
    #[bits(3)]
    __: u8,
    /// A conversion is still running; the data bytes are stale.
    #[bits(1)]
    pub busy: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Represents a humidity measurement from the AHT10 sensor.
pub struct Humidity {
    pub(crate) value: u32,
}

impl Humidity {
    /// The raw 20-bit humidity word.
    pub fn raw(&self) -> u32 {
        self.value
    }

    /// Converts the raw humidity value to percentage (0-100).
    pub fn percentage(&self) -> f64 {
        self.value as f64 * 100.0 / FULL_SCALE
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Represents a temperature measurement from the AHT10 sensor.
pub struct Temperature {
    pub(crate) value: u32,
}

impl Temperature {
    /// The raw 20-bit temperature word.
    pub fn raw(&self) -> u32 {
        self.value
    }

    /// Converts the raw temperature value to Celsius (-50 to 150).
    pub fn celsius(&self) -> f64 {
        self.value as f64 * 200.0 / FULL_SCALE - 50.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A decoded read-back: status byte plus humidity and temperature.
pub struct Reading {
    /// Status flags reported alongside the data.
    pub status: Status,
    /// Relative humidity.
    pub humidity: Humidity,
    /// Temperature.
    pub temperature: Temperature,
}

impl Reading {
    /// Decodes a 6-byte read-back.
    pub fn from_raw(raw: &[u8; 6]) -> Self {
        let (humidity, temperature) = decode(raw);
        Reading {
            status: Status::from_bits(raw[0]),
            humidity,
            temperature,
        }
    }
}

/// Unpacks the two 20-bit words of a read-back.
///
/// Byte 0 is the status byte and is ignored here. Humidity occupies bytes 1, 2
/// and the high nibble of byte 3; temperature the low nibble of byte 3 and
/// bytes 4, 5.
pub fn decode(raw: &[u8; 6]) -> (Humidity, Temperature) {
    let humidity = (raw[1] as u32) << 12 | (raw[2] as u32) << 4 | (raw[3] as u32) >> 4;
    let temperature = ((raw[3] & 0x0F) as u32) << 16 | (raw[4] as u32) << 8 | raw[5] as u32;
    (
        Humidity { value: humidity },
        Temperature { value: temperature },
    )
}
