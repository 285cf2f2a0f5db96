/// Settle time after [`Command::Initialize`], in milliseconds.
pub const INIT_DELAY_MS: u32 = 500;
/// Conversion time after [`Command::Trigger`], in milliseconds.
///
/// The busy flag is not polled, the read-back happens after this fixed wait.
pub const MEASUREMENT_DELAY_MS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Commands understood by the AHT10.
pub enum Command {
    /// Load the calibration coefficients. Sent once after power-up.
    Initialize,
    /// Start a humidity and temperature conversion.
    Trigger,
}

impl Command {
    /// The 3-byte frame written to the sensor for this command.
    pub const fn bytes(self) -> [u8; 3] {
        match self {
            Command::Initialize => [0xBE, 0x08, 0x00],
            Command::Trigger => [0xAC, 0x33, 0x00],
        }
    }
}
