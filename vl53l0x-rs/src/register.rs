pub(crate) const SYSRANGE_START: u8 = 0x00;
pub(crate) const RESULT_RANGE_STATUS: u8 = 0x14;
pub(crate) const POWER_MANAGEMENT: u8 = 0x80;
pub(crate) const PAD_SCL_SDA_EXTSUP_HV: u8 = 0x88;
pub(crate) const PAGE_SELECT: u8 = 0xFF;

pub(crate) const SYSRANGE_MODE_BACK_TO_BACK: u8 = 0x02;

pub(crate) const RESULT_BLOCK_LEN: usize = 12;

/// Register writes of the soft-reset sequence, in order.
pub(crate) const RESET_SEQUENCE: [(u8, u8); 4] = [
    (PAD_SCL_SDA_EXTSUP_HV, 0x00),
    (POWER_MANAGEMENT, 0x01),
    (PAGE_SELECT, 0x01),
    (SYSRANGE_START, 0x00),
];

/// Wait after the soft-reset sequence, in milliseconds.
pub const RESET_DELAY_MS: u32 = 500;
/// Wait after entering continuous ranging mode, in milliseconds.
pub const START_DELAY_MS: u32 = 10;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// The 12-byte block starting at `RESULT_RANGE_STATUS`.
pub struct RangeStatus {
    pub(crate) raw: [u8; RESULT_BLOCK_LEN],
}

impl RangeStatus {
    /// Wraps a raw result block.
    pub fn from_raw(raw: [u8; RESULT_BLOCK_LEN]) -> Self {
        RangeStatus { raw }
    }

    /// The raw block. Offsets 0 to 9 carry status and signal data that this
    /// crate leaves uninterpreted.
    pub fn raw(&self) -> &[u8; RESULT_BLOCK_LEN] {
        &self.raw
    }

    /// Final range in millimeters, big-endian at offsets 10 and 11.
    pub fn distance_mm(&self) -> u16 {
        u16::from_be_bytes([self.raw[10], self.raw[11]])
    }
}
