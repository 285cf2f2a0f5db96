use std::{fmt, io, path::PathBuf};

use embedded_hal::i2c::ErrorKind;

#[derive(Debug)]
pub enum Error {
    /// The bus device node could not be opened.
    Open { path: PathBuf, reason: String },
    /// A bus transaction with a sensor failed.
    Bus { sensor: &'static str, kind: ErrorKind },
    /// The datalog could not be created, opened or written.
    File(io::Error),
    /// The record could not be echoed to the output stream.
    Output(io::Error),
    /// The interrupt handler could not be installed.
    Signal(ctrlc::Error),
}

impl Error {
    pub fn aht10<E: embedded_hal::i2c::Error>(e: aht10::Error<E>) -> Self {
        match e {
            aht10::Error::I2c(e) => Error::Bus {
                sensor: "AHT10",
                kind: e.kind(),
            },
        }
    }

    pub fn vl53l0x<E: embedded_hal::i2c::Error>(e: vl53l0x::Error<E>) -> Self {
        match e {
            vl53l0x::Error::I2c(e) => Error::Bus {
                sensor: "VL53L0X",
                kind: e.kind(),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open { path, reason } => {
                write!(f, "failed to open bus {}: {reason}", path.display())
            }
            Error::Bus { sensor, kind } => write!(f, "{sensor} bus transaction failed: {kind}"),
            Error::File(e) => write!(f, "datalog error: {e}"),
            Error::Output(e) => write!(f, "output error: {e}"),
            Error::Signal(e) => write!(f, "failed to set interrupt handler: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::File(e) | Error::Output(e) => Some(e),
            Error::Signal(e) => Some(e),
            _ => None,
        }
    }
}
