use std::fmt;

use chrono::{DateTime, Local};

/// Locale independent, ISO-like wall-clock timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One CSV row of the datalog.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub humidity_percent: f64,
    pub temperature_celsius: f64,
    /// `None` when the distance sensor is disabled.
    pub distance_mm: Option<u16>,
}

impl LogRecord {
    pub fn header(with_distance: bool) -> &'static str {
        if with_distance {
            "timestamp,humidity_percent,temperature_celsius,distance_mm"
        } else {
            "timestamp,humidity_percent,temperature_celsius"
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.2},{:.2}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.humidity_percent,
            self.temperature_celsius
        )?;
        if let Some(distance) = self.distance_mm {
            write!(f, ",{distance}")?;
        }
        Ok(())
    }
}
