//! CSV log record formatting
//!
//! One record per line: `YYYY-MM-DD HH:MM:SS,<temperature>,<humidity>\n`,
//! both readings fixed to two decimals. The year is printed as-is; every
//! other date and time field is zero-padded to two digits.

use core::fmt::{self, Write};

use hal_abstractions::DateTime;
use heapless::String;

use crate::sensor::SensorSample;

/// First line of every log file
pub const HEADER: &str = "Timestamp,Temperature,Humidity\n";

/// Capacity of one rendered record line, newline included
pub const LINE_CAPACITY: usize = 64;

/// Capacity of a rendered timestamp (`YYYYY-MM-DD HH:MM:SS` at most)
pub const TIMESTAMP_CAPACITY: usize = 20;

/// A rendered record line
pub type Line = String<LINE_CAPACITY>;

/// Render `value` with a fixed number of decimals.
///
/// Values too wide for the buffer come back truncated; readings handled by
/// the logger are always a few characters long.
pub fn fixed(value: f32, decimals: usize) -> String<24> {
    let mut out = String::new();
    let _ = write!(out, "{:.*}", decimals, value);
    out
}

/// `Display` adapter for the log timestamp format
#[derive(Debug, Clone, Copy)]
pub struct Timestamp(pub DateTime);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = &self.0;
        write!(
            f,
            "{}-{:02}-{:02} {:02}:{:02}:{:02}",
            dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
        )
    }
}

/// One logged measurement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogRecord {
    pub timestamp: DateTime,
    pub temperature: f32,
    pub humidity: f32,
}

impl LogRecord {
    pub fn new(timestamp: DateTime, sample: &SensorSample) -> Self {
        Self {
            timestamp,
            temperature: sample.temperature,
            humidity: sample.humidity,
        }
    }

    pub fn timestamp_string(&self) -> String<TIMESTAMP_CAPACITY> {
        let mut out = String::new();
        let _ = write!(out, "{}", Timestamp(self.timestamp));
        out
    }

    /// Render the CSV line, trailing newline included
    pub fn to_line(&self) -> Result<Line, fmt::Error> {
        let mut line = Line::new();
        writeln!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.2},{:.2}",
            Timestamp(self.timestamp),
            self.temperature,
            self.humidity
        )
    }
}
