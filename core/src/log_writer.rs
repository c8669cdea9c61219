//! CSV log writer
//!
//! Owns the log store. The header is written once by [`LogWriter::initialize`]
//! (truncating whatever was there); every record after that is appended with
//! its own open/write/close, so nothing is held open between cycles.

use embedded_io::{Error as _, ErrorKind};
use hal_abstractions::{DateTime, LogStore, OpenMode};

use crate::config::StorageConfig;
use crate::fmt::Debug2Format;
use crate::record::{LogRecord, HEADER};
use crate::sensor::SensorSample;

/// Log store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Record did not fit the line buffer
    Format,
    /// Store open or write failed
    Io(ErrorKind),
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Format => write!(f, "Record formatting failed"),
            Self::Io(kind) => write!(f, "Store I/O error: {:?}", kind),
        }
    }
}

impl core::error::Error for StoreError {}

#[cfg(feature = "defmt")]
impl defmt::Format for StoreError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Format => defmt::write!(f, "Format"),
            Self::Io(kind) => defmt::write!(f, "Io({:?})", Debug2Format(kind)),
        }
    }
}

pub struct LogWriter<S> {
    store: S,
    file_name: &'static str,
}

impl<S: LogStore> LogWriter<S> {
    pub fn new(store: S, config: &StorageConfig) -> Self {
        Self {
            store,
            file_name: config.file_name,
        }
    }

    /// Create the log file with its header, discarding previous content.
    ///
    /// Failure is reported and returned, but leaves the writer usable; later
    /// appends will try the store again.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        match self
            .store
            .write_file(self.file_name, OpenMode::Truncate, HEADER.as_bytes())
        {
            Ok(()) => {
                info!("CSV file initialized with headers");
                Ok(())
            }
            Err(e) => {
                let kind = e.kind();
                error!("Error creating CSV file: {:?}", Debug2Format(&kind));
                Err(StoreError::Io(kind))
            }
        }
    }

    /// Append one record stamped with `now`
    pub fn log_data(
        &mut self,
        sample: &SensorSample,
        now: DateTime,
    ) -> Result<LogRecord, StoreError> {
        let record = LogRecord::new(now, sample);
        let timestamp = record.timestamp_string();
        let line = record.to_line().map_err(|_| {
            error!("[{=str}] Record does not fit line buffer", timestamp.as_str());
            StoreError::Format
        })?;

        // Console copy for hosts that capture the log instead of the card
        info!("DATA_LOG:{=str}", line.trim_end());

        match self
            .store
            .write_file(self.file_name, OpenMode::Append, line.as_bytes())
        {
            Ok(()) => {
                info!("[{=str}] Data logged to CSV", timestamp.as_str());
                Ok(record)
            }
            Err(e) => {
                let kind = e.kind();
                error!(
                    "[{=str}] Error logging to CSV: {:?}",
                    timestamp.as_str(),
                    Debug2Format(&kind)
                );
                Err(StoreError::Io(kind))
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryStore;

    fn writer() -> LogWriter<MemoryStore> {
        LogWriter::new(MemoryStore::default(), &StorageConfig::default())
    }

    fn sample() -> SensorSample {
        SensorSample {
            temperature: 22.5,
            humidity: 41.25,
        }
    }

    fn is_record_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 3 {
            return false;
        }
        let ts = fields[0].as_bytes();
        let digits = |range: core::ops::Range<usize>| ts[range].iter().all(u8::is_ascii_digit);
        let timestamp_ok = ts.len() == 19
            && digits(0..4)
            && ts[4] == b'-'
            && digits(5..7)
            && ts[7] == b'-'
            && digits(8..10)
            && ts[10] == b' '
            && digits(11..13)
            && ts[13] == b':'
            && digits(14..16)
            && ts[16] == b':'
            && digits(17..19);
        let number_ok = |field: &str| {
            let unsigned = field.strip_prefix('-').unwrap_or(field);
            match unsigned.split_once('.') {
                Some((int, frac)) => {
                    !int.is_empty()
                        && int.bytes().all(|b| b.is_ascii_digit())
                        && frac.len() == 2
                        && frac.bytes().all(|b| b.is_ascii_digit())
                }
                None => false,
            }
        };
        timestamp_ok && number_ok(fields[1]) && number_ok(fields[2])
    }

    #[test]
    fn test_initialize_writes_header() {
        let mut writer = writer();
        writer.initialize().unwrap();
        assert_eq!(
            writer.store().contents("data.csv"),
            Some("Timestamp,Temperature,Humidity\n")
        );
    }

    #[test]
    fn test_initialize_twice_keeps_one_header() {
        let mut writer = writer();
        writer.initialize().unwrap();
        writer.initialize().unwrap();
        assert_eq!(writer.store().lines("data.csv").len(), 1);
    }

    #[test]
    fn test_initialize_truncates_previous_content() {
        let mut writer = writer();
        writer.initialize().unwrap();
        writer
            .log_data(&sample(), DateTime::new(2025, 1, 1, 0, 0, 0))
            .unwrap();
        writer.initialize().unwrap();
        assert_eq!(
            writer.store().lines("data.csv"),
            vec!["Timestamp,Temperature,Humidity"]
        );
    }

    #[test]
    fn test_append_invariant() {
        let mut writer = writer();
        writer.initialize().unwrap();
        let n = 5;
        for i in 0..n {
            writer
                .log_data(&sample(), DateTime::new(2025, 7, 4, 9, 30, i as u8))
                .unwrap();
        }

        let lines = writer.store().lines("data.csv");
        assert_eq!(lines.len(), 1 + n);
        assert_eq!(lines[0], "Timestamp,Temperature,Humidity");
        for line in &lines[1..] {
            assert!(is_record_line(line), "malformed line: {:?}", line);
        }
        assert_eq!(lines[1], "2025-07-04 09:30:00,22.50,41.25");
        assert!(writer.store().contents("data.csv").unwrap().ends_with('\n'));
    }

    #[test]
    fn test_record_matches_line_pattern_for_negative_values() {
        let mut writer = writer();
        writer.initialize().unwrap();
        let cold = SensorSample {
            temperature: -12.345,
            humidity: 0.004,
        };
        writer.log_data(&cold, DateTime::EPOCH).unwrap();
        let lines = writer.store().lines("data.csv");
        assert_eq!(lines[1], "1970-01-01 00:00:00,-12.35,0.00");
        assert!(is_record_line(&lines[1]));
    }

    #[test]
    fn test_initialize_failure_is_reported() {
        let mut writer = writer();
        writer.store_mut().fail_writes = true;
        assert_eq!(writer.initialize(), Err(StoreError::Io(ErrorKind::Other)));
        assert_eq!(writer.store().contents("data.csv"), None);
    }

    #[test]
    fn test_append_failure_discards_record() {
        let mut writer = writer();
        writer.initialize().unwrap();
        writer.store_mut().fail_writes = true;
        assert!(writer.log_data(&sample(), DateTime::EPOCH).is_err());

        writer.store_mut().fail_writes = false;
        writer.log_data(&sample(), DateTime::EPOCH).unwrap();
        // No retry of the failed record: header plus the one good line
        assert_eq!(writer.store().lines("data.csv").len(), 2);
    }

    #[test]
    fn test_append_without_initialize_creates_file() {
        let mut writer = writer();
        writer.log_data(&sample(), DateTime::EPOCH).unwrap();
        assert_eq!(writer.store().lines("data.csv").len(), 1);
    }
}
