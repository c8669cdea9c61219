//! Logger configuration structures
//!
//! Everything here is fixed at build time. The board builds one
//! [`LoggerConfig`] in `init` and each component copies the part it needs
//! when it is constructed.

/// Supply voltage divider feeding the ADC
///
/// ```text
/// VBAT ──[ R1 ]──┬──[ R2 ]── GND
///                └── ADC
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DividerConfig {
    /// High-side resistor in ohms
    pub r1_ohms: f32,
    /// Low-side resistor in ohms
    pub r2_ohms: f32,
    /// ADC reference voltage (full-scale reading)
    pub vref: f32,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            r1_ohms: 10_000.0,
            r2_ohms: 3_300.0,
            vref: 3.3,
        }
    }
}

/// DHT20 temperature/humidity sensor configuration
#[derive(Debug, Clone, Copy)]
pub struct SensorConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Measurement trigger command
    pub trigger_command: [u8; 3],
    /// Conversion time between trigger and read, in milliseconds
    pub settle_delay_ms: u32,
    /// Reject frames whose trailing CRC-8 does not match
    pub verify_crc: bool,
    /// Reject frames read while the status byte still reports a conversion
    pub reject_busy: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: 0x38,
            trigger_command: [0xAC, 0x33, 0x00],
            settle_delay_ms: 100,
            verify_crc: false,
            reject_busy: false,
        }
    }
}

/// Cycle timing, in milliseconds since start-up
#[derive(Debug, Clone, Copy)]
pub struct ScheduleConfig {
    /// One-off check shortly after boot
    pub initial_delay_ms: u64,
    /// Period of the regular cycle
    pub interval_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1_000,
            interval_ms: 10_000,
        }
    }
}

/// Persistent log location
#[derive(Debug, Clone, Copy)]
pub struct StorageConfig {
    /// File in the root directory of the store
    pub file_name: &'static str,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_name: "data.csv",
        }
    }
}

/// Complete logger configuration
#[derive(Debug, Clone, Copy)]
pub struct LoggerConfig {
    /// Minimum supply voltage (inclusive) required to take a measurement
    pub voltage_threshold: f32,
    pub divider: DividerConfig,
    pub sensor: SensorConfig,
    pub schedule: ScheduleConfig,
    pub storage: StorageConfig,
}

impl LoggerConfig {
    /// Whether `volts` is enough to run the sensor and write the log
    pub fn voltage_sufficient(&self, volts: f32) -> bool {
        volts >= self.voltage_threshold
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            voltage_threshold: 3.0,
            divider: DividerConfig::default(),
            sensor: SensorConfig::default(),
            schedule: ScheduleConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let config = LoggerConfig::default();
        assert!(config.voltage_sufficient(3.0));
        assert!(config.voltage_sufficient(3.5));
        assert!(!config.voltage_sufficient(2.999));
        assert!(!config.voltage_sufficient(0.0));
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.sensor.address, 0x38);
        assert_eq!(config.sensor.trigger_command, [0xAC, 0x33, 0x00]);
        assert_eq!(config.sensor.settle_delay_ms, 100);
        assert!(!config.sensor.verify_crc);
        assert!(!config.sensor.reject_busy);
        assert_eq!(config.schedule.initial_delay_ms, 1_000);
        assert_eq!(config.schedule.interval_ms, 10_000);
        assert_eq!(config.storage.file_name, "data.csv");
    }
}
