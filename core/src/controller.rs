//! Measurement cycle controller
//!
//! One cycle: read the supply voltage; if it is at or above the threshold,
//! read the sensor and append a record; otherwise re-assert low-power idle
//! and end the cycle. Every failure is logged and ends the cycle early.
//! Nothing is retried.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use hal_abstractions::{AnalogInput, DateTime, LogStore, PowerControl, WallClock};

use crate::config::LoggerConfig;
use crate::fmt::Debug2Format;
use crate::log_writer::{LogWriter, StoreError};
use crate::power::Indicators;
use crate::record::{fixed, LogRecord};
use crate::sensor::{Dht20, SensorError};
use crate::voltage::VoltageMonitor;

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// A record was appended to the log
    Logged(LogRecord),
    /// Supply below threshold; sensing skipped
    LowVoltage(f32),
    /// Supply could not be measured; sensing skipped
    VoltageUnavailable,
    /// Sensor read failed; no record
    SensorFailed(SensorError),
    /// Record could not be stored
    StorageFailed(StoreError),
}

/// Board collaborators of the controller
pub struct Parts<A, I2C, D, S, C, P, SL, BL> {
    pub adc: A,
    pub i2c: I2C,
    pub delay: D,
    pub store: S,
    pub clock: C,
    pub power: P,
    pub sleep_indicator: SL,
    pub busy_indicator: BL,
}

pub struct CycleController<A, I2C, D, S, C, P, SL, BL> {
    config: LoggerConfig,
    monitor: VoltageMonitor<A>,
    sensor: Dht20<I2C, D>,
    writer: LogWriter<S>,
    clock: C,
    power: P,
    indicators: Indicators<SL, BL>,
}

impl<A, I2C, D, S, C, P, SL, BL> CycleController<A, I2C, D, S, C, P, SL, BL>
where
    A: AnalogInput,
    I2C: I2c,
    D: DelayNs,
    S: LogStore,
    C: WallClock,
    P: PowerControl,
    SL: OutputPin,
    BL: OutputPin,
{
    pub fn new(config: LoggerConfig, parts: Parts<A, I2C, D, S, C, P, SL, BL>) -> Self {
        Self {
            monitor: VoltageMonitor::new(parts.adc, config.divider),
            sensor: Dht20::new(parts.i2c, parts.delay, config.sensor),
            writer: LogWriter::new(parts.store, &config.storage),
            clock: parts.clock,
            power: parts.power,
            indicators: Indicators::new(parts.sleep_indicator, parts.busy_indicator),
            config,
        }
    }

    /// Start-up sequence: create the log file, then enable low-power idle.
    ///
    /// A log file that cannot be created is not fatal.
    pub fn start(&mut self) {
        let _ = self.writer.initialize();
        self.power.set_low_power(true);
        info!("Low-power idle enabled");
    }

    /// Run one measurement cycle
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let _work = self.indicators.begin_work();

        let voltage = match self.monitor.read_voltage() {
            Ok(v) => v,
            Err(_) => {
                warn!("Voltage unavailable, going to sleep");
                self.power.set_low_power(true);
                return CycleOutcome::VoltageUnavailable;
            }
        };

        if !self.config.voltage_sufficient(voltage) {
            info!(
                "Voltage below threshold ({=str} V), going to sleep",
                fixed(voltage, 3).as_str()
            );
            self.power.set_low_power(true);
            return CycleOutcome::LowVoltage(voltage);
        }

        let sample = match self.sensor.read().await {
            Ok(sample) => sample,
            Err(e) => return CycleOutcome::SensorFailed(e),
        };

        let now = self.clock.now().unwrap_or_else(|e| {
            warn!("Clock read failed, stamping with epoch: {:?}", Debug2Format(&e));
            DateTime::EPOCH
        });

        match self.writer.log_data(&sample, now) {
            Ok(record) => CycleOutcome::Logged(record),
            Err(e) => CycleOutcome::StorageFailed(e),
        }
    }

    pub fn writer(&self) -> &LogWriter<S> {
        &self.writer
    }
}
