//! DHT20 temperature/humidity sensor driver
//!
//! The DHT20 (an AHT20 in a DHT housing) is triggered with a 3-byte command,
//! needs about 80 ms to convert, and then returns a 7-byte frame:
//!
//! ```text
//! byte 0      status (bit 7 = busy)
//! byte 1..3   humidity, 20 bits, MSB first
//! byte 3..5   temperature, 20 bits (low nibble of byte 3 first)
//! byte 6      CRC-8 over bytes 0..6
//! ```
//!
//! The settle delay is awaited through `embedded-hal-async`, so the calling
//! task is suspended instead of spinning while the sensor converts.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::SensorConfig;
use crate::fmt::Debug2Format;
use crate::record::fixed;

/// Length of a measurement frame
pub const RESPONSE_LEN: usize = 7;

/// Status bit set while a conversion is still running
const STATUS_BUSY: u8 = 0x80;

/// 2^20, full scale of both raw readings
const RAW_FULL_SCALE: f32 = 1_048_576.0;

/// One decoded measurement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSample {
    /// Degrees Celsius
    pub temperature: f32,
    /// Percent relative humidity
    pub humidity: f32,
}

/// Sensor read errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// I2C write or read failed
    Bus,
    /// Sensor still converting when the frame was read
    Busy,
    /// Frame CRC does not match
    Crc,
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::Busy => write!(f, "Sensor busy"),
            Self::Crc => write!(f, "CRC mismatch"),
        }
    }
}

impl core::error::Error for SensorError {}

/// CRC-8, polynomial 0x31 (x^8 + x^5 + x^4 + 1), initial value 0xFF
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// 20-bit raw humidity from a measurement frame
pub fn raw_humidity(frame: &[u8; RESPONSE_LEN]) -> u32 {
    ((frame[1] as u32) << 12) | ((frame[2] as u32) << 4) | ((frame[3] as u32) >> 4)
}

/// 20-bit raw temperature from a measurement frame
pub fn raw_temperature(frame: &[u8; RESPONSE_LEN]) -> u32 {
    (((frame[3] & 0x0F) as u32) << 16) | ((frame[4] as u32) << 8) | (frame[5] as u32)
}

/// Decode a measurement frame into calibrated values.
///
/// The status and CRC bytes are only checked when `config` asks for it.
pub fn decode(
    frame: &[u8; RESPONSE_LEN],
    config: &SensorConfig,
) -> Result<SensorSample, SensorError> {
    if config.reject_busy && frame[0] & STATUS_BUSY != 0 {
        return Err(SensorError::Busy);
    }
    if config.verify_crc && crc8(&frame[..RESPONSE_LEN - 1]) != frame[RESPONSE_LEN - 1] {
        return Err(SensorError::Crc);
    }

    let humidity = raw_humidity(frame) as f32 / RAW_FULL_SCALE * 100.0;
    let temperature = raw_temperature(frame) as f32 / RAW_FULL_SCALE * 200.0 - 50.0;

    Ok(SensorSample {
        temperature,
        humidity,
    })
}

/// DHT20 on an async I2C bus
pub struct Dht20<I2C, D> {
    i2c: I2C,
    delay: D,
    config: SensorConfig,
}

impl<I2C: I2c, D: DelayNs> Dht20<I2C, D> {
    pub fn new(i2c: I2C, delay: D, config: SensorConfig) -> Self {
        Self { i2c, delay, config }
    }

    /// Trigger a measurement, wait for the conversion, and decode the result.
    pub async fn read(&mut self) -> Result<SensorSample, SensorError> {
        let address = self.config.address;

        self.i2c
            .write(address, &self.config.trigger_command)
            .await
            .map_err(|e| {
                error!("DHT20 trigger failed: {:?}", Debug2Format(&e));
                SensorError::Bus
            })?;

        self.delay.delay_ms(self.config.settle_delay_ms).await;

        let mut frame = [0u8; RESPONSE_LEN];
        self.i2c.read(address, &mut frame).await.map_err(|e| {
            error!("DHT20 read failed: {:?}", Debug2Format(&e));
            SensorError::Bus
        })?;

        let sample = decode(&frame, &self.config).inspect_err(|e| {
            warn!("DHT20 frame rejected: {:?}", e);
        })?;

        info!(
            "Temperature: {=str} degC, Humidity: {=str} %RH",
            fixed(sample.temperature, 2).as_str(),
            fixed(sample.humidity, 2).as_str()
        );
        Ok(sample)
    }
}
