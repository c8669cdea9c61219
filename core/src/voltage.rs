//! Supply voltage measurement through a resistor divider

use hal_abstractions::AnalogInput;

use crate::config::DividerConfig;
use crate::fmt::Debug2Format;
use crate::record::fixed;

/// Voltage monitor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageError {
    /// The ADC conversion failed
    Unavailable,
}

impl core::fmt::Display for VoltageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "Supply voltage unavailable"),
        }
    }
}

impl core::error::Error for VoltageError {}

/// Reconstruct the supply voltage from a normalized ADC reading.
///
/// `fraction` is the sample divided by the ADC full scale (0.0 to 1.0).
pub fn divider_voltage(fraction: f32, divider: &DividerConfig) -> f32 {
    fraction * (divider.r1_ohms + divider.r2_ohms) / divider.r2_ohms * divider.vref
}

/// Reads the supply voltage from one ADC channel
pub struct VoltageMonitor<A> {
    adc: A,
    divider: DividerConfig,
}

impl<A: AnalogInput> VoltageMonitor<A> {
    pub fn new(adc: A, divider: DividerConfig) -> Self {
        Self { adc, divider }
    }

    /// Sample the ADC and convert to volts
    pub fn read_voltage(&mut self) -> Result<f32, VoltageError> {
        let raw = self.adc.read_raw().map_err(|e| {
            warn!("ADC read failed: {:?}", Debug2Format(&e));
            VoltageError::Unavailable
        })?;

        let full_scale = self.adc.full_scale();
        if full_scale == 0 {
            warn!("ADC reports zero full scale");
            return Err(VoltageError::Unavailable);
        }

        let fraction = raw as f32 / full_scale as f32;
        let voltage = divider_voltage(fraction, &self.divider);
        info!("Voltage: {=str} V", fixed(voltage, 3).as_str());
        Ok(voltage)
    }
}
