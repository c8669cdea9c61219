//! Battery voltage divider tap on ADC1
//!
//! The divider feeds PA4 (Feather A0). Single blocking conversion at the
//! longest sample time, since the divider has a high source impedance.

use core::convert::Infallible;
use embassy_stm32::adc::{Adc, SampleTime};
use embassy_stm32::peripherals::{ADC1, PA4};
use embassy_stm32::Peri;
use hal_abstractions::AnalogInput;

/// 12-bit conversion result range
const FULL_SCALE: u16 = 4095;

pub struct BatteryAdc {
    adc: Adc<'static, ADC1>,
    pin: Peri<'static, PA4>,
}

impl BatteryAdc {
    pub fn new(adc: Peri<'static, ADC1>, pin: Peri<'static, PA4>) -> Self {
        let mut adc = Adc::new(adc);
        adc.set_sample_time(SampleTime::CYCLES480);
        Self { adc, pin }
    }
}

impl AnalogInput for BatteryAdc {
    type Error = Infallible;

    fn read_raw(&mut self) -> Result<u16, Infallible> {
        Ok(self.adc.blocking_read(&mut self.pin))
    }

    fn full_scale(&self) -> u16 {
        FULL_SCALE
    }
}
