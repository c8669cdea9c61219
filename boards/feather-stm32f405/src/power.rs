//! Low-power idle control
//!
//! The logger asks for low power through [`LowPowerIdle`]; the RTIC idle
//! task reads the flag and sleeps with WFI between interrupts while it is
//! set. Wake-ups come from the TIM2 monotonic, the TIM3 embassy-time driver
//! and the I2C/DMA interrupts, so the cycle task keeps running on time.

use core::sync::atomic::{AtomicBool, Ordering};
use defmt::debug;
use hal_abstractions::PowerControl;

/// Low-power idle requested
static LOW_POWER: AtomicBool = AtomicBool::new(false);

/// Handle to the global low-power flag
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPowerIdle;

impl PowerControl for LowPowerIdle {
    fn set_low_power(&mut self, enabled: bool) {
        let was = LOW_POWER.swap(enabled, Ordering::AcqRel);
        if was != enabled {
            debug!("Low-power idle: {}", enabled);
        }
    }
}

/// One pass of the idle loop
pub fn idle_step() {
    if LOW_POWER.load(Ordering::Acquire) {
        cortex_m::asm::wfi();
    } else {
        cortex_m::asm::nop();
    }
}
