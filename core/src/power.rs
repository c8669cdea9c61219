//! Status indicators for the sleep/work cycle
//!
//! Two outputs: the sleep indicator is lit while the device idles between
//! cycles, the busy indicator while a cycle is running. Pin errors are
//! ignored; the indicators are informational only.

use embedded_hal::digital::OutputPin;

pub struct Indicators<S, B> {
    sleep: S,
    busy: B,
}

impl<S: OutputPin, B: OutputPin> Indicators<S, B> {
    /// Bind both indicators and show the idle state
    pub fn new(sleep: S, busy: B) -> Self {
        let mut indicators = Self { sleep, busy };
        indicators.show_idle();
        indicators
    }

    /// Show the working state until the returned guard is dropped
    pub fn begin_work(&mut self) -> WorkGuard<'_, S, B> {
        let _ = self.sleep.set_low();
        let _ = self.busy.set_high();
        WorkGuard { indicators: self }
    }

    fn show_idle(&mut self) {
        let _ = self.busy.set_low();
        let _ = self.sleep.set_high();
    }
}

/// Restores the idle indication on drop
pub struct WorkGuard<'a, S: OutputPin, B: OutputPin> {
    indicators: &'a mut Indicators<S, B>,
}

impl<S: OutputPin, B: OutputPin> Drop for WorkGuard<'_, S, B> {
    fn drop(&mut self) {
        self.indicators.show_idle();
    }
}
