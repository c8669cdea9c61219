//! Wall-clock time from the internal RTC
//!
//! The RTC runs from the 32.768 kHz LSE and keeps counting between resets
//! as long as the backup domain has power. It stamps CSV records, FAT
//! directory entries and defmt log lines.
//!
//! The firmware only reads the RTC; it never sets it. Set the calendar once
//! with an external tool (e.g. a debugger writing the RTC registers, or a
//! separate setter firmware) and keep VBAT powered from a coin cell so the
//! backup domain survives power loss. On a fresh backup domain the RTC
//! starts at its reset date and every record carries that date.
//!
//! ## defmt Timestamps
//!
//! Log lines carry RTC time as Unix epoch seconds, shown with the
//! `:iso8601s` display hint, e.g. `1767571200` → `2026-01-05T01:00:00Z`.
//! Until the RTC is initialized (or if it cannot be read) the timestamp
//! shows the epoch.
//!
//! See: <https://defmt.ferrous-systems.com/timestamps>

mod rtc;

use embassy_stm32::rtc::{Rtc, RtcConfig};
use embassy_stm32::{peripherals, Peri};

use rtc::{initialize_rtc, read_datetime};

pub use rtc::RtcClock;

/// Bring up the internal RTC on the LSE and publish it globally
pub fn init_time_system(rtc_peripheral: Peri<'static, peripherals::RTC>) {
    let rtc = Rtc::new(rtc_peripheral, RtcConfig::default());
    defmt::info!("Internal RTC clocked by LSE (32.768kHz, ±20-50ppm accuracy)");

    initialize_rtc(rtc);
}

defmt::timestamp!("{=u64:iso8601s}", {
    read_datetime().map(|dt| dt.to_unix_secs()).unwrap_or(0)
});
