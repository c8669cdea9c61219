//! Internal RTC wrapper
//!
//! The RTC lives in a `critical_section::Mutex` so the cycle task, the SD
//! card driver's time source and the defmt timestamp can all read it.

use core::cell::RefCell;
use critical_section::Mutex;
use defmt::{info, Format};
use embassy_stm32::rtc::Rtc;
use hal_abstractions::{DateTime, WallClock};

/// Global internal RTC instance
static RTC: Mutex<RefCell<Option<Rtc>>> = Mutex::new(RefCell::new(None));

/// RTC operation errors
#[derive(Debug, Clone, Copy, Format)]
pub enum RtcError {
    /// RTC not initialized
    NotInitialized,
    /// RTC hardware error
    HardwareError,
}

impl core::fmt::Display for RtcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "RTC not initialized"),
            Self::HardwareError => write!(f, "RTC hardware error"),
        }
    }
}

impl core::error::Error for RtcError {}

/// Initialize internal RTC
///
/// Must be called once during system initialization before any time operations.
pub fn initialize_rtc(rtc: Rtc) {
    critical_section::with(|cs| {
        RTC.borrow(cs).replace(Some(rtc));
    });
    info!("Internal RTC initialized");
}

/// Read the calendar time from the internal RTC
///
/// Does not log; it backs the defmt timestamp.
pub fn read_datetime() -> Result<DateTime, RtcError> {
    critical_section::with(|cs| {
        let mut rtc = RTC.borrow(cs).borrow_mut();
        let rtc = rtc.as_mut().ok_or(RtcError::NotInitialized)?;
        let now = rtc.now().map_err(|_| RtcError::HardwareError)?;
        Ok(DateTime::new(
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
        ))
    })
}

/// Handle to the global RTC
#[derive(Debug, Clone, Copy, Default)]
pub struct RtcClock;

impl WallClock for RtcClock {
    type Error = RtcError;

    fn now(&mut self) -> Result<DateTime, RtcError> {
        read_datetime()
    }
}

/// FAT directory entry timestamps
impl embedded_sdmmc::TimeSource for RtcClock {
    fn get_timestamp(&self) -> embedded_sdmmc::Timestamp {
        let now = read_datetime().unwrap_or(DateTime::EPOCH);
        // FAT dates start at 1980
        let year = now.year.max(1980);
        embedded_sdmmc::Timestamp::from_calendar(
            year,
            now.month,
            now.day,
            now.hour,
            now.minute,
            now.second,
        )
        .unwrap_or(embedded_sdmmc::Timestamp {
            year_since_1970: 10,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        })
    }
}
