//! Wall-clock time source

/// Calendar date and time as kept by a hardware RTC.
///
/// No timezone; whatever the RTC was set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub year: u16,
    /// 1 = January
    pub month: u8,
    /// 1-31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// 1970-01-01 00:00:00, used when no clock reading is available
    pub const EPOCH: Self = Self {
        year: 1970,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Seconds since 1970-01-01 00:00:00, treating the fields as UTC.
    ///
    /// Dates before the epoch clamp to 0.
    pub fn to_unix_secs(&self) -> u64 {
        const SECONDS_PER_DAY: i64 = 86_400;

        let days = days_from_civil(self.year as i32, self.month as i32, self.day as i32);
        let secs = days * SECONDS_PER_DAY
            + self.hour as i64 * 3600
            + self.minute as i64 * 60
            + self.second as i64;
        secs.max(0) as u64
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
///
/// Howard Hinnant's `days_from_civil`, O(1), valid for every year.
/// Reference: http://howardhinnant.github.io/date_algorithms.html
fn days_from_civil(year: i32, month: i32, day: i32) -> i64 {
    // Shift so the year starts in March and the leap day is last
    let (y, m) = if month <= 2 {
        (year - 1, month + 9)
    } else {
        (year, month - 3)
    };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64; // [0, 399]
    let doy = (153 * m as i64 + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]

    era as i64 * 146_097 + doe - 719_468 // 719468 = days from 0000-03-01 to 1970-01-01
}

/// Source of the current wall-clock time
pub trait WallClock {
    type Error: core::fmt::Debug;

    fn now(&mut self) -> Result<DateTime, Self::Error>;
}
