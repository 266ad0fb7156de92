//! Time module for astronomical time calculations
//!
//! Instants are Julian days (`f64`). Calendar conversion uses the proleptic
//! Julian calendar before 1582 October 15 and the Gregorian calendar after.
//! [`delta_t`] relates Universal Time to Terrestrial Time and [`sidereal`]
//! provides Greenwich sidereal time.

pub mod delta_t;
pub mod sidereal;

pub use delta_t::{delta_t, jde};
pub use sidereal::{apparent_sidereal_time, mean_sidereal_time};

use crate::constants::{DAYS_PER_JULIAN_CENTURY, DAYS_PER_JULIAN_MILLENNIUM, GREGORIAN_START, J2000};
use crate::{Result, SkyError};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::fmt;

/// A calendar date with a fractional day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    pub year: i64,
    pub month: u32,
    /// Day of month including the fraction of the day, `[1, 32)`
    pub day: f64,
}

impl CalendarDate {
    pub fn new(year: i64, month: u32, day: f64) -> Self {
        Self { year, month, day }
    }

    /// Julian day of this date
    pub fn julian_day(&self) -> f64 {
        julian_day(self.year, self.month, self.day)
    }

    /// Hour, minute and second of the fractional day
    pub fn time_of_day(&self) -> (u32, u32, f64) {
        let seconds = self.day.fract() * 86_400.0;
        let hour = (seconds / 3600.0).floor();
        let minute = ((seconds - hour * 3600.0) / 60.0).floor();
        (hour as u32, minute as u32, seconds - hour * 3600.0 - minute * 60.0)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour, minute, second) = self.time_of_day();
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year,
            self.month,
            self.day.floor() as u32,
            hour,
            minute,
            second.floor() as u32
        )
    }
}

/// Julian day number of a calendar date at noon
///
/// This follows the algorithm in the Explanatory Supplement to the
/// Astronomical Almanac 15.11. Months outside `1..=12` roll into the
/// neighbouring years.
pub fn julian_day_number(year: i64, month: i64, day: i64) -> i64 {
    let year = year + (month - 1).div_euclid(12);
    let month = (month - 1).rem_euclid(12) + 1;

    let janfeb = month <= 2;
    let g = year + 4716 - if janfeb { 1 } else { 0 };
    let f = (month + 9) % 12;
    let e = (1461 * g).div_euclid(4) + day - 1402;
    let mut j = e + (153 * f + 2) / 5;

    if j >= GREGORIAN_START {
        j += 38 - (g + 184).div_euclid(100) * 3 / 4;
    }
    j
}

/// Julian day of a calendar date with a fractional day
///
/// # Examples
///
/// ```rust
/// use stargazer::time::julian_day;
///
/// // Launch of Sputnik 1
/// assert!((julian_day(1957, 10, 4.81) - 2436116.31).abs() < 1e-9);
/// ```
pub fn julian_day(year: i64, month: u32, day: f64) -> f64 {
    let whole = day.floor();
    julian_day_number(year, month as i64, whole as i64) as f64 - 0.5 + (day - whole)
}

/// Calendar date of a Julian day
pub fn calendar_date(jd: f64) -> CalendarDate {
    let shifted = jd + 0.5;
    let number = shifted.floor() as i64;
    let fraction = shifted - number as f64;

    let mut f = number + 1401;
    if number >= GREGORIAN_START {
        f += (4 * number + 274_277).div_euclid(146_097) * 3 / 4 - 38;
    }

    let e = 4 * f + 3;
    let g = e.rem_euclid(1461) / 4;
    let h = 5 * g + 2;

    let day = (h % 153) / 5 + 1;
    let month = ((h / 153) + 2) % 12 + 1;
    let year = e.div_euclid(1461) - 4716 + (12 + 2 - month) / 12;

    CalendarDate::new(year, month as u32, day as f64 + fraction)
}

/// Julian day of a UTC timestamp
pub fn from_datetime(dt: &DateTime<Utc>) -> f64 {
    let seconds = dt.hour() as f64 * 3600.0
        + dt.minute() as f64 * 60.0
        + dt.second() as f64
        + dt.nanosecond() as f64 / 1_000_000_000.0;
    julian_day(dt.year() as i64, dt.month(), dt.day() as f64 + seconds / 86_400.0)
}

/// UTC timestamp of a Julian day
///
/// Fails for instants outside the range chrono can represent.
pub fn to_datetime(jd: f64) -> Result<DateTime<Utc>> {
    let date = calendar_date(jd);
    let (hour, minute, second) = date.time_of_day();
    let whole_second = second.floor();
    let nano = ((second - whole_second) * 1_000_000_000.0) as u32;

    let year = i32::try_from(date.year)
        .map_err(|_| SkyError::InvalidInput(format!("year {} out of range", date.year)))?;
    let naive = chrono::NaiveDate::from_ymd_opt(year, date.month, date.day.floor() as u32)
        .and_then(|d| d.and_hms_nano_opt(hour, minute, whole_second as u32, nano))
        .ok_or_else(|| SkyError::InvalidInput(format!("no calendar instant for JD {}", jd)))?;

    Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Julian centuries since J2000.0
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_JULIAN_CENTURY
}

/// Julian millennia since J2000.0
pub fn julian_millennia(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_JULIAN_MILLENNIUM
}

/// Julian day of the local midnight that starts the civil day containing `jd`
///
/// `utc_offset` is in hours, positive east of Greenwich.
pub fn local_midnight(jd: f64, utc_offset: f64) -> f64 {
    let offset = utc_offset / 24.0;
    (jd + offset - 0.5).floor() + 0.5 - offset
}

/// Year with fraction, e.g. 2000.5 for mid-2000
pub fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000) / 365.25
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(2000, 1, 1.5, 2451545.0)]
    #[case(1987, 6, 19.5, 2446966.0)]
    #[case(1600, 12, 31.0, 2305812.5)]
    #[case(837, 4, 10.3, 2026871.8)]
    #[case(333, 1, 27.5, 1842713.0)]
    #[case(-1000, 7, 12.5, 1356001.0)]
    #[case(-4712, 1, 1.5, 0.0)]
    fn test_julian_day(#[case] year: i64, #[case] month: u32, #[case] day: f64, #[case] jd: f64) {
        assert_relative_eq!(julian_day(year, month, day), jd, epsilon = 1e-9);
        let date = calendar_date(jd);
        assert_eq!(date.year, year);
        assert_eq!(date.month, month);
        assert_relative_eq!(date.day, day, epsilon = 1e-6);
    }

    #[test]
    fn test_gregorian_reform_gap() {
        // 1582 October 4 (Julian) is followed by October 15 (Gregorian)
        let last_julian = julian_day(1582, 10, 4.5);
        let first_gregorian = julian_day(1582, 10, 15.5);
        assert_relative_eq!(first_gregorian - last_julian, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_month_overflow_rolls_year() {
        assert_relative_eq!(julian_day(1999, 13, 1.5), 2451545.0, epsilon = 1e-9);
    }

    #[test]
    fn test_datetime_roundtrip() {
        let dt = Utc.with_ymd_and_hms(1992, 10, 13, 6, 30, 0).unwrap();
        let jd = from_datetime(&dt);
        assert_relative_eq!(jd, 2448908.5 + 6.5 / 24.0, epsilon = 1e-9);
        let back = to_datetime(jd).unwrap();
        assert!((back - dt).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn test_local_midnight() {
        // 1988 March 20, 15h UT in Boston (UTC-5) belongs to the civil day starting 05h UT
        let jd = julian_day(1988, 3, 20.0 + 15.0 / 24.0);
        let midnight = local_midnight(jd, -5.0);
        assert_relative_eq!(midnight, julian_day(1988, 3, 20.0 + 5.0 / 24.0), epsilon = 1e-9);
        // 03h UT is still the previous local day
        let early = julian_day(1988, 3, 20.0 + 3.0 / 24.0);
        assert_relative_eq!(local_midnight(early, -5.0), midnight - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_display() {
        let date = calendar_date(2436116.31);
        assert_eq!(date.to_string(), "1957-10-04 19:26:24");
    }
}
