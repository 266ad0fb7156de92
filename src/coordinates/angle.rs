//! # Angle Utilities Module
//!
//! Angles travel through this crate as plain `f64` degrees. This module holds
//! the helpers that keep those values in canonical ranges and the sexagesimal
//! types used when presenting them.
//!
//! ## Normalization
//!
//! - [`to360`] maps any angle into `[0, 360)`
//! - [`to180`] maps any angle into `(-180, 180]`
//! - [`align_angles`] removes 360° jumps from a sequence so it can be
//!   interpolated
//!
//! ## Sexagesimal Formatting
//!
//! [`Hms`] and [`Dms`] split a decimal value into whole units, minutes and
//! seconds. The sign lives in a separate flag so that values such as
//! `-0°30′` survive the split.
//!
//! ## Examples
//!
//! ```rust
//! use stargazer::coordinates::angle::{to360, to180, Dms, Hms};
//!
//! assert_eq!(to360(-90.0), 270.0);
//! assert_eq!(to180(270.0), -90.0);
//!
//! let ra = Hms::from_degrees(41.5);
//! assert_eq!(ra.hours, 2);
//! assert_eq!(ra.minutes, 46);
//!
//! let dec = Dms::from_degrees(-0.5);
//! assert!(dec.negative);
//! assert_eq!(dec.degrees, 0);
//! assert_eq!(dec.minutes, 30);
//! ```

use std::fmt;

/// Normalize an angle to the range `[0, 360)` degrees
pub fn to360(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Normalize an angle to the range `(-180, 180]` degrees
pub fn to180(angle: f64) -> f64 {
    let a = to360(angle);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Normalize an hour value to the range `[0, 24)`
pub fn to24(hours: f64) -> f64 {
    let h = hours.rem_euclid(24.0);
    if h >= 24.0 {
        0.0
    } else {
        h
    }
}

/// Remove 360° discontinuities from a sequence of angles
///
/// Each element after the first is shifted by a whole number of turns so
/// that it lies within 180° of its predecessor. The result is suitable for
/// polynomial interpolation even when the sequence crosses 0°/360°.
///
/// # Examples
///
/// ```rust
/// use stargazer::coordinates::angle::align_angles;
///
/// let mut ra = [359.0, 0.5, 2.0];
/// align_angles(&mut ra);
/// assert_eq!(ra, [359.0, 360.5, 362.0]);
/// ```
pub fn align_angles(values: &mut [f64]) {
    for i in 1..values.len() {
        let prev = values[i - 1];
        values[i] = prev + to180(values[i] - prev);
    }
}

/// Hours, minutes and seconds of time (used for right ascension and clock times)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hms {
    /// Set when the value is negative
    pub negative: bool,
    /// Whole hours
    pub hours: u32,
    /// Whole minutes, `0..60`
    pub minutes: u32,
    /// Seconds, `[0, 60)`
    pub seconds: f64,
}

impl Hms {
    /// Split a decimal hour value
    pub fn from_hours(hours: f64) -> Self {
        let negative = hours < 0.0;
        let total_seconds = hours.abs() * 3600.0;
        let whole_hours = (total_seconds / 3600.0).floor();
        let rest = total_seconds - whole_hours * 3600.0;
        let minutes = (rest / 60.0).floor();
        Self {
            negative,
            hours: whole_hours as u32,
            minutes: minutes as u32,
            seconds: rest - minutes * 60.0,
        }
    }

    /// Split an angle in degrees, expressed as hours (15° per hour)
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_hours(degrees / 15.0)
    }

    /// Decimal hours
    pub fn to_hours(&self) -> f64 {
        let h = self.hours as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -h
        } else {
            h
        }
    }

    /// Decimal degrees
    pub fn to_degrees(&self) -> f64 {
        self.to_hours() * 15.0
    }
}

/// Round seconds to tenths and carry into the larger units
fn carry_tenths(major: u32, minutes: u32, seconds: f64) -> (u32, u32, u32) {
    let mut tenths = (seconds * 10.0).round() as u32;
    let mut minutes = minutes;
    let mut major = major;
    if tenths >= 600 {
        tenths -= 600;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        major += 1;
    }
    (major, minutes, tenths)
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, tenths) = carry_tenths(self.hours, self.minutes, self.seconds);
        let sign = if self.negative { "-" } else { "" };
        write!(
            f,
            "{}{:02}h {:02}m {:02}.{}s",
            sign,
            hours,
            minutes,
            tenths / 10,
            tenths % 10
        )
    }
}

/// Degrees, arcminutes and arcseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    /// Set when the value is negative
    pub negative: bool,
    /// Whole degrees
    pub degrees: u32,
    /// Whole arcminutes, `0..60`
    pub minutes: u32,
    /// Arcseconds, `[0, 60)`
    pub seconds: f64,
}

impl Dms {
    /// Split a decimal degree value
    pub fn from_degrees(degrees: f64) -> Self {
        let h = Hms::from_hours(degrees);
        Self {
            negative: h.negative,
            degrees: h.hours,
            minutes: h.minutes,
            seconds: h.seconds,
        }
    }

    /// Decimal degrees
    pub fn to_degrees(&self) -> f64 {
        let d = self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -d
        } else {
            d
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (degrees, minutes, tenths) = carry_tenths(self.degrees, self.minutes, self.seconds);
        let sign = if self.negative { '-' } else { '+' };
        write!(
            f,
            "{}{:02}° {:02}′ {:02}.{}″",
            sign,
            degrees,
            minutes,
            tenths / 10,
            tenths % 10
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_normalization_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let a: f64 = rng.gen_range(-5000.0..5000.0);
            let n360 = to360(a);
            let n180 = to180(a);
            assert!((0.0..360.0).contains(&n360));
            assert!(n180 > -180.0 && n180 <= 180.0);
            // Same direction on the circle
            assert_relative_eq!(n360.to_radians().sin(), n180.to_radians().sin(), epsilon = 1e-9);
            assert_relative_eq!(n360.to_radians().cos(), n180.to_radians().cos(), epsilon = 1e-9);
        }
        assert_eq!(to360(-1e-20), 0.0);
        assert_eq!(to180(180.0), 180.0);
        assert_eq!(to180(-180.0), 180.0);
        assert_eq!(to24(-1.0), 23.0);
    }

    #[test]
    fn test_align_angles_descending_wrap() {
        let mut ra = [1.0, 359.0, 357.5];
        align_angles(&mut ra);
        assert_eq!(ra, [1.0, -1.0, -2.5]);
    }

    #[test]
    fn test_hms_split_and_display() {
        // 2h46m11.331s, right ascension of theta Persei
        let hms = Hms::from_degrees(41.547214);
        assert_eq!(hms.hours, 2);
        assert_eq!(hms.minutes, 46);
        assert_relative_eq!(hms.seconds, 11.331, epsilon = 1e-3);
        assert_eq!(hms.to_string(), "02h 46m 11.3s");
        assert_relative_eq!(hms.to_degrees(), 41.547214, epsilon = 1e-12);
    }

    #[test]
    fn test_display_carries_rounding() {
        let dms = Dms::from_degrees(10.0 - 1e-7);
        assert_eq!(dms.to_string(), "+10° 00′ 00.0″");
        let neg = Dms::from_degrees(-18.888011);
        assert!(neg.negative);
        assert_eq!(neg.to_string(), "-18° 53′ 16.8″");
    }
}
