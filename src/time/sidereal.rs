//! Greenwich sidereal time

use crate::constants::J2000;
use crate::coordinates::angle::to360;
use crate::nutationlib::NutationElements;

/// Mean sidereal time at Greenwich in degrees for a Julian day in UT (IAU 1982)
pub fn mean_sidereal_time(jd_ut: f64) -> f64 {
    let t = super::julian_centuries(jd_ut);
    to360(
        280.460_618_37 + 360.985_647_366_29 * (jd_ut - J2000) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Apparent sidereal time at Greenwich in degrees
///
/// Adds the equation of the equinoxes `Δψ cos ε` to the mean sidereal time.
/// `epsilon` is the true obliquity in degrees.
pub fn apparent_sidereal_time(jd_ut: f64, nutation: &NutationElements, epsilon: f64) -> f64 {
    to360(mean_sidereal_time(jd_ut) + nutation.delta_psi * epsilon.to_radians().cos())
}
