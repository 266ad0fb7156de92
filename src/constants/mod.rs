//! Constants module for astronomical calculations
//!
//! All angular quantities in this crate are expressed in degrees unless a
//! name says otherwise.

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in kilometers (IAU 2012 Resolution B2)
pub const AU_KM: f64 = 149_597_870.700;
/// Earth's equatorial radius in kilometers, as used by the lunar theory
pub const EARTH_RADIUS_KM: f64 = 6_378.14;
/// Flattening of the Earth ellipsoid
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// B1950 epoch as Julian date
pub const B1950: f64 = 2_433_282.423_5;
/// Days per Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;
/// Days per Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
/// Days per Julian millennium (time argument of VSOP87)
pub const DAYS_PER_JULIAN_MILLENNIUM: f64 = 365_250.0;
/// Mean length of the synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

// Angles
/// Arcseconds to degrees conversion factor
pub const ASEC2DEG: f64 = 1.0 / 3_600.0;
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Obliquity of the ecliptic at J2000.0 (IAU 1976), degrees
pub const OBLIQUITY_J2000: f64 = 23.439_291_1;

// Physics
/// Speed of light in AU/day
pub const C_AUDAY: f64 = 173.144_632_684_669_3;
/// Light time for one astronomical unit, in days
pub const LIGHT_TIME_DAYS_PER_AU: f64 = 1.0 / C_AUDAY;
/// Gaussian gravitational constant (radians per day)
pub const GAUSS_K: f64 = 0.017_202_098_95;

// Calendar constants
/// First day of Gregorian calendar in Julian day number (1582-10-15)
pub const GREGORIAN_START: i64 = 2_299_161;
