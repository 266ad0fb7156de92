//! Geocentric position of the Moon
//!
//! The principal terms of ELP-2000/82 as abridged by Meeus (chapter 47):
//! about 10″ in longitude and 4″ in latitude. Longitudes are referred to the
//! mean equinox of date; add nutation for apparent values.

mod series;

use serde::{Deserialize, Serialize};

use crate::constants::{AU_KM, EARTH_RADIUS_KM};
use crate::coordinates::angle::to360;
use crate::coordinates::Ecliptical;
use crate::time::julian_centuries;

/// Mean distance of the Moon in km, before periodic terms
const MEAN_DISTANCE_KM: f64 = 385_000.56;

/// Lunar semidiameter constant: arcseconds times km
const SEMIDIAMETER_KM_ARCSEC: f64 = 358_473_400.0;

/// Fundamental arguments of the lunar theory, degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarArguments {
    /// Mean longitude of the Moon L'
    pub mean_longitude: f64,
    /// Mean elongation D
    pub elongation: f64,
    /// Mean anomaly of the Sun M
    pub sun_anomaly: f64,
    /// Mean anomaly of the Moon M'
    pub moon_anomaly: f64,
    /// Argument of latitude F
    pub latitude_argument: f64,
    /// Eccentricity factor E for terms involving M
    pub eccentricity_factor: f64,
}

/// Fundamental arguments at a Julian Ephemeris Day
pub fn arguments(jde: f64) -> LunarArguments {
    let t = julian_centuries(jde);
    let (t2, t3, t4) = (t * t, t * t * t, t * t * t * t);

    LunarArguments {
        mean_longitude: to360(
            218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538841.0
                - t4 / 65194000.0,
        ),
        elongation: to360(
            297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545868.0
                - t4 / 113065000.0,
        ),
        sun_anomaly: to360(357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24490000.0),
        moon_anomaly: to360(
            134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69699.0
                - t4 / 14712000.0,
        ),
        latitude_argument: to360(
            93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3526000.0
                + t4 / 863310000.0,
        ),
        eccentricity_factor: 1.0 - 0.002516 * t - 0.0000074 * t2,
    }
}

/// Geocentric position of the Moon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarPosition {
    /// Ecliptical longitude, mean equinox of date
    pub lambda: f64,
    /// Ecliptical latitude
    pub beta: f64,
    /// Distance between the centers of Earth and Moon in km
    pub distance: f64,
}

impl LunarPosition {
    /// Equatorial horizontal parallax in degrees
    pub fn parallax(&self) -> f64 {
        (EARTH_RADIUS_KM / self.distance).asin().to_degrees()
    }

    /// Geocentric semidiameter in arcseconds
    pub fn semidiameter(&self) -> f64 {
        SEMIDIAMETER_KM_ARCSEC / self.distance
    }

    /// Same position with the distance expressed in AU
    pub fn to_ecliptical(&self) -> Ecliptical {
        Ecliptical::new(self.lambda, self.beta, self.distance / AU_KM)
    }
}

fn eccentricity_scale(multiple_of_m: f64, e: f64) -> f64 {
    match multiple_of_m.abs() as u8 {
        0 => 1.0,
        1 => e,
        _ => e * e,
    }
}

/// Geocentric ecliptical position of the Moon at a Julian Ephemeris Day
pub fn geocentric(jde: f64) -> LunarPosition {
    let t = julian_centuries(jde);
    let args = arguments(jde);
    let e = args.eccentricity_factor;
    let d = args.elongation.to_radians();
    let m = args.sun_anomaly.to_radians();
    let mp = args.moon_anomaly.to_radians();
    let f = args.latitude_argument.to_radians();
    let lp = args.mean_longitude.to_radians();

    let (mut sum_l, mut sum_r) = (0.0, 0.0);
    for row in series::LONGITUDE_DISTANCE.iter() {
        let arg = row[0] * d + row[1] * m + row[2] * mp + row[3] * f;
        let scale = eccentricity_scale(row[1], e);
        let (sin_arg, cos_arg) = arg.sin_cos();
        sum_l += row[4] * scale * sin_arg;
        sum_r += row[5] * scale * cos_arg;
    }

    let mut sum_b = 0.0;
    for row in series::LATITUDE.iter() {
        let arg = row[0] * d + row[1] * m + row[2] * mp + row[3] * f;
        sum_b += row[4] * eccentricity_scale(row[1], e) * arg.sin();
    }

    // Action of Venus, Jupiter and the flattening of the Earth
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479264.290 * t).to_radians();
    let a3 = (313.45 + 481266.484 * t).to_radians();

    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    LunarPosition {
        lambda: to360(args.mean_longitude + sum_l * 1e-6),
        beta: sum_b * 1e-6,
        distance: MEAN_DISTANCE_KM + sum_r * 1e-3,
    }
}

/// Geocentric phase angle of the Moon in degrees
///
/// `elongation` is the Moon's geocentric elongation from the Sun in degrees,
/// `moon_distance` in km and `sun_distance` in AU.
pub fn phase_angle(elongation: f64, moon_distance: f64, sun_distance: f64) -> f64 {
    let psi = elongation.to_radians();
    let sun_km = sun_distance * AU_KM;
    (sun_km * psi.sin())
        .atan2(moon_distance - sun_km * psi.cos())
        .to_degrees()
}

/// Visual magnitude of the Moon at a phase angle in degrees
pub fn magnitude(phase_angle: f64) -> f64 {
    let i = phase_angle.abs();
    -12.73 + 0.026 * i + 4e-9 * i.powi(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moon_position_1992_april_12() {
        let moon = geocentric(2448724.5);
        assert_relative_eq!(moon.lambda, 133.162655, epsilon = 1e-5);
        assert_relative_eq!(moon.beta, -3.229126, epsilon = 1e-5);
        assert_relative_eq!(moon.distance, 368409.7, epsilon = 0.1);
        assert_relative_eq!(moon.parallax(), 0.991990, epsilon = 1e-6);
    }

    #[test]
    fn test_fundamental_arguments() {
        let a = arguments(2448724.5);
        assert_relative_eq!(a.mean_longitude, 134.290182, epsilon = 1e-5);
        assert_relative_eq!(a.elongation, 113.842304, epsilon = 1e-5);
        assert_relative_eq!(a.sun_anomaly, 97.643514, epsilon = 1e-5);
        assert_relative_eq!(a.moon_anomaly, 5.150833, epsilon = 1e-5);
        assert_relative_eq!(a.latitude_argument, 219.889721, epsilon = 1e-5);
        assert_relative_eq!(a.eccentricity_factor, 1.000194, epsilon = 1e-6);
    }

    #[test]
    fn test_semidiameter_range() {
        // Perigee and apogee bound the apparent size
        let perigee = LunarPosition { lambda: 0.0, beta: 0.0, distance: 356_500.0 };
        let apogee = LunarPosition { lambda: 0.0, beta: 0.0, distance: 406_700.0 };
        assert_relative_eq!(perigee.semidiameter() / 60.0, 16.76, epsilon = 0.01);
        assert_relative_eq!(apogee.semidiameter() / 60.0, 14.69, epsilon = 0.01);
    }

    #[test]
    fn test_phase_angle_and_magnitude() {
        // Full moon: elongation 180°, phase angle near 0
        assert_relative_eq!(phase_angle(180.0, 384_400.0, 1.0), 0.0, epsilon = 1e-9);
        // New moon: elongation 0°, phase angle 180°
        assert_relative_eq!(phase_angle(0.0, 384_400.0, 1.0), 180.0, epsilon = 1e-9);
        assert_relative_eq!(magnitude(0.0), -12.73, epsilon = 1e-12);
        assert!(magnitude(90.0) > magnitude(30.0));
    }
}
