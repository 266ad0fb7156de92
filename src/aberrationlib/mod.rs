//! Annual aberration
//!
//! Classical first-order treatment in the FK5 system: the effect of the
//! Earth's orbital velocity, including the elliptic-orbit terms through the
//! eccentricity and longitude of perihelion of the Earth's orbit.

use crate::constants::{ASEC2DEG, DAYS_PER_JULIAN_CENTURY, J2000};
use crate::coordinates::{Ecliptical, EclipticalDelta, Equatorial, EquatorialDelta};

/// Constant of aberration κ in degrees
pub const ABERRATION_CONSTANT: f64 = 20.495_52 * ASEC2DEG;

/// Quantities of the Earth's orbit that enter the aberration formulas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AberrationElements {
    /// Eccentricity of the Earth's orbit
    pub e: f64,
    /// Longitude of the perihelion of the Earth's orbit, degrees
    pub pi: f64,
    /// True geometric longitude of the Sun, degrees
    pub sun_longitude: f64,
}

/// Aberration elements for a Julian Ephemeris Day
///
/// The Sun's longitude comes from the low-precision solar theory, which is
/// ample for a 20″ effect.
pub fn aberration_elements(jde: f64) -> AberrationElements {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let t2 = t * t;

    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t2;
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t2).to_radians();
    let c = (1.914602 - 0.004817 * t - 0.000014 * t2) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();

    AberrationElements {
        e: 0.016708634 - 0.000042037 * t - 0.0000001267 * t2,
        pi: 102.93735 + 1.71946 * t + 0.00046 * t2,
        sun_longitude: l0 + c,
    }
}

/// Effect of aberration on equatorial coordinates of date
///
/// `epsilon` is the obliquity of the ecliptic in degrees.
pub fn equatorial_effect(
    eq: &Equatorial,
    ae: &AberrationElements,
    epsilon: f64,
) -> EquatorialDelta {
    let k = ABERRATION_CONSTANT;
    let (sin_a, cos_a) = eq.alpha.to_radians().sin_cos();
    let (sin_d, cos_d) = eq.delta.to_radians().sin_cos();
    let (sin_e, cos_e) = epsilon.to_radians().sin_cos();
    let tan_e = sin_e / cos_e;
    let (sin_sun, cos_sun) = ae.sun_longitude.to_radians().sin_cos();
    let (sin_pi, cos_pi) = ae.pi.to_radians().sin_cos();

    let alpha = (-k * (cos_a * cos_sun * cos_e + sin_a * sin_sun)
        + ae.e * k * (cos_a * cos_pi * cos_e + sin_a * sin_pi))
        / cos_d;
    let delta = -k * (cos_sun * cos_e * (tan_e * cos_d - sin_a * sin_d) + cos_a * sin_d * sin_sun)
        + ae.e * k * (cos_pi * cos_e * (tan_e * cos_d - sin_a * sin_d) + cos_a * sin_d * sin_pi);

    EquatorialDelta { alpha, delta }
}

/// Effect of aberration on ecliptical coordinates
pub fn ecliptical_effect(ecl: &Ecliptical, ae: &AberrationElements) -> EclipticalDelta {
    let k = ABERRATION_CONSTANT;
    let sun_minus_l = (ae.sun_longitude - ecl.lambda).to_radians();
    let pi_minus_l = (ae.pi - ecl.lambda).to_radians();
    let (sin_b, cos_b) = ecl.beta.to_radians().sin_cos();

    EclipticalDelta {
        lambda: (-k * sun_minus_l.cos() + ae.e * k * pi_minus_l.cos()) / cos_b,
        beta: -k * sin_b * (sun_minus_l.sin() - ae.e * pi_minus_l.sin()),
    }
}

/// Aberration correction to the Sun's longitude in degrees, for a radius vector in AU
pub fn solar_effect(distance: f64) -> f64 {
    -20.4898 * ASEC2DEG / distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equatorial_effect_theta_persei() {
        // 2028 November 13.19 TD: Δα = +30.045″, Δδ = +6.697″
        let eq = Equatorial::new(41.547214, 49.348483);
        let ae = aberration_elements(2462088.69);
        let epsilon = 23.436;
        let d = equatorial_effect(&eq, &ae, epsilon);
        assert_relative_eq!(d.alpha * 3600.0, 30.045, epsilon = 0.02);
        assert_relative_eq!(d.delta * 3600.0, 6.697, epsilon = 0.02);
    }

    #[test]
    fn test_ecliptical_effect_bounded_by_constant() {
        let ae = aberration_elements(J2000);
        for k in 0..36 {
            let ecl = Ecliptical::new(k as f64 * 10.0, 0.0, 1.0);
            let d = ecliptical_effect(&ecl, &ae);
            assert!(d.lambda.abs() <= ABERRATION_CONSTANT * 1.02);
            assert_eq!(d.beta, 0.0);
        }
    }

    #[test]
    fn test_solar_effect() {
        assert_relative_eq!(solar_effect(0.99760775) * 3600.0, -20.539, epsilon = 1e-3);
    }
}
