//! Planetary ephemeris calculations module
//!
//! Heliocentric positions come from VSOP87D for the eight major planets and
//! from osculating Keplerian elements for Pluto. Everything is referred to
//! the mean ecliptic and equinox of date.

pub mod appearance;
mod pluto;
pub mod vsop87;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ASEC2DEG, DAY_S, LIGHT_TIME_DAYS_PER_AU};
use crate::coordinates::{Ecliptical, EclipticalDelta, Heliocentrical};
use crate::time::julian_centuries;
use crate::{Result, SkyError};

/// The major planets, the Earth included, and Pluto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    /// Every planet in order of distance from the Sun
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    /// Planets covered by the VSOP87 series
    pub const VSOP87: [Planet; 8] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    /// Get the planet's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    /// Serial number counted from the Sun (Mercury = 1)
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Planet> {
        Planet::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// Mercury and Venus, whose orbits lie inside the Earth's
    pub fn is_inferior(&self) -> bool {
        matches!(self, Planet::Mercury | Planet::Venus)
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = SkyError;

    fn from_str(s: &str) -> Result<Planet> {
        Planet::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| SkyError::ObjectNotFound(s.to_string()))
    }
}

/// Heliocentric position of a planet at a Julian Ephemeris Day
///
/// With `high_precision` unset the VSOP87 series are truncated for speed.
pub fn heliocentric(planet: Planet, jde: f64, high_precision: bool) -> Result<Heliocentrical> {
    match vsop87::heliocentric(planet, jde, high_precision) {
        Some(h) => Ok(h),
        None => pluto::heliocentric(jde),
    }
}

/// Correction from the VSOP87 dynamical frame to FK5
pub fn fk5_correction(ecl: &Ecliptical, jde: f64) -> EclipticalDelta {
    let t = julian_centuries(jde);
    let lambda_prime = (ecl.lambda - 1.397 * t - 0.00031 * t * t).to_radians();
    let (sin_lp, cos_lp) = lambda_prime.sin_cos();
    let tan_b = ecl.beta.to_radians().tan();

    EclipticalDelta {
        lambda: (-0.09033 + 0.03916 * (cos_lp + sin_lp) * tan_b) * ASEC2DEG,
        beta: 0.03916 * (cos_lp - sin_lp) * ASEC2DEG,
    }
}

/// Light travel time in days over a distance in AU
pub fn light_time(distance_au: f64) -> f64 {
    distance_au * LIGHT_TIME_DAYS_PER_AU
}

/// Iteration cap for the light-time loop
pub const MAX_LIGHT_TIME_ITERATIONS: usize = 10;

/// Result of the light-time iteration
#[derive(Debug, Clone, PartialEq)]
pub struct LightTimeSolution<T> {
    /// Value produced by the position closure at the retarded time
    pub value: T,
    /// Distance to the body in AU
    pub distance: f64,
    /// Light time in days
    pub light_time: f64,
}

/// Iterate a position computation until the light time settles
///
/// `position` receives the instant at which the light left the body and
/// returns its value together with the observer distance in AU. Iteration
/// stops once the light time changes by less than one second.
pub fn light_time_iterate<T, F>(jde: f64, mut position: F) -> Result<LightTimeSolution<T>>
where
    F: FnMut(f64) -> Result<(T, f64)>,
{
    let mut tau = 0.0;
    for _ in 0..MAX_LIGHT_TIME_ITERATIONS {
        let (value, distance) = position(jde - tau)?;
        let new_tau = light_time(distance);
        if (new_tau - tau).abs() < 1.0 / DAY_S {
            return Ok(LightTimeSolution {
                value,
                distance,
                light_time: new_tau,
            });
        }
        tau = new_tau;
    }

    Err(SkyError::NoConvergence {
        algorithm: "light-time correction",
        iterations: MAX_LIGHT_TIME_ITERATIONS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_planet_names_roundtrip() {
        for planet in Planet::ALL {
            assert_eq!(planet.name().parse::<Planet>().unwrap(), planet);
            assert_eq!(Planet::from_number(planet.number()), Some(planet));
        }
        assert_eq!(" jupiter ".parse::<Planet>().unwrap(), Planet::Jupiter);
        assert!(matches!("Vulcan".parse::<Planet>(), Err(SkyError::ObjectNotFound(_))));
        assert_eq!(Planet::from_number(0), None);
        assert_eq!(Planet::from_number(10), None);
    }

    #[test]
    fn test_fk5_correction_venus() {
        // Venus on 1992 December 20: ΔL = -0.09027″, ΔB = +0.05535″
        let ecl = Ecliptical::new(313.08102, -2.08474, 0.910845);
        let d = fk5_correction(&ecl, 2448976.5);
        assert_relative_eq!(d.lambda * 3600.0, -0.09027, epsilon = 2e-4);
        assert_relative_eq!(d.beta * 3600.0, 0.05535, epsilon = 2e-4);
    }

    #[test]
    fn test_light_time_converges() {
        // A body receding at constant speed converges to the closed form
        let speed = 0.01; // AU per day
        let solution = light_time_iterate(100.0, |t| Ok((t, 5.0 + speed * t))).unwrap();
        let expected_tau = LIGHT_TIME_DAYS_PER_AU * (5.0 + speed * 100.0)
            / (1.0 + speed * LIGHT_TIME_DAYS_PER_AU);
        assert_relative_eq!(solution.light_time, expected_tau, epsilon = 1.0 / DAY_S);
    }

    #[test]
    fn test_light_time_propagates_errors() {
        let result: Result<LightTimeSolution<()>> =
            light_time_iterate(0.0, |_| Err(SkyError::InvalidInput("bad".into())));
        assert!(result.is_err());
    }

    #[test]
    fn test_pluto_heliocentric() {
        // 1992 October 13.0 TD; reference is J2000 ecliptic, so precess back
        let h = heliocentric(Planet::Pluto, 2448908.5, true).unwrap();
        let e = crate::precessionlib::ecliptical_elements(2448908.5, crate::constants::J2000);
        let j2000 = crate::precessionlib::ecliptical_coordinates(
            &Ecliptical::new(h.l, h.b, h.r),
            &e,
        );
        assert_relative_eq!(j2000.lambda, 232.74071, epsilon = 0.01);
        assert_relative_eq!(j2000.beta, 14.58782, epsilon = 0.01);
        assert_relative_eq!(h.r, 29.711111, epsilon = 0.005);
    }
}
