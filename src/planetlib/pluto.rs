//! Pluto from slowly varying Keplerian elements
//!
//! Mean elements are the JPL approximate set for 1800-2050, referred to the
//! J2000 ecliptic and equinox. The result is precessed to the equinox of date
//! so it can be combined with the VSOP87D planets.

use crate::constants::{DAYS_PER_JULIAN_CENTURY, J2000};
use crate::coordinates::{Ecliptical, Heliocentrical};
use crate::orbitlib::OrbitalElements;
use crate::precessionlib;
use crate::Result;

/// (value at J2000, rate per Julian century)
const SEMI_MAJOR_AXIS: (f64, f64) = (39.482_116_75, -0.000_315_96);
const ECCENTRICITY: (f64, f64) = (0.248_827_30, 0.000_051_70);
const INCLINATION: (f64, f64) = (17.140_012_06, 0.000_048_18);
const MEAN_LONGITUDE: (f64, f64) = (238.929_038_33, 145.207_805_15);
const PERIHELION_LONGITUDE: (f64, f64) = (224.068_916_29, -0.040_629_42);
const ASCENDING_NODE: (f64, f64) = (110.303_936_84, -0.011_834_82);

fn element((value, rate): (f64, f64), t: f64) -> f64 {
    value + rate * t
}

/// Osculating elements of Pluto at a Julian Ephemeris Day
pub(super) fn elements(jde: f64) -> OrbitalElements {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let varpi = element(PERIHELION_LONGITUDE, t);
    let node = element(ASCENDING_NODE, t);

    OrbitalElements::from_mean_anomaly(
        element(SEMI_MAJOR_AXIS, t),
        element(ECCENTRICITY, t),
        element(INCLINATION, t),
        node,
        varpi - node,
        jde,
        element(MEAN_LONGITUDE, t) - varpi,
    )
}

/// Heliocentric ecliptical coordinates of Pluto, mean equinox of date
pub(super) fn heliocentric(jde: f64) -> Result<Heliocentrical> {
    let rect = elements(jde).heliocentric_rectangular(jde)?;
    let (l, b, r) = rect.to_spherical();

    let precession = precessionlib::ecliptical_elements(J2000, jde);
    let of_date = precessionlib::ecliptical_coordinates(&Ecliptical::new(l, b, r), &precession);
    Ok(Heliocentrical::new(of_date.lambda, of_date.beta, r))
}
