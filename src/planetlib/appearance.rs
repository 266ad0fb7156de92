//! Visual appearance of the planets
//!
//! Magnitudes follow the Astronomical Almanac expressions as given by Meeus,
//! chapter 41. Rotation elements are those of the IAU Working Group on
//! Cartographic Coordinates and Rotational Elements (2009).

use serde::{Deserialize, Serialize};

use super::Planet;
use crate::constants::{DAYS_PER_JULIAN_CENTURY, J2000};
use crate::coordinates::angle::{to180, to360};
use crate::coordinates::{Ecliptical, Equatorial, Heliocentrical};
use crate::{Result, SkyError};

/// Phase angle in degrees: Sun-planet-Earth
///
/// `r` is the heliocentric distance of the planet, `delta` its distance from
/// the Earth and `earth_r` the Earth-Sun distance, all in AU.
pub fn phase_angle(r: f64, delta: f64, earth_r: f64) -> f64 {
    ((r * r + delta * delta - earth_r * earth_r) / (2.0 * r * delta))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

/// Elongation from the Sun in degrees, same distances as [`phase_angle`]
pub fn elongation(r: f64, delta: f64, earth_r: f64) -> f64 {
    ((earth_r * earth_r + delta * delta - r * r) / (2.0 * earth_r * delta))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

/// Illuminated fraction of the disk for a phase angle in degrees
pub fn illuminated_fraction(phase_angle: f64) -> f64 {
    (1.0 + phase_angle.to_radians().cos()) / 2.0
}

/// Apparent visual magnitude
///
/// `rings` only matters for Saturn; without it the rings are taken edge-on.
pub fn magnitude(
    planet: Planet,
    r: f64,
    delta: f64,
    phase_angle: f64,
    rings: Option<&SaturnRings>,
) -> Result<f64> {
    let distance_term = 5.0 * (r * delta).log10();
    let i = phase_angle;

    let m = match planet {
        Planet::Mercury => -0.42 + 0.0380 * i - 0.000273 * i * i + 0.000002 * i * i * i,
        Planet::Venus => -4.40 + 0.0009 * i + 0.000239 * i * i - 0.00000065 * i * i * i,
        Planet::Mars => -1.52 + 0.016 * i,
        Planet::Jupiter => -9.40 + 0.005 * i,
        Planet::Saturn => {
            let (b, delta_u) = rings.map_or((0.0, 0.0), |s| (s.b, s.delta_u));
            let sin_b = b.to_radians().sin();
            -8.88 + 0.044 * delta_u.abs() - 2.60 * sin_b.abs() + 1.25 * sin_b * sin_b
        }
        Planet::Uranus => -7.19,
        Planet::Neptune => -6.87,
        Planet::Pluto => -1.00,
        Planet::Earth => {
            return Err(SkyError::InvalidInput(
                "the Earth has no magnitude as seen from the Earth".to_string(),
            ))
        }
    };

    Ok(m + distance_term)
}

/// Equatorial semidiameter at 1 AU in arcseconds
fn semidiameter_at_unit_distance(planet: Planet) -> Option<f64> {
    match planet {
        Planet::Mercury => Some(3.36),
        Planet::Venus => Some(8.41),
        Planet::Mars => Some(4.68),
        Planet::Jupiter => Some(98.44),
        Planet::Saturn => Some(82.73),
        Planet::Uranus => Some(35.02),
        Planet::Neptune => Some(33.50),
        Planet::Pluto => Some(2.07),
        Planet::Earth => None,
    }
}

/// Apparent equatorial semidiameter in arcseconds at a distance in AU
pub fn semidiameter(planet: Planet, delta: f64) -> Option<f64> {
    semidiameter_at_unit_distance(planet).map(|s| s / delta)
}

/// Orientation of a planet's north pole and prime meridian, degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationElements {
    /// Right ascension of the north pole (J2000)
    pub alpha0: f64,
    /// Declination of the north pole (J2000)
    pub delta0: f64,
    /// Location of the prime meridian
    pub w: f64,
    /// Rotation rate in degrees per day; negative for retrograde rotators
    pub rate: f64,
}

/// IAU rotation elements at a light-time corrected Julian Ephemeris Day
pub fn rotation_elements(planet: Planet, jde: f64) -> Option<RotationElements> {
    let d = jde - J2000;
    let t = d / DAYS_PER_JULIAN_CENTURY;

    let (alpha0, delta0, w0, rate) = match planet {
        Planet::Mercury => (281.0103 - 0.0328 * t, 61.4155 - 0.0049 * t, 329.5988, 6.1385108),
        Planet::Venus => (272.76, 67.16, 160.20, -1.4813688),
        Planet::Mars => (317.68143 - 0.1061 * t, 52.88650 - 0.0609 * t, 176.630, 350.89198226),
        Planet::Jupiter => (
            268.056595 - 0.006499 * t,
            64.495303 + 0.002413 * t,
            284.95,
            870.5360000,
        ),
        Planet::Saturn => (40.589 - 0.036 * t, 83.537 - 0.004 * t, 38.90, 810.7939024),
        Planet::Uranus => (257.311, -15.175, 203.81, -501.1600928),
        Planet::Neptune => {
            let n = (357.85 + 52.316 * t).to_radians();
            let w = 249.978 - 0.48 * n.sin();
            (299.36 + 0.70 * n.sin(), 43.46 - 0.51 * n.cos(), w, 541.1397757)
        }
        Planet::Pluto => (132.993, -6.163, 302.695, 56.3625225),
        Planet::Earth => return None,
    };

    Some(RotationElements {
        alpha0,
        delta0,
        w: to360(w0 + rate * d),
        rate,
    })
}

/// Orientation of the disk as seen from the Earth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalEphemeris {
    /// Planetocentric declination of the Earth, degrees
    pub earth_declination: f64,
    /// Position angle of the north pole, degrees from north through east
    pub position_angle: f64,
    /// Longitude of the central meridian, degrees
    pub central_meridian: f64,
}

/// Physical ephemeris from the rotation elements and the apparent direction
/// of the planet
pub fn physical_ephemeris(rot: &RotationElements, eq: &Equatorial) -> PhysicalEphemeris {
    let (sin_d0, cos_d0) = rot.delta0.to_radians().sin_cos();
    let (sin_d, cos_d) = eq.delta.to_radians().sin_cos();
    let (sin_da, cos_da) = (rot.alpha0 - eq.alpha).to_radians().sin_cos();

    let earth_declination = (-sin_d0 * sin_d - cos_d0 * cos_d * cos_da)
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();
    let position_angle = (cos_d0 * sin_da).atan2(sin_d0 * cos_d - cos_d0 * sin_d * cos_da);
    let k = (sin_d0 * cos_d * cos_da - sin_d * cos_d0)
        .atan2(cos_d * sin_da)
        .to_degrees();

    let central_meridian = if rot.rate >= 0.0 { rot.w - k } else { k - rot.w };

    PhysicalEphemeris {
        earth_declination,
        position_angle: to360(position_angle.to_degrees()),
        central_meridian: to360(central_meridian),
    }
}

/// Apparent geometry of Saturn's ring system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaturnRings {
    /// Saturnicentric latitude of the Earth referred to the ring plane, degrees
    pub b: f64,
    /// Difference of the Saturnicentric longitudes of Sun and Earth, degrees
    pub delta_u: f64,
    /// Major axis of the outer edge of the outer ring, arcseconds
    pub major_axis: f64,
    /// Minor axis of the outer edge of the outer ring, arcseconds
    pub minor_axis: f64,
}

/// Ring geometry from Saturn's heliocentric and geocentric positions
///
/// `helio` is taken at the light-time corrected instant, `geo` is the
/// geometric geocentric position, both referred to the ecliptic of date.
pub fn saturn_rings(jde: f64, helio: &Heliocentrical, geo: &Ecliptical) -> SaturnRings {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let i = (28.075216 - 0.012998 * t + 0.000004 * t * t).to_radians();
    let node = 169.508470 + 1.394681 * t + 0.000412 * t * t;
    let (sin_i, cos_i) = i.sin_cos();

    let ring_longitude = |lambda: f64, beta: f64| -> f64 {
        let (sin_b, cos_b) = beta.to_radians().sin_cos();
        let (sin_l, cos_l) = (lambda - node).to_radians().sin_cos();
        (sin_i * sin_b + cos_i * cos_b * sin_l)
            .atan2(cos_b * cos_l)
            .to_degrees()
    };

    let (sin_beta, cos_beta) = geo.beta.to_radians().sin_cos();
    let b = (sin_i * cos_beta * (geo.lambda - node).to_radians().sin() - cos_i * sin_beta)
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();

    let delta_u = to180(ring_longitude(helio.l, helio.b) - ring_longitude(geo.lambda, geo.beta))
        .abs();
    let major_axis = 375.35 / geo.distance;

    SaturnRings {
        b,
        delta_u,
        major_axis,
        minor_axis: major_axis * b.to_radians().sin().abs(),
    }
}
