//! The observer on the Earth: geographic location, parallax and refraction

use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_FLATTENING, EARTH_RADIUS_KM};
use crate::coordinates::Equatorial;
use crate::{Result, SkyError};

/// Horizontal parallax of a body at 1 AU, in degrees (8.794″)
pub const SOLAR_PARALLAX: f64 = 8.794 / 3600.0;

/// Geographic position of an observer
///
/// Longitude is measured positive **west** of Greenwich, matching the hour
/// angle formula `H = θ0 − L − α`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Longitude in degrees, positive west
    pub longitude: f64,
    /// Geographic latitude in degrees, positive north
    pub latitude: f64,
    /// Height above sea level in meters
    #[serde(default)]
    pub elevation: f64,
    /// Offset of local civil time from UTC in hours, positive east
    #[serde(default)]
    pub utc_offset: f64,
}

impl GeoLocation {
    /// Location at sea level with UTC as local time
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: 0.0,
            utc_offset: 0.0,
        }
    }

    /// Build from an east-positive longitude, the common map convention
    pub fn from_east_longitude(longitude_east: f64, latitude: f64) -> Self {
        Self::new(-longitude_east, latitude)
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_utc_offset(mut self, hours: f64) -> Self {
        self.utc_offset = hours;
        self
    }

    /// Check that the coordinates are within their ranges
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SkyError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SkyError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !(-14.0..=14.0).contains(&self.utc_offset) {
            return Err(SkyError::InvalidInput(format!(
                "UTC offset {} h outside [-14, 14]",
                self.utc_offset
            )));
        }
        Ok(())
    }

    /// `ρ sin φ'` and `ρ cos φ'`: geocentric position of the observer in Earth radii
    pub fn geocentric_terms(&self) -> (f64, f64) {
        let b_over_a = 1.0 - EARTH_FLATTENING;
        let phi = self.latitude.to_radians();
        let u = (b_over_a * phi.tan()).atan();
        let h = self.elevation / (EARTH_RADIUS_KM * 1000.0);
        (
            b_over_a * u.sin() + h * phi.sin(),
            u.cos() + h * phi.cos(),
        )
    }
}

/// Equatorial horizontal parallax in degrees for a distance in AU
pub fn horizontal_parallax(distance_au: f64) -> f64 {
    (SOLAR_PARALLAX.to_radians().sin() / distance_au)
        .asin()
        .to_degrees()
}

/// Topocentric equatorial coordinates
///
/// # Arguments
///
/// * `eq` - Geocentric equatorial coordinates
/// * `location` - Observer position
/// * `theta0` - Apparent sidereal time at Greenwich in degrees
/// * `parallax` - Equatorial horizontal parallax of the body in degrees
pub fn topocentric(
    eq: &Equatorial,
    location: &GeoLocation,
    theta0: f64,
    parallax: f64,
) -> Equatorial {
    let (rho_sin, rho_cos) = location.geocentric_terms();
    let sin_pi = parallax.to_radians().sin();
    let h = eq.hour_angle(location, theta0).to_radians();
    let (sin_d, cos_d) = eq.delta.to_radians().sin_cos();

    let denominator = cos_d - rho_cos * sin_pi * h.cos();
    let delta_alpha = (-rho_cos * sin_pi * h.sin()).atan2(denominator);
    let delta = ((sin_d - rho_sin * sin_pi) * delta_alpha.cos()).atan2(denominator);

    Equatorial::new(eq.alpha + delta_alpha.to_degrees(), delta.to_degrees())
}

/// Atmospheric refraction in degrees for a true (airless) altitude
///
/// Saemundsson's formula for standard pressure and temperature; zero below
/// -2° where it has no meaning.
pub fn refraction(true_altitude: f64) -> f64 {
    if true_altitude < -2.0 {
        return 0.0;
    }
    let h = true_altitude;
    let arcmin = 1.02 / (h + 10.3 / (h + 5.11)).to_radians().tan() + 0.0019279;
    (arcmin / 60.0).max(0.0)
}

/// Apparent altitude of a body at a true altitude
pub fn apparent_altitude(true_altitude: f64) -> f64 {
    true_altitude + refraction(true_altitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn palomar() -> GeoLocation {
        GeoLocation::new(116.8625, 33.0 + 21.0 / 60.0 + 22.0 / 3600.0).with_elevation(1706.0)
    }

    #[test]
    fn test_geocentric_terms_palomar() {
        let (rho_sin, rho_cos) = palomar().geocentric_terms();
        assert_relative_eq!(rho_sin, 0.546861, epsilon = 1e-6);
        assert_relative_eq!(rho_cos, 0.836339, epsilon = 1e-6);
    }

    #[test]
    fn test_topocentric_mars() {
        // Mars from Palomar on 2003 August 28, 3h17m UT
        let eq = Equatorial::new(339.530208, -15.771083);
        let parallax = horizontal_parallax(0.37276);
        let topo = topocentric(&eq, &palomar(), 25.1875, parallax);
        assert_relative_eq!(topo.alpha, 339.535583, epsilon = 2e-5);
        assert_relative_eq!(topo.delta, -15.775000, epsilon = 2e-5);
    }

    #[test]
    fn test_refraction() {
        // Half a degree at the horizon, vanishing at the zenith
        assert_relative_eq!(refraction(0.0) * 60.0, 28.9, epsilon = 0.2);
        assert!(refraction(90.0).abs() < 1e-6);
        assert_eq!(refraction(-5.0), 0.0);
        assert!(apparent_altitude(10.0) > 10.0);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(GeoLocation::new(71.0833, 42.3333).validate().is_ok());
        assert!(GeoLocation::new(0.0, 91.0).validate().is_err());
        assert!(GeoLocation::new(200.0, 0.0).validate().is_err());
        assert_eq!(GeoLocation::from_east_longitude(30.0, 0.0).longitude, -30.0);
    }
}
