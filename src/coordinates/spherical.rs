//! Spherical coordinate types
//!
//! Every type stores its angles in degrees. Longitude-like components
//! (right ascension, ecliptical longitude, azimuth, galactic longitude) are
//! kept in `[0, 360)` by the constructors; latitude-like components are left
//! as given.

use serde::{Deserialize, Serialize};
use std::ops::Add;

use super::angle::to360;
use super::cartesian::Cartesian3;

/// Equatorial coordinates: right ascension α and declination δ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equatorial {
    /// Right ascension in degrees `[0, 360)`
    pub alpha: f64,
    /// Declination in degrees `[-90, 90]`
    pub delta: f64,
}

/// Corrections to equatorial coordinates, in degrees
///
/// Produced by the nutation and aberration effects; added to a mean
/// position with `+`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EquatorialDelta {
    /// Correction in right ascension
    pub alpha: f64,
    /// Correction in declination
    pub delta: f64,
}

impl Equatorial {
    /// Create equatorial coordinates, normalizing right ascension
    pub fn new(alpha: f64, delta: f64) -> Self {
        Self {
            alpha: to360(alpha),
            delta,
        }
    }

    /// Unit vector pointing at this position
    pub fn to_unit_vector(&self) -> Cartesian3 {
        Cartesian3::from_spherical(self.alpha, self.delta, 1.0)
    }

    /// Angular separation to another position in degrees
    ///
    /// Uses the vector form `atan2(|a × b|, a · b)`, which stays accurate for
    /// both very small and nearly antipodal separations.
    ///
    /// ```rust
    /// use stargazer::coordinates::Equatorial;
    ///
    /// let arcturus = Equatorial::new(213.9154, 19.1825);
    /// let spica = Equatorial::new(201.2983, -11.1614);
    /// let d = arcturus.angular_separation(&spica);
    /// assert!((d - 32.7930).abs() < 1e-3);
    /// ```
    pub fn angular_separation(&self, other: &Equatorial) -> f64 {
        self.to_unit_vector().angle_to(&other.to_unit_vector())
    }
}

impl Add<EquatorialDelta> for Equatorial {
    type Output = Equatorial;

    fn add(self, rhs: EquatorialDelta) -> Equatorial {
        Equatorial::new(self.alpha + rhs.alpha, self.delta + rhs.delta)
    }
}

impl Add for EquatorialDelta {
    type Output = EquatorialDelta;

    fn add(self, rhs: EquatorialDelta) -> EquatorialDelta {
        EquatorialDelta {
            alpha: self.alpha + rhs.alpha,
            delta: self.delta + rhs.delta,
        }
    }
}

/// Ecliptical coordinates: longitude λ, latitude β and distance
///
/// The unit of `distance` depends on the producer: astronomical units for
/// the Sun and planets, kilometers for the Moon, zero when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ecliptical {
    /// Ecliptical longitude in degrees `[0, 360)`
    pub lambda: f64,
    /// Ecliptical latitude in degrees
    pub beta: f64,
    /// Distance (AU or km, see type docs)
    pub distance: f64,
}

/// Corrections to ecliptical coordinates, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EclipticalDelta {
    /// Correction in longitude
    pub lambda: f64,
    /// Correction in latitude
    pub beta: f64,
}

impl Ecliptical {
    /// Create ecliptical coordinates, normalizing the longitude
    pub fn new(lambda: f64, beta: f64, distance: f64) -> Self {
        Self {
            lambda: to360(lambda),
            beta,
            distance,
        }
    }
}

impl Add<EclipticalDelta> for Ecliptical {
    type Output = Ecliptical;

    fn add(self, rhs: EclipticalDelta) -> Ecliptical {
        Ecliptical::new(self.lambda + rhs.lambda, self.beta + rhs.beta, self.distance)
    }
}

impl Add for EclipticalDelta {
    type Output = EclipticalDelta;

    fn add(self, rhs: EclipticalDelta) -> EclipticalDelta {
        EclipticalDelta {
            lambda: self.lambda + rhs.lambda,
            beta: self.beta + rhs.beta,
        }
    }
}

/// Horizontal coordinates: azimuth and altitude
///
/// Azimuth is measured westward from the **south** point, the convention of
/// the classical reduction formulas. Use [`Horizontal::azimuth_from_north`]
/// for the navigational convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Horizontal {
    /// Azimuth in degrees from south, increasing westward, `[0, 360)`
    pub azimuth: f64,
    /// Altitude above the horizon in degrees
    pub altitude: f64,
}

impl Horizontal {
    /// Create horizontal coordinates, normalizing the azimuth
    pub fn new(azimuth: f64, altitude: f64) -> Self {
        Self {
            azimuth: to360(azimuth),
            altitude,
        }
    }

    /// Azimuth measured from north through east
    pub fn azimuth_from_north(&self) -> f64 {
        to360(self.azimuth + 180.0)
    }
}

/// Galactic coordinates (IAU 1958 system, referred to J2000)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Galactic {
    /// Galactic longitude in degrees `[0, 360)`
    pub l: f64,
    /// Galactic latitude in degrees
    pub b: f64,
}

impl Galactic {
    pub fn new(l: f64, b: f64) -> Self {
        Self { l: to360(l), b }
    }
}

/// Heliocentric ecliptical coordinates: longitude, latitude, radius vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heliocentrical {
    /// Heliocentric longitude in degrees `[0, 360)`
    pub l: f64,
    /// Heliocentric latitude in degrees
    pub b: f64,
    /// Radius vector in AU
    pub r: f64,
}

impl Heliocentrical {
    pub fn new(l: f64, b: f64, r: f64) -> Self {
        Self { l: to360(l), b, r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constructors_normalize_longitudes() {
        assert_eq!(Equatorial::new(-10.0, 5.0).alpha, 350.0);
        assert_eq!(Ecliptical::new(725.0, 0.0, 1.0).lambda, 5.0);
        assert_eq!(Horizontal::new(360.0, 0.0).azimuth, 0.0);
        assert_eq!(Galactic::new(-1.0, 0.0).l, 359.0);
    }

    #[test]
    fn test_azimuth_from_north() {
        // South-based 0 is due south, which is 180 from north
        assert_eq!(Horizontal::new(0.0, 10.0).azimuth_from_north(), 180.0);
        // South-based 270 (east) is 90 from north
        assert_eq!(Horizontal::new(270.0, 10.0).azimuth_from_north(), 90.0);
    }

    #[test]
    fn test_delta_addition_wraps_alpha() {
        let eq = Equatorial::new(359.999, 10.0)
            + EquatorialDelta {
                alpha: 0.002,
                delta: -0.5,
            };
        assert_relative_eq!(eq.alpha, 0.001, epsilon = 1e-9);
        assert_relative_eq!(eq.delta, 9.5, epsilon = 1e-12);
    }

    #[test]
    fn test_angular_separation_symmetry_and_poles() {
        let a = Equatorial::new(10.0, 89.0);
        let b = Equatorial::new(190.0, 89.0);
        assert_relative_eq!(a.angular_separation(&b), 2.0, epsilon = 1e-9);
        assert_relative_eq!(a.angular_separation(&b), b.angular_separation(&a), epsilon = 1e-12);
        assert_relative_eq!(a.angular_separation(&a), 0.0, epsilon = 1e-12);
    }
}
