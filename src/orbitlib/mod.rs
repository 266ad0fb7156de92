//! Keplerian orbits
//!
//! [`OrbitalElements`] describe an unperturbed heliocentric conic. Positions
//! come out as rectangular coordinates in the ecliptic frame of the
//! elements' equinox, which is J2000 unless stated otherwise.

pub mod kepler;

use serde::{Deserialize, Serialize};

use crate::constants::{GAUSS_K, J2000};
use crate::coordinates::Cartesian3;
use crate::{Result, SkyError};

/// Eccentricities within this distance of 1 are treated as parabolic
pub const PARABOLIC_TOLERANCE: f64 = 1e-5;

/// Conic section of an orbit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitKind {
    Elliptic,
    Parabolic,
    Hyperbolic,
}

/// Heliocentric osculating elements; angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Perihelion distance q in AU
    pub perihelion_distance: f64,
    /// Eccentricity e
    pub eccentricity: f64,
    /// Inclination i
    pub inclination: f64,
    /// Longitude of the ascending node Ω
    pub ascending_node: f64,
    /// Argument of perihelion ω
    pub argument_of_perihelion: f64,
    /// Time of perihelion passage (Julian Ephemeris Day)
    pub perihelion_time: f64,
    /// Equinox the angular elements are referred to (Julian Ephemeris Day)
    #[serde(default = "default_equinox")]
    pub equinox: f64,
}

fn default_equinox() -> f64 {
    J2000
}

/// Position in the orbital plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalPosition {
    /// True anomaly ν in degrees
    pub true_anomaly: f64,
    /// Radius vector in AU
    pub radius: f64,
}

impl OrbitalElements {
    /// Elements of an elliptic orbit given the mean anomaly at an epoch
    pub fn from_mean_anomaly(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        ascending_node: f64,
        argument_of_perihelion: f64,
        epoch: f64,
        mean_anomaly: f64,
    ) -> Self {
        let n = GAUSS_K.to_degrees() / semi_major_axis.powf(1.5);
        let m = crate::coordinates::angle::to180(mean_anomaly);
        Self {
            perihelion_distance: semi_major_axis * (1.0 - eccentricity),
            eccentricity,
            inclination,
            ascending_node,
            argument_of_perihelion,
            perihelion_time: epoch - m / n,
            equinox: J2000,
        }
    }

    /// Elements given the perihelion distance and time of perihelion
    pub fn from_perihelion(
        perihelion_distance: f64,
        eccentricity: f64,
        inclination: f64,
        ascending_node: f64,
        argument_of_perihelion: f64,
        perihelion_time: f64,
    ) -> Self {
        Self {
            perihelion_distance,
            eccentricity,
            inclination,
            ascending_node,
            argument_of_perihelion,
            perihelion_time,
            equinox: J2000,
        }
    }

    /// Refer the angular elements to another equinox (default J2000)
    pub fn with_equinox(mut self, equinox: f64) -> Self {
        self.equinox = equinox;
        self
    }

    pub fn kind(&self) -> OrbitKind {
        if (self.eccentricity - 1.0).abs() < PARABOLIC_TOLERANCE {
            OrbitKind::Parabolic
        } else if self.eccentricity < 1.0 {
            OrbitKind::Elliptic
        } else {
            OrbitKind::Hyperbolic
        }
    }

    /// Semi-major axis in AU; negative for hyperbolas, `None` for parabolas
    pub fn semi_major_axis(&self) -> Option<f64> {
        match self.kind() {
            OrbitKind::Parabolic => None,
            _ => Some(self.perihelion_distance / (1.0 - self.eccentricity)),
        }
    }

    /// Mean motion in degrees per day (`None` for parabolas)
    pub fn mean_motion(&self) -> Option<f64> {
        self.semi_major_axis()
            .map(|a| GAUSS_K.to_degrees() / a.abs().powf(1.5))
    }

    /// Orbital period in days for elliptic orbits
    pub fn period(&self) -> Option<f64> {
        match self.kind() {
            OrbitKind::Elliptic => self.mean_motion().map(|n| 360.0 / n),
            _ => None,
        }
    }

    /// Reject elements that cannot describe a conic
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.perihelion_distance,
            self.eccentricity,
            self.inclination,
            self.ascending_node,
            self.argument_of_perihelion,
            self.perihelion_time,
            self.equinox,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SkyError::InvalidInput("orbital elements must be finite".into()));
        }
        if self.perihelion_distance <= 0.0 {
            return Err(SkyError::InvalidInput(format!(
                "perihelion distance {} must be positive",
                self.perihelion_distance
            )));
        }
        if self.eccentricity < 0.0 {
            return Err(SkyError::InvalidInput(format!(
                "eccentricity {} must not be negative",
                self.eccentricity
            )));
        }
        Ok(())
    }

    /// True anomaly and radius vector at a Julian Ephemeris Day
    pub fn position(&self, jde: f64) -> Result<OrbitalPosition> {
        let e = self.eccentricity;
        let q = self.perihelion_distance;
        let dt = jde - self.perihelion_time;

        let (true_anomaly, radius) = match self.kind() {
            OrbitKind::Parabolic => kepler::solve_parabolic(q, dt),
            OrbitKind::Elliptic => {
                let a = q / (1.0 - e);
                let m = (GAUSS_K / a.powf(1.5) * dt).rem_euclid(std::f64::consts::TAU);
                let ecc = kepler::solve_elliptic(e, m)?;
                (kepler::elliptic_true_anomaly(e, ecc), a * (1.0 - e * ecc.cos()))
            }
            OrbitKind::Hyperbolic => {
                let a = q / (e - 1.0);
                let m = GAUSS_K / a.powf(1.5) * dt;
                let h = kepler::solve_hyperbolic(e, m)?;
                (kepler::hyperbolic_true_anomaly(e, h), a * (e * h.cosh() - 1.0))
            }
        };

        Ok(OrbitalPosition {
            true_anomaly,
            radius,
        })
    }

    /// Heliocentric rectangular coordinates in AU, ecliptic frame of the equinox
    pub fn heliocentric_rectangular(&self, jde: f64) -> Result<Cartesian3> {
        let pos = self.position(jde)?;
        let (sin_node, cos_node) = self.ascending_node.to_radians().sin_cos();
        let (sin_i, cos_i) = self.inclination.to_radians().sin_cos();
        let (sin_u, cos_u) = (pos.true_anomaly + self.argument_of_perihelion)
            .to_radians()
            .sin_cos();
        let r = pos.radius;

        Ok(Cartesian3::new(
            r * (cos_node * cos_u - sin_node * sin_u * cos_i),
            r * (sin_node * cos_u + cos_node * sin_u * cos_i),
            r * sin_u * sin_i,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn encke() -> OrbitalElements {
        OrbitalElements::from_perihelion(
            2.2091404 * (1.0 - 0.8502196),
            0.8502196,
            11.94524,
            334.75006,
            186.23352,
            2448193.04502,
        )
    }

    #[test]
    fn test_encke_radius_vector() {
        // 1990 October 6.0 TD
        let pos = encke().position(2448170.5).unwrap();
        assert_relative_eq!(pos.radius, 0.6525, epsilon = 1e-3);
    }

    #[test]
    fn test_period_and_kind() {
        let elements = encke();
        assert_eq!(elements.kind(), OrbitKind::Elliptic);
        // 2.2091404^1.5 years
        assert_relative_eq!(elements.period().unwrap() / 365.25, 3.2835, epsilon = 1e-3);
        assert_relative_eq!(elements.semi_major_axis().unwrap(), 2.2091404, epsilon = 1e-9);

        let parabolic = OrbitalElements::from_perihelion(1.0, 1.0 + 1e-7, 0.0, 0.0, 0.0, J2000);
        assert_eq!(parabolic.kind(), OrbitKind::Parabolic);
        assert!(parabolic.mean_motion().is_none());
    }

    #[test]
    fn test_at_perihelion() {
        for e in [0.3, 1.0, 1.7] {
            let elements = OrbitalElements::from_perihelion(0.8, e, 10.0, 30.0, 40.0, J2000);
            let pos = elements.position(J2000).unwrap();
            assert_relative_eq!(pos.true_anomaly, 0.0, epsilon = 1e-9);
            assert_relative_eq!(pos.radius, 0.8, epsilon = 1e-9);
            let v = elements.heliocentric_rectangular(J2000).unwrap();
            assert_relative_eq!(v.magnitude(), 0.8, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mean_anomaly_roundtrip() {
        let elements =
            OrbitalElements::from_mean_anomaly(2.77, 0.0785, 10.59, 80.3, 73.6, 2459000.5, 77.37);
        let n = elements.mean_motion().unwrap();
        let m = (2459000.5 - elements.perihelion_time) * n;
        assert_relative_eq!(m, 77.37, epsilon = 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(encke().validate().is_ok());
        let mut bad = encke();
        bad.perihelion_distance = -1.0;
        assert!(bad.validate().is_err());
        bad = encke();
        bad.eccentricity = f64::NAN;
        assert!(bad.validate().is_err());
    }
}
