//! Fixed inertial frames: J2000 equator, J2000 ecliptic and the galactic system
//!
//! Conversions between these frames go through unit vectors and a constant
//! rotation matrix.

use super::{ECLIPTIC_J2000_TO_EQUATORIAL, EQUATORIAL_J2000_TO_GALACTIC};
use crate::coordinates::cartesian::Cartesian3;
use crate::coordinates::{Ecliptical, Equatorial, Galactic};

/// A spherical coordinate type with a rectangular counterpart
pub trait InertialFrame: Sized {
    /// Unit vector in this frame
    fn to_cartesian(&self) -> Cartesian3;

    /// Spherical coordinates from a vector in this frame
    fn from_cartesian(cart: Cartesian3) -> Self;

    /// Angle between two positions in degrees
    fn angle_between(&self, other: &Self) -> f64 {
        self.to_cartesian().angle_to(&other.to_cartesian())
    }
}

impl InertialFrame for Equatorial {
    fn to_cartesian(&self) -> Cartesian3 {
        Cartesian3::from_spherical(self.alpha, self.delta, 1.0)
    }

    fn from_cartesian(cart: Cartesian3) -> Self {
        let (alpha, delta, _) = cart.to_spherical();
        Equatorial::new(alpha, delta)
    }
}

impl InertialFrame for Ecliptical {
    fn to_cartesian(&self) -> Cartesian3 {
        Cartesian3::from_spherical(self.lambda, self.beta, 1.0)
    }

    fn from_cartesian(cart: Cartesian3) -> Self {
        let (lambda, beta, distance) = cart.to_spherical();
        Ecliptical::new(lambda, beta, distance)
    }
}

impl InertialFrame for Galactic {
    fn to_cartesian(&self) -> Cartesian3 {
        Cartesian3::from_spherical(self.l, self.b, 1.0)
    }

    fn from_cartesian(cart: Cartesian3) -> Self {
        let (l, b, _) = cart.to_spherical();
        Galactic::new(l, b)
    }
}

/// Rotate a J2000 ecliptic vector onto the J2000 equator
pub fn ecliptic_j2000_to_equatorial(v: Cartesian3) -> Cartesian3 {
    Cartesian3::from_vector3(*ECLIPTIC_J2000_TO_EQUATORIAL * v.to_vector3())
}

/// Galactic coordinates of a J2000 equatorial position
pub fn equatorial_to_galactic(eq: &Equatorial) -> Galactic {
    let v = *EQUATORIAL_J2000_TO_GALACTIC * eq.to_cartesian().to_vector3();
    Galactic::from_cartesian(Cartesian3::from_vector3(v))
}

/// J2000 equatorial coordinates of a galactic position
pub fn galactic_to_equatorial(gal: &Galactic) -> Equatorial {
    let v = EQUATORIAL_J2000_TO_GALACTIC.transpose() * gal.to_cartesian().to_vector3();
    Equatorial::from_cartesian(Cartesian3::from_vector3(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_galactic_center_and_pole() {
        let center = galactic_to_equatorial(&Galactic::new(0.0, 0.0));
        assert_relative_eq!(center.alpha, 266.40499, epsilon = 1e-3);
        assert_relative_eq!(center.delta, -28.93617, epsilon = 1e-3);

        let pole = equatorial_to_galactic(&Equatorial::new(192.85948, 27.12825));
        assert_relative_eq!(pole.b, 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_equatorial_galactic_roundtrip() {
        let vega = Equatorial::new(279.23473, 38.78369);
        let back = galactic_to_equatorial(&equatorial_to_galactic(&vega));
        assert_relative_eq!(back.alpha, vega.alpha, epsilon = 1e-9);
        assert_relative_eq!(back.delta, vega.delta, epsilon = 1e-9);
    }

    #[test]
    fn test_ecliptic_pole_on_equator_frame() {
        let pole = ecliptic_j2000_to_equatorial(Cartesian3::new(0.0, 0.0, 1.0));
        let eq = Equatorial::from_cartesian(pole);
        assert_relative_eq!(eq.alpha, 270.0, epsilon = 1e-9);
        assert_relative_eq!(eq.delta, 90.0 - crate::constants::OBLIQUITY_J2000, epsilon = 1e-9);
    }
}
