//! Conversions between the spherical coordinate systems
//!
//! Conversions that depend on the date take their parameters explicitly:
//! the obliquity of the ecliptic for equatorial/ecliptical, and the
//! observer location plus sidereal time at Greenwich for equatorial/horizontal.

use super::angle::to360;
use super::cartesian::Cartesian3;
use super::spherical::{Ecliptical, Equatorial, Galactic, Heliocentrical, Horizontal};
use crate::earthlib::GeoLocation;
use crate::framelib::inertial;

impl Ecliptical {
    /// Equatorial coordinates for an obliquity `epsilon` in degrees
    ///
    /// Pass the mean obliquity for mean positions and the true obliquity for
    /// apparent ones.
    pub fn to_equatorial(&self, epsilon: f64) -> Equatorial {
        let (sin_l, cos_l) = self.lambda.to_radians().sin_cos();
        let (sin_b, cos_b) = self.beta.to_radians().sin_cos();
        let (sin_e, cos_e) = epsilon.to_radians().sin_cos();

        let alpha = (sin_l * cos_e - sin_b / cos_b * sin_e).atan2(cos_l);
        let delta = (sin_b * cos_e + cos_b * sin_e * sin_l).clamp(-1.0, 1.0).asin();
        Equatorial::new(alpha.to_degrees(), delta.to_degrees())
    }

    /// Rectangular coordinates in the ecliptic frame (distance as unit)
    pub fn to_rectangular(&self) -> Cartesian3 {
        Cartesian3::from_spherical(self.lambda, self.beta, self.distance)
    }
}

impl Equatorial {
    /// Ecliptical coordinates for an obliquity `epsilon` in degrees
    ///
    /// The returned distance is zero.
    pub fn to_ecliptical(&self, epsilon: f64) -> Ecliptical {
        let (sin_a, cos_a) = self.alpha.to_radians().sin_cos();
        let (sin_d, cos_d) = self.delta.to_radians().sin_cos();
        let (sin_e, cos_e) = epsilon.to_radians().sin_cos();

        let lambda = (sin_a * cos_e + sin_d / cos_d * sin_e).atan2(cos_a);
        let beta = (sin_d * cos_e - cos_d * sin_e * sin_a).clamp(-1.0, 1.0).asin();
        Ecliptical::new(lambda.to_degrees(), beta.to_degrees(), 0.0)
    }

    /// Local hour angle in degrees `[0, 360)` for a Greenwich sidereal time `theta0`
    pub fn hour_angle(&self, location: &GeoLocation, theta0: f64) -> f64 {
        to360(theta0 - location.longitude - self.alpha)
    }

    /// Horizontal coordinates for an observer
    ///
    /// # Arguments
    ///
    /// * `location` - Observer position (longitude positive west)
    /// * `theta0` - Sidereal time at Greenwich in degrees; use the apparent
    ///   sidereal time together with apparent coordinates
    pub fn to_horizontal(&self, location: &GeoLocation, theta0: f64) -> Horizontal {
        let h = self.hour_angle(location, theta0).to_radians();
        let (sin_h, cos_h) = h.sin_cos();
        let (sin_phi, cos_phi) = location.latitude.to_radians().sin_cos();
        let (sin_d, cos_d) = self.delta.to_radians().sin_cos();

        let azimuth = sin_h.atan2(cos_h * sin_phi - sin_d / cos_d * cos_phi);
        let altitude = (sin_phi * sin_d + cos_phi * cos_d * cos_h)
            .clamp(-1.0, 1.0)
            .asin();
        Horizontal::new(azimuth.to_degrees(), altitude.to_degrees())
    }

    /// Galactic coordinates; `self` must be referred to J2000
    pub fn to_galactic(&self) -> Galactic {
        inertial::equatorial_to_galactic(self)
    }
}

impl Horizontal {
    /// Equatorial coordinates for an observer and Greenwich sidereal time
    pub fn to_equatorial(&self, location: &GeoLocation, theta0: f64) -> Equatorial {
        let (sin_a, cos_a) = self.azimuth.to_radians().sin_cos();
        let (sin_h, cos_h) = self.altitude.to_radians().sin_cos();
        let (sin_phi, cos_phi) = location.latitude.to_radians().sin_cos();

        let hour_angle = sin_a.atan2(cos_a * sin_phi + sin_h / cos_h * cos_phi);
        let delta = (sin_phi * sin_h - cos_phi * cos_h * cos_a)
            .clamp(-1.0, 1.0)
            .asin();
        Equatorial::new(
            theta0 - location.longitude - hour_angle.to_degrees(),
            delta.to_degrees(),
        )
    }
}

impl Galactic {
    /// J2000 equatorial coordinates
    pub fn to_equatorial(&self) -> Equatorial {
        inertial::galactic_to_equatorial(self)
    }
}

impl Heliocentrical {
    /// Rectangular heliocentric coordinates in AU (ecliptic frame)
    pub fn to_rectangular(&self) -> Cartesian3 {
        Cartesian3::from_spherical(self.l, self.b, self.r)
    }

    /// Build from a rectangular heliocentric ecliptic vector
    pub fn from_rectangular(v: Cartesian3) -> Self {
        let (l, b, r) = v.to_spherical();
        Heliocentrical::new(l, b, r)
    }

    /// Geometric geocentric ecliptical coordinates of this body
    ///
    /// `earth` is the heliocentric position of the Earth in the same frame.
    pub fn to_geocentric(&self, earth: &Heliocentrical) -> Ecliptical {
        let v = self.to_rectangular() - earth.to_rectangular();
        let (lambda, beta, distance) = v.to_spherical();
        Ecliptical::new(lambda, beta, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_pollux_ecliptical() {
        // Pollux at J2000 with the mean obliquity of J2000
        let pollux = Equatorial::new(116.328942, 28.026183);
        let ecl = pollux.to_ecliptical(23.4392911);
        assert_relative_eq!(ecl.lambda, 113.215630, epsilon = 1e-6);
        assert_relative_eq!(ecl.beta, 6.684170, epsilon = 1e-6);

        let back = ecl.to_equatorial(23.4392911);
        assert_relative_eq!(back.alpha, pollux.alpha, epsilon = 1e-9);
        assert_relative_eq!(back.delta, pollux.delta, epsilon = 1e-9);
    }

    #[test]
    fn test_venus_from_washington() {
        // Venus at 1987 April 10, 19h21m UT, observed from the US Naval Observatory
        let location = GeoLocation::new(77.0 + 3.0 / 60.0 + 56.0 / 3600.0, 38.0 + 55.0 / 60.0 + 17.0 / 3600.0);
        let venus = Equatorial::new(347.3193375, -6.719892);
        let theta0 = 128.7369091;
        let hor = venus.to_horizontal(&location, theta0);
        assert_relative_eq!(hor.azimuth, 68.033611, epsilon = 1e-4);
        assert_relative_eq!(hor.altitude, 15.124958, epsilon = 1e-4);
    }

    #[test]
    fn test_horizontal_roundtrip_random() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..200 {
            let location = GeoLocation::new(rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0));
            let eq = Equatorial::new(rng.gen_range(0.0..360.0), rng.gen_range(-85.0..85.0));
            let theta0 = rng.gen_range(0.0..360.0);
            let back = eq.to_horizontal(&location, theta0).to_equatorial(&location, theta0);
            assert_relative_eq!(back.delta, eq.delta, epsilon = 1e-8);
            let dalpha = (back.alpha - eq.alpha + 540.0).rem_euclid(360.0) - 180.0;
            assert!(dalpha.abs() < 1e-7);
        }
    }

    #[test]
    fn test_geocentric_from_heliocentric() {
        let earth = Heliocentrical::new(0.0, 0.0, 1.0);
        let body = Heliocentrical::new(90.0, 0.0, 1.0);
        let geo = body.to_geocentric(&earth);
        assert_relative_eq!(geo.lambda, 135.0, epsilon = 1e-12);
        assert_relative_eq!(geo.distance, 2f64.sqrt(), epsilon = 1e-12);
    }
}
