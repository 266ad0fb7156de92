//! Precession of the equinoxes
//!
//! Rigorous reduction between two arbitrary epochs using the IAU 1976
//! (Lieske) angles, both for equatorial coordinates (ζ, z, θ) and for
//! ecliptical coordinates (η, Π, p).

use nalgebra::Matrix3;

use crate::constants::{ASEC2DEG, DAYS_PER_JULIAN_CENTURY, J2000};
use crate::coordinates::{Cartesian3, Ecliptical, Equatorial};
use crate::framelib::{rot_y, rot_z};

/// Equatorial precession angles between two epochs, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecessionalElements {
    /// Starting epoch (Julian Ephemeris Day)
    pub from_jd: f64,
    /// Target epoch (Julian Ephemeris Day)
    pub to_jd: f64,
    pub zeta: f64,
    pub z: f64,
    pub theta: f64,
}

/// Equatorial precession angles from `from_jd` to `to_jd` (FK5 system)
pub fn elements_fk5(from_jd: f64, to_jd: f64) -> PrecessionalElements {
    let big_t = (from_jd - J2000) / DAYS_PER_JULIAN_CENTURY;
    let t = (to_jd - from_jd) / DAYS_PER_JULIAN_CENTURY;
    let (t2, t3) = (t * t, t * t * t);

    let linear = (2306.2181 + 1.39656 * big_t - 0.000139 * big_t * big_t) * t;
    let zeta = linear + (0.30188 - 0.000344 * big_t) * t2 + 0.017998 * t3;
    let z = linear + (1.09468 + 0.000066 * big_t) * t2 + 0.018203 * t3;
    let theta = (2004.3109 - 0.85330 * big_t - 0.000217 * big_t * big_t) * t
        - (0.42665 + 0.000217 * big_t) * t2
        - 0.041833 * t3;

    PrecessionalElements {
        from_jd,
        to_jd,
        zeta: zeta * ASEC2DEG,
        z: z * ASEC2DEG,
        theta: theta * ASEC2DEG,
    }
}

/// Precess equatorial coordinates with previously computed angles
pub fn equatorial_coordinates(eq0: &Equatorial, p: &PrecessionalElements) -> Equatorial {
    let (sin_d, cos_d) = eq0.delta.to_radians().sin_cos();
    let (sin_th, cos_th) = p.theta.to_radians().sin_cos();
    let (sin_az, cos_az) = (eq0.alpha + p.zeta).to_radians().sin_cos();

    let a = cos_d * sin_az;
    let b = cos_th * cos_d * cos_az - sin_th * sin_d;
    let c = sin_th * cos_d * cos_az + cos_th * sin_d;

    // Near the poles asin(c) loses precision; recover δ from a and b instead
    let delta = if c.abs() > 0.99 {
        let dec = (a * a + b * b).sqrt().acos();
        if c < 0.0 {
            -dec
        } else {
            dec
        }
    } else {
        c.asin()
    };

    Equatorial::new(a.atan2(b).to_degrees() + p.z, delta.to_degrees())
}

/// Rotation matrix equivalent to [`equatorial_coordinates`]
///
/// Applies to rectangular equatorial vectors referred to `from_jd`.
pub fn rotation_matrix(p: &PrecessionalElements) -> Matrix3<f64> {
    rot_z(-p.z) * rot_y(p.theta) * rot_z(-p.zeta)
}

/// Precess a rectangular equatorial vector
pub fn precess_rectangular(v: Cartesian3, p: &PrecessionalElements) -> Cartesian3 {
    Cartesian3::from_vector3(rotation_matrix(p) * v.to_vector3())
}

/// Ecliptical precession angles between two epochs, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticalPrecessionalElements {
    pub from_jd: f64,
    pub to_jd: f64,
    pub eta: f64,
    pub pi: f64,
    pub p: f64,
}

/// Ecliptical precession angles from `from_jd` to `to_jd`
pub fn ecliptical_elements(from_jd: f64, to_jd: f64) -> EclipticalPrecessionalElements {
    let big_t = (from_jd - J2000) / DAYS_PER_JULIAN_CENTURY;
    let t = (to_jd - from_jd) / DAYS_PER_JULIAN_CENTURY;
    let (t2, t3) = (t * t, t * t * t);

    let eta = (47.0029 - 0.06603 * big_t + 0.000598 * big_t * big_t) * t
        + (-0.03302 + 0.000598 * big_t) * t2
        + 0.000060 * t3;
    let pi = 174.876384 * 3600.0 + 3289.4789 * big_t + 0.60622 * big_t * big_t
        - (869.8089 + 0.50491 * big_t) * t
        + 0.03536 * t2;
    let p = (5029.0966 + 2.22226 * big_t - 0.000042 * big_t * big_t) * t
        + (1.11113 - 0.000042 * big_t) * t2
        - 0.000006 * t3;

    EclipticalPrecessionalElements {
        from_jd,
        to_jd,
        eta: eta * ASEC2DEG,
        pi: pi * ASEC2DEG,
        p: p * ASEC2DEG,
    }
}

/// Precess ecliptical coordinates; the distance is carried through
pub fn ecliptical_coordinates(
    ecl0: &Ecliptical,
    e: &EclipticalPrecessionalElements,
) -> Ecliptical {
    let (sin_eta, cos_eta) = e.eta.to_radians().sin_cos();
    let (sin_b, cos_b) = ecl0.beta.to_radians().sin_cos();
    let (sin_pl, cos_pl) = (e.pi - ecl0.lambda).to_radians().sin_cos();

    let a = cos_eta * cos_b * sin_pl - sin_eta * sin_b;
    let b = cos_b * cos_pl;
    let c = cos_eta * sin_b + sin_eta * cos_b * sin_pl;

    Ecliptical::new(
        e.p + e.pi - a.atan2(b).to_degrees(),
        c.clamp(-1.0, 1.0).asin().to_degrees(),
        ecl0.distance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_theta_persei_to_2028() {
        // Mean position at J2000 with proper motion applied to 2028 November 13.19 TD
        let years = (2462088.69 - J2000) / 365.25;
        let eq0 = Equatorial::new(
            41.049942 + 0.03425 * 15.0 * years / 3600.0,
            49.228467 - 0.0895 * years / 3600.0,
        );
        let p = elements_fk5(J2000, 2462088.69);
        let eq = equatorial_coordinates(&eq0, &p);
        assert_relative_eq!(eq.alpha, 41.547214, epsilon = 1e-5);
        assert_relative_eq!(eq.delta, 49.348483, epsilon = 1e-5);
    }

    #[test]
    fn test_matrix_matches_spherical() {
        let mut rng = StdRng::seed_from_u64(11);
        let p = elements_fk5(2433282.4235, 2469807.5);
        for _ in 0..100 {
            let eq0 = Equatorial::new(rng.gen_range(0.0..360.0), rng.gen_range(-89.0..89.0));
            let spherical = equatorial_coordinates(&eq0, &p);
            let (alpha, delta, _) =
                precess_rectangular(eq0.to_unit_vector(), &p).to_spherical();
            assert!(Equatorial::new(alpha, delta).angular_separation(&spherical) < 1e-9);
        }
    }

    #[test]
    fn test_precession_reverses() {
        let eq0 = Equatorial::new(300.0, -70.0);
        let forward = elements_fk5(J2000, 2488069.5);
        let back = elements_fk5(2488069.5, J2000);
        let there = equatorial_coordinates(&eq0, &forward);
        let again = equatorial_coordinates(&there, &back);
        assert!(again.angular_separation(&eq0) < 1e-8);
    }

    #[test]
    fn test_ecliptical_general_precession_rate() {
        // About 50.29 arcseconds per year along the ecliptic
        let ecl0 = Ecliptical::new(10.0, 0.0, 1.0);
        let e = ecliptical_elements(J2000, J2000 + 36525.0);
        let ecl = ecliptical_coordinates(&ecl0, &e);
        assert_relative_eq!((ecl.lambda - ecl0.lambda) * 3600.0 / 100.0, 50.29, epsilon = 0.05);
        assert_eq!(ecl.distance, 1.0);
    }

    #[test]
    fn test_ecliptical_precession_reverses() {
        let ecl0 = Ecliptical::new(149.48194, 1.76549, 0.72);
        let forward = ecliptical_elements(J2000, 1355807.5);
        let back = ecliptical_elements(1355807.5, J2000);
        let again = ecliptical_coordinates(&ecliptical_coordinates(&ecl0, &forward), &back);
        assert_relative_eq!(again.lambda, ecl0.lambda, epsilon = 1e-5);
        assert_relative_eq!(again.beta, ecl0.beta, epsilon = 1e-5);
    }
}
