//! Nutation and the obliquity of the ecliptic
//!
//! Nutation uses the 77-term IAU 2000B lunisolar series, good to about one
//! milliarcsecond. The mean obliquity uses the polynomial of Laskar (1986),
//! valid over ±10000 years around J2000.

mod iau2000b;

use crate::constants::{ASEC2DEG, DAYS_PER_JULIAN_CENTURY, J2000};
use crate::coordinates::{Equatorial, EquatorialDelta};

/// Nutation in longitude and obliquity, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NutationElements {
    /// Nutation in longitude Δψ
    pub delta_psi: f64,
    /// Nutation in obliquity Δε
    pub delta_epsilon: f64,
}

/// Delaunay arguments `[l, l', F, D, Ω]` in radians (IERS 2010, Table 5.2e)
fn fundamental_arguments(t: f64) -> [f64; 5] {
    let arcsec = |c: [f64; 5]| -> f64 {
        let value = c[0] + t * (c[1] + t * (c[2] + t * (c[3] + t * c[4])));
        (value * ASEC2DEG).to_radians()
    };
    [
        arcsec([485868.249036, 1717915923.2178, 31.8792, 0.051635, -0.00024470]),
        arcsec([1287104.79305, 129596581.0481, -0.5532, 0.000136, -0.00001149]),
        arcsec([335779.526232, 1739527262.8478, -12.7512, -0.001037, 0.00000417]),
        arcsec([1072260.70369, 1602961601.2090, -6.3706, 0.006593, -0.00003169]),
        arcsec([450160.398036, -6962890.5431, 7.4722, 0.007702, -0.00005939]),
    ]
}

/// Nutation elements for a Julian Ephemeris Day
pub fn nutation_elements(jde: f64) -> NutationElements {
    let t = (jde - J2000) / DAYS_PER_JULIAN_CENTURY;
    let args = fundamental_arguments(t);

    let (mut dpsi, mut deps) = (0.0, 0.0);
    for row in iau2000b::TERMS.iter() {
        let arg: f64 = row[..5]
            .iter()
            .zip(args.iter())
            .map(|(n, a)| *n as f64 * a)
            .sum();
        let (sin_arg, cos_arg) = arg.sin_cos();
        dpsi += (row[5] as f64 + row[6] as f64 * t) * sin_arg;
        deps += (row[7] as f64 + row[8] as f64 * t) * cos_arg;
    }

    // Series is in 0.1 μas; the constant offsets stand in for the planetary terms
    NutationElements {
        delta_psi: (dpsi * 1e-7 - 0.000_135) * ASEC2DEG,
        delta_epsilon: (deps * 1e-7 - 0.000_388) * ASEC2DEG,
    }
}

/// Mean obliquity of the ecliptic in degrees (Laskar)
pub fn mean_obliquity(jde: f64) -> f64 {
    const COEFFS: [f64; 11] = [
        84381.448, -4680.93, -1.55, 1999.25, -51.38, -249.67, -39.05, 7.12, 27.87, 5.79, 2.45,
    ];
    let u = (jde - J2000) / (DAYS_PER_JULIAN_CENTURY * 100.0);
    COEFFS.iter().rev().fold(0.0, |acc, c| acc * u + c) * ASEC2DEG
}

/// True obliquity `ε = ε0 + Δε` in degrees
pub fn true_obliquity(jde: f64, delta_epsilon: f64) -> f64 {
    mean_obliquity(jde) + delta_epsilon
}

/// Effect of nutation on equatorial coordinates of date
///
/// `epsilon` is the true obliquity. The formulas lose accuracy within about
/// a degree of the celestial poles.
pub fn equatorial_effect(
    eq: &Equatorial,
    nutation: &NutationElements,
    epsilon: f64,
) -> EquatorialDelta {
    let (sin_a, cos_a) = eq.alpha.to_radians().sin_cos();
    let tan_d = eq.delta.to_radians().tan();
    let (sin_e, cos_e) = epsilon.to_radians().sin_cos();

    EquatorialDelta {
        alpha: (cos_e + sin_e * sin_a * tan_d) * nutation.delta_psi
            - cos_a * tan_d * nutation.delta_epsilon,
        delta: sin_e * cos_a * nutation.delta_psi + sin_a * nutation.delta_epsilon,
    }
}

/// Effect of nutation on ecliptical longitude (the latitude is unaffected)
pub fn longitude_effect(nutation: &NutationElements) -> f64 {
    nutation.delta_psi
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nutation_1987_april_10() {
        // Reference values from the 1980 theory: Δψ = -3.788″, Δε = +9.443″
        let n = nutation_elements(2446895.5);
        assert_relative_eq!(n.delta_psi * 3600.0, -3.788, epsilon = 0.01);
        assert_relative_eq!(n.delta_epsilon * 3600.0, 9.443, epsilon = 0.01);
    }

    #[test]
    fn test_mean_obliquity() {
        // 23°26′27.407″ on 1987 April 10
        assert_relative_eq!(mean_obliquity(2446895.5) * 3600.0, 84387.407, epsilon = 0.01);
        assert_relative_eq!(mean_obliquity(J2000), 23.4392911, epsilon = 1e-7);
    }

    #[test]
    fn test_nutation_bounded() {
        for k in 0..400 {
            let n = nutation_elements(J2000 + k as f64 * 91.0);
            assert!(n.delta_psi.abs() * 3600.0 < 20.0);
            assert!(n.delta_epsilon.abs() * 3600.0 < 11.0);
        }
    }

    #[test]
    fn test_equatorial_effect_theta_persei() {
        // 2028 November 13.19 TD: Δα = +15.843″, Δδ = +6.217″
        let eq = Equatorial::new(41.547214, 49.348483);
        let jde = 2462088.69;
        let n = nutation_elements(jde);
        let epsilon = true_obliquity(jde, n.delta_epsilon);
        let d = equatorial_effect(&eq, &n, epsilon);
        assert_relative_eq!(d.alpha * 3600.0, 15.843, epsilon = 0.05);
        assert_relative_eq!(d.delta * 3600.0, 6.217, epsilon = 0.05);
    }
}
