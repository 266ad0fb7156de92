//! VSOP87D planetary theory (Bretagnon & Francou, 1988)
//!
//! Heliocentric spherical coordinates referred to the mean ecliptic and
//! equinox of date. The embedded series are the truncation published in
//! *Astronomical Algorithms*, accurate to about one arcsecond over
//! -2000..+6000. The fast tier additionally drops every term with an
//! amplitude below [`FAST_TERM_AMPLITUDE`].

mod earth;
mod jupiter;
mod mars;
mod mercury;
mod neptune;
mod saturn;
mod uranus;
mod venus;

use super::Planet;
use crate::coordinates::angle::to360;
use crate::coordinates::Heliocentrical;
use crate::time::julian_millennia;

/// Smallest amplitude kept by the fast tier, in units of 1e-8 rad or AU
///
/// Keeps the longitude error below roughly ten arcseconds.
pub const FAST_TERM_AMPLITUDE: f64 = 1000.0;

/// Series for the three coordinates; one table per power of τ
pub(crate) struct Vsop87Series {
    pub longitude: &'static [&'static [[f64; 3]]],
    pub latitude: &'static [&'static [[f64; 3]]],
    pub radius: &'static [&'static [[f64; 3]]],
}

/// Evaluate `Σ τⁿ Σ A cos(B + Cτ)` for one coordinate
fn evaluate(tables: &[&[[f64; 3]]], tau: f64, min_amplitude: f64) -> f64 {
    let mut power = 1.0;
    let mut total = 0.0;
    for table in tables {
        let sum: f64 = table
            .iter()
            .take_while(|term| term[0] >= min_amplitude)
            .map(|&[a, b, c]| a * (b + c * tau).cos())
            .sum();
        total += sum * power;
        power *= tau;
    }
    total * 1e-8
}

fn series(planet: Planet) -> Option<&'static Vsop87Series> {
    match planet {
        Planet::Mercury => Some(&mercury::MERCURY),
        Planet::Venus => Some(&venus::VENUS),
        Planet::Earth => Some(&earth::EARTH),
        Planet::Mars => Some(&mars::MARS),
        Planet::Jupiter => Some(&jupiter::JUPITER),
        Planet::Saturn => Some(&saturn::SATURN),
        Planet::Uranus => Some(&uranus::URANUS),
        Planet::Neptune => Some(&neptune::NEPTUNE),
        Planet::Pluto => None,
    }
}

/// Heliocentric coordinates of a major planet, or `None` for Pluto
pub fn heliocentric(planet: Planet, jde: f64, high_precision: bool) -> Option<Heliocentrical> {
    let s = series(planet)?;
    let tau = julian_millennia(jde);
    let min_amplitude = if high_precision { 0.0 } else { FAST_TERM_AMPLITUDE };

    Some(Heliocentrical::new(
        to360(evaluate(s.longitude, tau, min_amplitude).to_degrees()),
        evaluate(s.latitude, tau, min_amplitude).to_degrees(),
        evaluate(s.radius, tau, min_amplitude),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tables_sorted_by_amplitude() {
        // The fast tier relies on descending amplitudes within each table
        for planet in Planet::VSOP87 {
            let s = series(planet).unwrap();
            for tables in [s.longitude, s.latitude, s.radius] {
                for table in tables {
                    assert!(table.windows(2).all(|w| w[0][0] >= w[1][0]));
                }
            }
        }
    }

    #[test]
    fn test_earth_1992_october_13() {
        let h = heliocentric(Planet::Earth, 2448908.5, true).unwrap();
        assert_relative_eq!(h.l, to360((-43.63484796f64).to_degrees()), epsilon = 1e-6);
        assert_relative_eq!(h.b, (-0.00000312f64).to_degrees(), epsilon = 1e-6);
        assert_relative_eq!(h.r, 0.99760775, epsilon = 1e-8);
    }

    #[test]
    fn test_venus_1992_december_20() {
        let h = heliocentric(Planet::Venus, 2448976.5, true).unwrap();
        assert_relative_eq!(h.l, 26.11428, epsilon = 1e-5);
        assert_relative_eq!(h.b, -2.62070, epsilon = 1e-5);
        assert_relative_eq!(h.r, 0.724603, epsilon = 1e-6);
    }

    #[test]
    fn test_fast_tier_close_to_full() {
        for planet in Planet::VSOP87 {
            for jde in [2415020.0, 2451545.0, 2469807.5] {
                let full = heliocentric(planet, jde, true).unwrap();
                let fast = heliocentric(planet, jde, false).unwrap();
                let dl = crate::coordinates::angle::to180(full.l - fast.l).abs() * 3600.0;
                let db = (full.b - fast.b).abs() * 3600.0;
                assert!(dl < 10.0, "{:?} longitude off by {}″", planet, dl);
                assert!(db < 10.0, "{:?} latitude off by {}″", planet, db);
                assert!((full.r - fast.r).abs() / full.r < 1e-4);
            }
        }
    }
}
