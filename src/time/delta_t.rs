//! ΔT = TT − UT
//!
//! Piecewise polynomial expressions of Espenak and Meeus, valid from
//! -1999 to +3000, with the long-term parabola outside that range.

use super::decimal_year;
use crate::constants::DAY_S;

/// Evaluate `c[0] + c[1] t + c[2] t² + ...`
fn poly(t: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Long-term parabola centred on 1820
fn parabola(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// ΔT in seconds for a decimal year
pub fn delta_t_for_year(year: f64) -> f64 {
    match year {
        y if y < -500.0 => parabola(y),
        y if y < 500.0 => poly(
            y / 100.0,
            &[10583.6, -1014.41, 33.78311, -5.952053, -0.1798452, 0.022174192, 0.0090316521],
        ),
        y if y < 1600.0 => poly(
            (y - 1000.0) / 100.0,
            &[1574.2, -556.01, 71.23472, 0.319781, -0.8503463, -0.005050998, 0.0083572073],
        ),
        y if y < 1700.0 => poly(y - 1600.0, &[120.0, -0.9808, -0.01532, 1.0 / 7129.0]),
        y if y < 1800.0 => poly(
            y - 1700.0,
            &[8.83, 0.1603, -0.0059285, 0.00013336, -1.0 / 1_174_000.0],
        ),
        y if y < 1860.0 => poly(
            y - 1800.0,
            &[
                13.72,
                -0.332447,
                0.0068612,
                0.0041116,
                -0.00037436,
                0.0000121272,
                -0.0000001699,
                0.000000000875,
            ],
        ),
        y if y < 1900.0 => poly(
            y - 1860.0,
            &[7.62, 0.5737, -0.251754, 0.01680668, -0.0004473624, 1.0 / 233_174.0],
        ),
        y if y < 1920.0 => poly(
            y - 1900.0,
            &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197],
        ),
        y if y < 1941.0 => poly(y - 1920.0, &[21.20, 0.84493, -0.076100, 0.0020936]),
        y if y < 1961.0 => poly(y - 1950.0, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0]),
        y if y < 1986.0 => poly(y - 1975.0, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0]),
        y if y < 2005.0 => poly(
            y - 2000.0,
            &[63.86, 0.3345, -0.060374, 0.0017275, 0.000651814, 0.00002373599],
        ),
        y if y < 2050.0 => poly(y - 2000.0, &[62.92, 0.32217, 0.005589]),
        y if y < 2150.0 => parabola(y) - 0.5628 * (2150.0 - y),
        y => parabola(y),
    }
}

/// ΔT in seconds at a Julian day
pub fn delta_t(jd: f64) -> f64 {
    delta_t_for_year(decimal_year(jd))
}

/// Julian Ephemeris Day (TT) for a Julian day in UT
pub fn jde(jd_ut: f64) -> f64 {
    jd_ut + delta_t(jd_ut) / DAY_S
}
