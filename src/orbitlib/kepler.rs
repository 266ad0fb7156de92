//! Solutions of Kepler's equation for the three conic sections

use crate::constants::GAUSS_K;
use crate::{Result, SkyError};

/// Iteration cap shared by the Newton solvers
pub const MAX_KEPLER_ITERATIONS: usize = 50;

/// Convergence threshold on the anomaly, radians
const ANOMALY_TOLERANCE: f64 = 1e-12;

/// Eccentric anomaly E for mean anomaly `m` (radians), `0 <= e < 1`
///
/// Newton-Raphson on `E - e sin E - M = 0`, starting from `M` (or `π` for
/// high eccentricities where the first step would overshoot).
pub fn solve_elliptic(e: f64, m: f64) -> Result<f64> {
    let m = m.rem_euclid(std::f64::consts::TAU);
    let mut ecc = if e > 0.8 { std::f64::consts::PI } else { m };

    for _ in 0..MAX_KEPLER_ITERATIONS {
        let step = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
        ecc -= step;
        if step.abs() < ANOMALY_TOLERANCE {
            return Ok(ecc);
        }
    }

    Err(SkyError::NoConvergence {
        algorithm: "elliptic Kepler equation",
        iterations: MAX_KEPLER_ITERATIONS,
    })
}

/// Hyperbolic anomaly H for mean anomaly `m` (radians), `e > 1`
///
/// Newton-Raphson on `e sinh H - H - M = 0`.
pub fn solve_hyperbolic(e: f64, m: f64) -> Result<f64> {
    let mut h = (2.0 * m / e).asinh();

    for _ in 0..MAX_KEPLER_ITERATIONS {
        let step = (e * h.sinh() - h - m) / (e * h.cosh() - 1.0);
        h -= step;
        if step.abs() < ANOMALY_TOLERANCE * h.abs().max(1.0) {
            return Ok(h);
        }
    }

    Err(SkyError::NoConvergence {
        algorithm: "hyperbolic Kepler equation",
        iterations: MAX_KEPLER_ITERATIONS,
    })
}

/// True anomaly (degrees) and radius vector (AU) on a parabola
///
/// Barker's equation solved in closed form. `q` is the perihelion distance
/// and `dt` the time since perihelion in days.
pub fn solve_parabolic(q: f64, dt: f64) -> (f64, f64) {
    let w = 3.0 * GAUSS_K / (2.0 * q * q * q).sqrt() * dt;
    let y = (0.5 * w + (0.25 * w * w + 1.0).sqrt()).cbrt();
    let s = y - 1.0 / y;
    let nu = 2.0 * s.atan();
    (nu.to_degrees(), q * (1.0 + s * s))
}

/// True anomaly in degrees from the eccentric anomaly
pub fn elliptic_true_anomaly(e: f64, ecc_anomaly: f64) -> f64 {
    let factor = ((1.0 + e) / (1.0 - e)).sqrt();
    (2.0 * (factor * (ecc_anomaly / 2.0).tan()).atan()).to_degrees()
}

/// True anomaly in degrees from the hyperbolic anomaly
pub fn hyperbolic_true_anomaly(e: f64, h: f64) -> f64 {
    let factor = ((e + 1.0) / (e - 1.0)).sqrt();
    (2.0 * (factor * (h / 2.0).tanh()).atan()).to_degrees()
}
