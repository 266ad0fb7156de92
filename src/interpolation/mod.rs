//! Interpolation and root finding on tabulated values

use crate::{Result, SkyError};

/// Lagrange polynomial through the points `(xs[i], ys[i])`, evaluated at `x`
///
/// The slices must have the same non-zero length and distinct abscissae.
pub fn lagrange(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let mut sum = 0.0;
    for (i, (&xi, &yi)) in xs.iter().zip(ys.iter()).enumerate() {
        let mut term = yi;
        for (j, &xj) in xs.iter().enumerate() {
            if i != j {
                term *= (x - xj) / (xi - xj);
            }
        }
        sum += term;
    }
    sum
}

/// Three-point interpolation (Bessel form)
///
/// `y` holds values at equally spaced abscissae `-1, 0, 1`; `n` is the
/// interpolating factor measured from the middle value.
pub fn interpolate3(y: [f64; 3], n: f64) -> f64 {
    let a = y[1] - y[0];
    let b = y[2] - y[1];
    let c = b - a;
    y[1] + n / 2.0 * (a + b + n * c)
}

/// Locate a sign change of `f` in `[lo, hi]` by bisection
///
/// Stops when `|f(x)| < tolerance` or the bracket shrinks below 1e-12.
/// The bracket must straddle a root.
pub fn bisect<F>(mut f: F, mut lo: f64, mut hi: f64, tolerance: f64, max_iterations: usize) -> Result<f64>
where
    F: FnMut(f64) -> f64,
{
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo.signum() == f_hi.signum() {
        return Err(SkyError::InvalidInput(format!(
            "no sign change in [{}, {}]",
            lo, hi
        )));
    }

    for _ in 0..max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid.abs() < tolerance || hi - lo < 1e-12 {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(SkyError::NoConvergence {
        algorithm: "bisection",
        iterations: max_iterations,
    })
}
