//! Equinoxes and solstices
//!
//! The mean instant from the polynomials of Meeus (chapter 27) is corrected
//! by the Sun's apparent longitude until it equals a multiple of 90°.

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::celestial::sun;
use crate::{Result, SkyError};

/// Iteration cap for the longitude refinement
pub const MAX_SEASON_ITERATIONS: usize = 20;

/// Refinement stops when a correction falls below this many days
const CONVERGENCE_DAYS: f64 = 1e-5;

/// Years covered by the mean-instant polynomials
pub const YEAR_RANGE: (i32, i32) = (-1000, 3000);

/// Start of an astronomical season in the northern hemisphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::MarchEquinox,
        Season::JuneSolstice,
        Season::SeptemberEquinox,
        Season::DecemberSolstice,
    ];

    /// Apparent solar longitude at the event
    pub fn solar_longitude(&self) -> f64 {
        90.0 * self.index() as f64
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Season::MarchEquinox => "March equinox",
            Season::JuneSolstice => "June solstice",
            Season::SeptemberEquinox => "September equinox",
            Season::DecemberSolstice => "December solstice",
        })
    }
}

// Table 27.A, years -1000..1000, Y = year / 1000
const BEFORE_1000: [[f64; 5]; 4] = [
    [1721139.29189, 365242.13740, 0.06134, 0.00111, -0.00071],
    [1721233.25401, 365241.72562, -0.05323, 0.00907, 0.00025],
    [1721325.70455, 365242.49558, -0.11677, -0.00297, 0.00074],
    [1721414.39987, 365242.88257, -0.00769, -0.00933, -0.00006],
];

// Table 27.B, years 1000..3000, Y = (year - 2000) / 1000
const AFTER_1000: [[f64; 5]; 4] = [
    [2451623.80984, 365242.37404, 0.05169, -0.00411, -0.00057],
    [2451716.56767, 365241.62603, 0.00325, 0.00888, -0.00030],
    [2451810.21715, 365242.01767, -0.11575, 0.00337, 0.00078],
    [2451900.05952, 365242.74049, -0.06223, -0.00823, 0.00032],
];

/// Mean instant (JDE) of a season, before the longitude correction
pub fn mean_instant(year: i32, season: Season) -> Result<f64> {
    if year < YEAR_RANGE.0 || year > YEAR_RANGE.1 {
        return Err(SkyError::InvalidInput(format!(
            "year {} outside {}..={}",
            year, YEAR_RANGE.0, YEAR_RANGE.1
        )));
    }
    let (coefficients, y) = if year < 1000 {
        (&BEFORE_1000[season.index()], year as f64 / 1000.0)
    } else {
        (&AFTER_1000[season.index()], (year - 2000) as f64 / 1000.0)
    };
    Ok(coefficients.iter().rev().fold(0.0, |acc, c| acc * y + c))
}

/// Instant (JDE) at which the Sun's apparent longitude reaches the season's value
pub fn season_instant(year: i32, season: Season, high_precision: bool) -> Result<f64> {
    let target = season.solar_longitude().to_radians();
    let mut jde = mean_instant(year, season)?;

    for iteration in 0..MAX_SEASON_ITERATIONS {
        let lambda = sun::apparent_longitude(jde, high_precision)?.to_radians();
        let correction = 58.0 * (target - lambda).sin();
        jde += correction;
        trace!("{} {}: iteration {} moved {:.2e} d", season, year, iteration, correction);
        if correction.abs() < CONVERGENCE_DAYS {
            return Ok(jde);
        }
    }

    Err(SkyError::NoConvergence {
        algorithm: "season instant",
        iterations: MAX_SEASON_ITERATIONS,
    })
}

/// All four seasons of a year, in calendar order
pub fn seasons(year: i32, high_precision: bool) -> Result<[(Season, f64); 4]> {
    let mut out = [(Season::MarchEquinox, 0.0); 4];
    for (slot, season) in out.iter_mut().zip(Season::ALL) {
        *slot = (season, season_instant(year, season, high_precision)?);
    }
    Ok(out)
}
