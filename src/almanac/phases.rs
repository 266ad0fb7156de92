//! Principal phases of the Moon
//!
//! A phase is the instant at which the apparent longitude of the Moon
//! exceeds the Sun's by 0, 90, 180 or 270 degrees. The search starts from
//! the mean lunation nearest the requested date and steps with the mean
//! rate of the elongation until the residual vanishes.

use std::fmt;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::celestial::sun;
use crate::constants::{DAY_S, SYNODIC_MONTH};
use crate::coordinates::angle::to180;
use crate::ephemeris::CancelFlag;
use crate::{moonlib, nutationlib, time};
use crate::{Result, SkyError};

/// Iteration cap for one phase instant
pub const MAX_PHASE_ITERATIONS: usize = 20;

/// Refinement stops when a step falls below this many days
const CONVERGENCE_DAYS: f64 = 1e-6;

/// New moon of 2000 January 6 (JDE), the origin of lunation numbers
const LUNATION_EPOCH: f64 = 2451550.09766;

/// Mean daily increase of the Moon-Sun elongation, degrees
const ELONGATION_RATE: f64 = 360.0 / SYNODIC_MONTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LunarPhase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl LunarPhase {
    pub const ALL: [LunarPhase; 4] = [
        LunarPhase::New,
        LunarPhase::FirstQuarter,
        LunarPhase::Full,
        LunarPhase::LastQuarter,
    ];

    /// Elongation in longitude at the phase, degrees
    pub fn elongation(&self) -> f64 {
        90.0 * self.quarter()
    }

    fn quarter(&self) -> f64 {
        *self as u8 as f64
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LunarPhase::New => "New Moon",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::Full => "Full Moon",
            LunarPhase::LastQuarter => "Last Quarter",
        })
    }
}

/// A phase and when it happens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub phase: LunarPhase,
    /// Julian Ephemeris Day
    pub jde: f64,
    /// Julian Day in UT
    pub julian_day: f64,
}

impl PhaseEvent {
    fn new(phase: LunarPhase, jde: f64) -> Self {
        Self {
            phase,
            jde,
            julian_day: jde - time::delta_t(jde) / DAY_S,
        }
    }
}

/// Lunation number of the mean phase nearest `jde`
fn nearest_lunation(phase: LunarPhase, jde: f64) -> f64 {
    let offset = phase.quarter() / 4.0;
    ((jde - LUNATION_EPOCH) / SYNODIC_MONTH - offset).round() + offset
}

/// Apparent elongation in longitude of the Moon from the Sun, degrees
fn elongation(jde: f64, high_precision: bool) -> Result<f64> {
    let moon = moonlib::geocentric(jde).lambda + nutationlib::nutation_elements(jde).delta_psi;
    Ok(moon - sun::apparent_longitude(jde, high_precision)?)
}

fn refine(phase: LunarPhase, mut jde: f64, high_precision: bool) -> Result<f64> {
    for iteration in 0..MAX_PHASE_ITERATIONS {
        let residual = to180(elongation(jde, high_precision)? - phase.elongation());
        let step = residual / ELONGATION_RATE;
        jde -= step;
        trace!("{}: iteration {} moved {:.2e} d", phase, iteration, step);
        if step.abs() < CONVERGENCE_DAYS {
            return Ok(jde);
        }
    }
    Err(SkyError::NoConvergence {
        algorithm: "lunar phase",
        iterations: MAX_PHASE_ITERATIONS,
    })
}

/// Instant (JDE) of the given phase in the lunation nearest `near_jde`
pub fn phase_instant(phase: LunarPhase, near_jde: f64, high_precision: bool) -> Result<f64> {
    let k = nearest_lunation(phase, near_jde);
    refine(phase, LUNATION_EPOCH + k * SYNODIC_MONTH, high_precision)
}

/// Every principal phase between two Julian Ephemeris Days, in time order
///
/// A phase whose refinement fails is logged and left out; the rest of the
/// range is still searched. `progress` receives the completed fraction and
/// the search stops with `SkyError::Cancelled` once `cancel` is set.
pub fn phases_between<P>(
    from_jde: f64,
    to_jde: f64,
    high_precision: bool,
    cancel: &CancelFlag,
    progress: P,
) -> Result<Vec<PhaseEvent>>
where
    P: FnMut(f64),
{
    scan_phases(
        from_jde,
        to_jde,
        |phase, mean| refine(phase, mean, high_precision),
        cancel,
        progress,
    )
}

fn scan_phases<R, P>(
    from_jde: f64,
    to_jde: f64,
    mut refine: R,
    cancel: &CancelFlag,
    mut progress: P,
) -> Result<Vec<PhaseEvent>>
where
    R: FnMut(LunarPhase, f64) -> Result<f64>,
    P: FnMut(f64),
{
    if !(from_jde.is_finite() && to_jde.is_finite()) || to_jde < from_jde {
        return Err(SkyError::InvalidInput(format!(
            "invalid phase range [{}, {}]",
            from_jde, to_jde
        )));
    }

    // Quarter lunations, starting one before the range to catch the edge
    let first = ((from_jde - LUNATION_EPOCH) / SYNODIC_MONTH * 4.0).floor() as i64 - 1;
    let last = ((to_jde - LUNATION_EPOCH) / SYNODIC_MONTH * 4.0).ceil() as i64 + 1;
    let total = (last - first + 1) as f64;

    let mut events = Vec::new();
    for (done, quarter) in (first..=last).enumerate() {
        cancel.check()?;

        let phase = LunarPhase::ALL[quarter.rem_euclid(4) as usize];
        let mean = LUNATION_EPOCH + quarter as f64 / 4.0 * SYNODIC_MONTH;
        match refine(phase, mean) {
            Ok(jde) if (from_jde..=to_jde).contains(&jde) => {
                events.push(PhaseEvent::new(phase, jde))
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping {} near JDE {:.1}: {}", phase, mean, e),
        }

        progress((done + 1) as f64 / total);
    }

    debug!("{} lunar phases in [{}, {}]", events.len(), from_jde, to_jde);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_moon_1977() {
        // Meeus example 49.a: 1977 February 18, 3h37m42s TD
        let jde = phase_instant(LunarPhase::New, 2443190.0, true).unwrap();
        assert_relative_eq!(jde, 2443192.65118, epsilon = 1e-3);
    }

    #[test]
    fn test_full_moon_2024() {
        // 2024 January 25, 17:54 UT
        let jde = phase_instant(LunarPhase::Full, 2460330.0, true).unwrap();
        let event = PhaseEvent::new(LunarPhase::Full, jde);
        assert_relative_eq!(event.julian_day, 2460335.2458, epsilon = 2e-3);
    }

    #[test]
    fn test_phases_of_2024() {
        let from = crate::time::julian_day(2024, 1, 1.0);
        let to = crate::time::julian_day(2025, 1, 1.0);
        let mut fractions = Vec::new();
        let events =
            phases_between(from, to, false, &CancelFlag::new(), |f| fractions.push(f)).unwrap();
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));
        assert_relative_eq!(*fractions.last().unwrap(), 1.0);

        let count = |phase| events.iter().filter(|e| e.phase == phase).count();
        assert_eq!(count(LunarPhase::New), 13);
        assert_eq!(count(LunarPhase::Full), 12);

        for pair in events.windows(2) {
            let gap = pair[1].jde - pair[0].jde;
            assert!((6.0..9.0).contains(&gap), "{} then {}: {}", pair[0].phase, pair[1].phase, gap);
            assert_eq!(
                LunarPhase::ALL[(pair[0].phase as usize + 1) % 4],
                pair[1].phase
            );
        }
    }

    #[test]
    fn test_failed_phase_is_skipped() {
        // Mean phases only, with the full moons failing
        let mean_or_fail = |phase: LunarPhase, mean: f64| match phase {
            LunarPhase::Full => Err(SkyError::NoConvergence {
                algorithm: "lunar phase",
                iterations: MAX_PHASE_ITERATIONS,
            }),
            _ => Ok(mean),
        };
        let events =
            scan_phases(2451545.0, 2451545.0 + 90.0, mean_or_fail, &CancelFlag::new(), |_| {})
                .unwrap();
        assert!(events.len() >= 8);
        assert!(events.iter().all(|e| e.phase != LunarPhase::Full));
        assert!(events.iter().any(|e| e.phase == LunarPhase::LastQuarter));
    }

    #[test]
    fn test_cancelled_search() {
        let cancel = CancelFlag::new();
        let mut calls = 0;
        let result = scan_phases(
            2451545.0,
            2451545.0 + 365.0,
            |_, mean| {
                calls += 1;
                if calls == 5 {
                    cancel.cancel();
                }
                Ok(mean)
            },
            &cancel,
            |_| {},
        );
        assert_eq!(result, Err(SkyError::Cancelled));
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_invalid_range() {
        let cancel = CancelFlag::new();
        assert!(phases_between(2451545.0, 2451500.0, false, &cancel, |_| {}).is_err());
        assert!(phases_between(2451545.0, f64::INFINITY, false, &cancel, |_| {}).is_err());
    }
}
