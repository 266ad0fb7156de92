//! Mutual conjunctions in right ascension
//!
//! The scan keeps a window of five consecutive samples of every body. When
//! the right-ascension difference of a pair changes sign between the middle
//! sample and the next one, the crossing is refined by bisection on the
//! Lagrange polynomial through the five differences. Separation and
//! magnitudes are interpolated the same way at the crossing.

use std::collections::VecDeque;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::celestial::CelestialObject;
use crate::config::CalculationSettings;
use crate::context::SkyContext;
use crate::coordinates::angle::{align_angles, to180};
use crate::coordinates::Equatorial;
use crate::earthlib::GeoLocation;
use crate::ephemeris::{CancelFlag, DateRange};
use crate::interpolation::{bisect, lagrange};
use crate::planetlib::Planet;
use crate::{Result, SkyError};

/// Right-ascension difference at which a crossing is accepted, degrees
pub const CONJUNCTION_PRECISION: f64 = 1e-6;

/// Bisection cap for one crossing
pub const MAX_BISECTION_ITERATIONS: usize = 100;

const WINDOW: usize = 5;
const ABSCISSAE: [f64; WINDOW] = [0.0, 1.0, 2.0, 3.0, 4.0];

/// Differences larger than this are a wrap of the opposite point, not a crossing
const MAX_CROSSING_DIFFERENCE: f64 = 90.0;

/// Side on which the first body of a pair passes the second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassDirection {
    North,
    South,
}

/// What the scan needs to know about a body at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConjunctionSample {
    pub equatorial: Equatorial,
    pub magnitude: Option<f64>,
}

/// Equal right ascension of two bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conjunction<B> {
    /// Instant of the event (Julian Day, UT)
    pub julian_day: f64,
    pub bodies: (B, B),
    /// Angular separation at the event, degrees
    pub separation: f64,
    pub magnitudes: (Option<f64>, Option<f64>),
    /// Side on which the first body passes the second
    pub direction: PassDirection,
}

/// Five consecutive instants and the samples of every body at each
struct Window {
    julian_days: VecDeque<f64>,
    samples: VecDeque<Vec<ConjunctionSample>>,
}

impl Window {
    fn new() -> Self {
        Self {
            julian_days: VecDeque::with_capacity(WINDOW),
            samples: VecDeque::with_capacity(WINDOW),
        }
    }

    fn push(&mut self, julian_day: f64, samples: Vec<ConjunctionSample>) {
        if self.julian_days.len() == WINDOW {
            self.julian_days.pop_front();
            self.samples.pop_front();
        }
        self.julian_days.push_back(julian_day);
        self.samples.push_back(samples);
    }

    fn clear(&mut self) {
        self.julian_days.clear();
        self.samples.clear();
    }

    fn is_full(&self) -> bool {
        self.julian_days.len() == WINDOW
    }

    fn series<F>(&self, body: usize, f: F) -> [f64; WINDOW]
    where
        F: Fn(&ConjunctionSample) -> f64,
    {
        let mut out = [0.0; WINDOW];
        for (slot, samples) in out.iter_mut().zip(&self.samples) {
            *slot = f(&samples[body]);
        }
        out
    }

    fn magnitudes(&self, body: usize) -> Option<[f64; WINDOW]> {
        let mut out = [0.0; WINDOW];
        for (slot, samples) in out.iter_mut().zip(&self.samples) {
            *slot = samples[body].magnitude?;
        }
        Some(out)
    }

    /// Crossing of bodies `i` and `j` between the middle sample and the next
    fn crossing<B: Copy>(&self, bodies: &[B], i: usize, j: usize, step: f64) -> Result<Option<Conjunction<B>>> {
        let mut alpha_i = self.series(i, |s| s.equatorial.alpha);
        let mut alpha_j = self.series(j, |s| s.equatorial.alpha);
        align_angles(&mut alpha_i);
        align_angles(&mut alpha_j);

        let mut diff = [0.0; WINDOW];
        for k in 0..WINDOW {
            diff[k] = to180(alpha_i[k] - alpha_j[k]);
        }
        align_angles(&mut diff);

        let (d2, d3) = (diff[2], diff[3]);
        let crosses = (d2 < 0.0 && d3 >= 0.0) || (d2 > 0.0 && d3 <= 0.0);
        if !crosses || d2.abs() > MAX_CROSSING_DIFFERENCE || d3.abs() > MAX_CROSSING_DIFFERENCE {
            return Ok(None);
        }

        let x = if d3 == 0.0 {
            3.0
        } else {
            bisect(
                |x| lagrange(&ABSCISSAE, &diff, x),
                2.0,
                3.0,
                CONJUNCTION_PRECISION,
                MAX_BISECTION_ITERATIONS,
            )?
        };

        let mut separations = [0.0; WINDOW];
        for (k, samples) in self.samples.iter().enumerate() {
            separations[k] = samples[i].equatorial.angular_separation(&samples[j].equatorial);
        }
        let interpolate = |ys: [f64; WINDOW]| lagrange(&ABSCISSAE, &ys, x);

        let middle = &self.samples[2];
        let direction = if middle[i].equatorial.delta > middle[j].equatorial.delta {
            PassDirection::North
        } else {
            PassDirection::South
        };

        Ok(Some(Conjunction {
            julian_day: self.julian_days[0] + x * step,
            bodies: (bodies[i], bodies[j]),
            separation: interpolate(separations),
            magnitudes: (
                self.magnitudes(i).map(interpolate),
                self.magnitudes(j).map(interpolate),
            ),
            direction,
        }))
    }
}

/// Scan a date range for mutual conjunctions of every pair of `bodies`
///
/// `sample` is called for each body at each step of `range`. A failed
/// sample is logged and restarts the window, so a single bad instant only
/// hides events in its neighbourhood. Ranges needing more than
/// `max_samples` steps are rejected. `progress` receives the completed
/// fraction.
pub fn scan_conjunctions<B, S, P>(
    bodies: &[B],
    range: &DateRange,
    max_samples: usize,
    mut sample: S,
    cancel: &CancelFlag,
    mut progress: P,
) -> Result<Vec<Conjunction<B>>>
where
    B: Copy,
    S: FnMut(f64, B) -> Result<ConjunctionSample>,
    P: FnMut(f64),
{
    if bodies.len() < 2 {
        return Err(SkyError::InvalidInput(
            "at least two bodies are needed for conjunctions".into(),
        ));
    }
    range.validate()?;
    let DateRange { from, to, step } = *range;

    // Pad by two steps so events near the ends sit in the middle of a window
    let steps = ((to - from) / step).floor() + 5.0;
    if steps > max_samples as f64 {
        return Err(SkyError::InvalidInput(format!(
            "scan of [{}, {}] needs {} steps, more than the limit of {}",
            from, to, steps, max_samples
        )));
    }
    let count = steps as usize;
    let start = from - 2.0 * step;

    let mut window = Window::new();
    let mut events = Vec::new();

    for n in 0..count {
        cancel.check()?;

        let julian_day = start + n as f64 * step;
        let samples: Result<Vec<_>> = bodies.iter().map(|b| sample(julian_day, *b)).collect();
        match samples {
            Ok(samples) => window.push(julian_day, samples),
            Err(e) => {
                warn!("Skipping JD {} in conjunction scan: {}", julian_day, e);
                window.clear();
            }
        }

        if window.is_full() {
            for i in 0..bodies.len() {
                for j in (i + 1)..bodies.len() {
                    if let Some(event) = window.crossing(bodies, i, j, step)? {
                        if (from..=to).contains(&event.julian_day) {
                            events.push(event);
                        }
                    }
                }
            }
        }

        progress((n + 1) as f64 / count as f64);
    }

    events.sort_by(|a, b| a.julian_day.total_cmp(&b.julian_day));
    debug!("Conjunction scan found {} events", events.len());
    Ok(events)
}

/// Mutual conjunctions in right ascension of the given planets
pub fn find_mutual_conjunctions<P>(
    planets: &[Planet],
    from: f64,
    to: f64,
    location: &GeoLocation,
    settings: &CalculationSettings,
    cancel: &CancelFlag,
    progress: P,
) -> Result<Vec<Conjunction<Planet>>>
where
    P: FnMut(f64),
{
    settings.validate()?;
    if planets.contains(&Planet::Earth) {
        return Err(SkyError::InvalidInput(
            "the Earth cannot take part in a geocentric conjunction".into(),
        ));
    }

    // One context per instant, shared by every planet sampled there
    let mut current: Option<SkyContext> = None;
    let sample = |julian_day: f64, planet: Planet| -> Result<ConjunctionSample> {
        let ctx = match current.take() {
            Some(ctx) if ctx.julian_day() == julian_day => ctx,
            _ => SkyContext::with_settings(julian_day, *location, settings.clone()),
        };
        let result = planet.equatorial(&ctx).and_then(|equatorial| {
            Ok(ConjunctionSample {
                equatorial,
                magnitude: planet.magnitude(&ctx)?,
            })
        });
        current = Some(ctx);
        result
    };

    scan_conjunctions(
        planets,
        &DateRange::new(from, to, settings.conjunction_step_days),
        settings.scan_max_samples,
        sample,
        cancel,
        progress,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const T0: f64 = 2451545.0;
    const LIMIT: usize = 1000;

    /// Body 0 moves one degree a day, body 1 half a degree, one degree apart in declination
    fn linear(alpha0: f64) -> impl FnMut(f64, u8) -> Result<ConjunctionSample> {
        move |jd, body| {
            let t = jd - T0;
            let (alpha, delta, magnitude) = match body {
                0 => (alpha0 + t, 1.0, 2.0 + 0.01 * t),
                _ => (alpha0 + 5.0 + 0.5 * t, 0.0, 1.0),
            };
            Ok(ConjunctionSample {
                equatorial: Equatorial::new(alpha, delta),
                magnitude: Some(magnitude),
            })
        }
    }

    fn days(n: f64) -> DateRange {
        DateRange::new(T0, T0 + n, 1.0)
    }

    fn scan<S>(range: DateRange, sample: S) -> Result<Vec<Conjunction<u8>>>
    where
        S: FnMut(f64, u8) -> Result<ConjunctionSample>,
    {
        scan_conjunctions(&[0u8, 1], &range, LIMIT, sample, &CancelFlag::new(), |_| {})
    }

    #[test]
    fn test_linear_crossing() {
        let events = scan(days(20.0), linear(10.0)).unwrap();
        assert_eq!(events.len(), 1);
        let e = events[0];
        assert_relative_eq!(e.julian_day, T0 + 10.0, epsilon = 1e-5);
        assert_relative_eq!(e.separation, 1.0, epsilon = 1e-3);
        assert_eq!(e.direction, PassDirection::North);
        assert_eq!(e.bodies, (0, 1));
        assert_relative_eq!(e.magnitudes.0.unwrap(), 2.1, epsilon = 1e-6);
    }

    #[test]
    fn test_crossing_across_zero_hours() {
        let events = scan(days(20.0), linear(355.0)).unwrap();
        assert_eq!(events.len(), 1);
        assert_relative_eq!(events[0].julian_day, T0 + 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_events_outside_range_dropped() {
        let events = scan(days(8.0), linear(10.0)).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_failed_sample_resets_window() {
        let mut inner = linear(10.0);
        let flaky = |jd: f64, body: u8| {
            if (jd - (T0 + 10.0)).abs() < 0.5 {
                Err(SkyError::InvalidInput("no data".into()))
            } else {
                inner(jd, body)
            }
        };
        let events = scan(days(20.0), flaky).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_cancellation_and_progress() {
        let cancel = CancelFlag::new();
        let mut last = 0.0;
        scan_conjunctions(&[0u8, 1], &days(20.0), LIMIT, linear(10.0), &cancel, |f| last = f)
            .unwrap();
        assert_relative_eq!(last, 1.0);

        cancel.cancel();
        let result = scan_conjunctions(&[0u8, 1], &days(20.0), LIMIT, linear(10.0), &cancel, |_| {});
        assert_eq!(result, Err(SkyError::Cancelled));
    }

    #[test]
    fn test_unbounded_or_oversized_ranges_rejected() {
        let mut sampled = false;
        let counting = |jd: f64, body: u8| {
            sampled = true;
            linear(10.0)(jd, body)
        };
        let result = scan(DateRange::new(T0, f64::INFINITY, 1.0), counting);
        assert!(matches!(result, Err(SkyError::InvalidInput(_))));
        assert!(!sampled);

        let result = scan(DateRange::new(T0, f64::NAN, 1.0), linear(10.0));
        assert!(matches!(result, Err(SkyError::InvalidInput(_))));

        // A finite range longer than the step limit allows
        let result = scan(days(1.0e9), linear(10.0));
        assert!(matches!(result, Err(SkyError::InvalidInput(_))));
        assert!(scan(days(LIMIT as f64 - 5.0), linear(10.0)).is_ok());
    }

    #[test]
    fn test_rejects_bad_input() {
        let cancel = CancelFlag::new();
        let one_body = scan_conjunctions(&[0u8], &days(1.0), LIMIT, linear(0.0), &cancel, |_| {});
        assert!(one_body.is_err());
        assert!(scan(DateRange::new(T0, T0 + 1.0, 0.0), linear(0.0)).is_err());
        let location = GeoLocation::new(0.0, 0.0);
        let settings = CalculationSettings::default();
        assert!(find_mutual_conjunctions(
            &[Planet::Earth, Planet::Mars],
            T0,
            T0 + 10.0,
            &location,
            &settings,
            &cancel,
            |_| {}
        )
        .is_err());
    }
}
