//! Rising, transit and setting of a body on one local day
//!
//! The body's apparent coordinates are sampled three times, by default at
//! local midnight, noon and the following midnight, or once a day at 0h TD
//! as almanacs tabulate them. Event times are found with the interpolation
//! method of Meeus (chapter 15) and refined until they move by less than a
//! second. Times are fractions of the day counted from local midnight.

use serde::{Deserialize, Serialize};

use crate::constants::DAY_S;
use crate::coordinates::angle::{align_angles, to180, to360};
use crate::coordinates::Equatorial;
use crate::earthlib::GeoLocation;
use crate::interpolation::interpolate3;
use crate::{Result, SkyError};

/// Altitude of a point source at rising or setting (refraction only), degrees
pub const STANDARD_ALTITUDE: f64 = -0.5667;

/// Refinement cap for each of the three events
pub const MAX_RTS_ITERATIONS: usize = 10;

/// Refinement stops when a correction is below one second of time
const CONVERGENCE_DAYS: f64 = 1.0 / DAY_S;

/// Sidereal rate: degrees of sidereal time per day of solar time
const SIDEREAL_RATE: f64 = 360.985647;

/// Geometric altitude of the Sun's or Moon's center at rise and set
///
/// `semidiameter` and `parallax` are in degrees.
pub fn disk_standard_altitude(semidiameter: f64, parallax: f64) -> f64 {
    STANDARD_ALTITUDE - semidiameter + parallax
}

/// Where the three samples fall relative to the start of the day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleGrid {
    /// Day fraction of the middle sample
    pub middle: f64,
    /// Spacing of the samples in days
    pub interval: f64,
    /// ΔT in seconds when the samples are tabulated in dynamical time
    pub delta_t: f64,
}

impl SampleGrid {
    /// Midnight, noon and the next midnight of the day, in UT
    pub const HALF_DAY: SampleGrid = SampleGrid {
        middle: 0.5,
        interval: 0.5,
        delta_t: 0.0,
    };

    /// 0h TD of the previous, current and next day
    pub fn daily(delta_t: f64) -> Self {
        Self {
            middle: 0.0,
            interval: 1.0,
            delta_t,
        }
    }

    /// Interpolation factor of day fraction `m`, zero at the middle sample
    fn factor(&self, m: f64) -> f64 {
        (m + self.delta_t / DAY_S - self.middle) / self.interval
    }

    fn validate(&self) -> Result<()> {
        let finite = self.middle.is_finite() && self.delta_t.is_finite();
        if !finite || !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(SkyError::InvalidInput(format!(
                "invalid sample grid {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// How a body behaves with respect to the horizon on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityState {
    /// Rises and sets
    Regular,
    /// Stays above the horizon all day
    Circumpolar,
    /// Stays below the horizon all day
    NeverRises,
}

/// Rise, transit and set of one local day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiseTransitSet {
    /// Fraction of the day of rising; `None` unless `state` is `Regular`
    pub rise: Option<f64>,
    /// Fraction of the day of the upper transit
    pub transit: f64,
    /// Fraction of the day of setting; `None` unless `state` is `Regular`
    pub set: Option<f64>,
    /// Azimuth at rising, degrees from south
    pub rise_azimuth: Option<f64>,
    /// Azimuth at setting, degrees from south
    pub set_azimuth: Option<f64>,
    /// Altitude at upper transit, degrees
    pub transit_altitude: f64,
    /// Time spent above the horizon, fraction of a day
    pub duration: f64,
    pub state: VisibilityState,
}

impl RiseTransitSet {
    /// Julian Day of an event given the JD of local midnight
    pub fn julian_day(midnight: f64, fraction: f64) -> f64 {
        midnight + fraction
    }
}

struct Samples<'a> {
    alpha: [f64; 3],
    delta: [f64; 3],
    grid: SampleGrid,
    location: &'a GeoLocation,
    theta0: f64,
}

impl Samples<'_> {
    /// Hour angle, declination and altitude at fraction `m` of the day
    fn at(&self, m: f64) -> (f64, f64, f64) {
        let n = self.grid.factor(m);
        let alpha = interpolate3(self.alpha, n);
        let delta = interpolate3(self.delta, n);
        let theta = self.theta0 + SIDEREAL_RATE * m;
        let h = to180(theta - self.location.longitude - alpha);

        let phi = self.location.latitude.to_radians();
        let (sin_d, cos_d) = delta.to_radians().sin_cos();
        let altitude = (phi.sin() * sin_d + phi.cos() * cos_d * h.to_radians().cos())
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees();
        (h, delta, altitude)
    }

    fn refine_transit(&self, mut m: f64) -> Result<f64> {
        for _ in 0..MAX_RTS_ITERATIONS {
            let (h, _, _) = self.at(m);
            let dm = -h / 360.0;
            m += dm;
            if dm.abs() < CONVERGENCE_DAYS {
                return Ok(m);
            }
        }
        Err(SkyError::NoConvergence {
            algorithm: "transit refinement",
            iterations: MAX_RTS_ITERATIONS,
        })
    }

    fn refine_crossing(&self, mut m: f64, h0: f64) -> Result<f64> {
        let cos_phi = self.location.latitude.to_radians().cos();
        for _ in 0..MAX_RTS_ITERATIONS {
            let (h, delta, altitude) = self.at(m);
            let dm = (altitude - h0)
                / (360.0 * delta.to_radians().cos() * cos_phi * h.to_radians().sin());
            m += dm;
            if dm.abs() < CONVERGENCE_DAYS {
                return Ok(m);
            }
        }
        Err(SkyError::NoConvergence {
            algorithm: "rise/set refinement",
            iterations: MAX_RTS_ITERATIONS,
        })
    }

    /// Azimuth from south at fraction `m`
    fn azimuth(&self, m: f64) -> f64 {
        let (h, delta, _) = self.at(m);
        let phi = self.location.latitude.to_radians();
        let h = h.to_radians();
        to360(
            h.sin()
                .atan2(h.cos() * phi.sin() - delta.to_radians().tan() * phi.cos())
                .to_degrees(),
        )
    }
}

/// Wrap a day fraction into [0, 1)
fn day_fraction(m: f64) -> f64 {
    m.rem_euclid(1.0)
}

/// Rise, transit and set for one local day
///
/// # Arguments
///
/// * `samples` - Apparent coordinates at the three instants of `grid`
/// * `grid` - Placement of the samples on the day
/// * `location` - Observer, longitude positive west
/// * `theta0` - Apparent sidereal time at Greenwich at the start of the day, degrees
/// * `h0` - Altitude of the body's center at rising and setting, degrees
pub fn rise_transit_set(
    samples: [Equatorial; 3],
    grid: SampleGrid,
    location: &GeoLocation,
    theta0: f64,
    h0: f64,
) -> Result<RiseTransitSet> {
    grid.validate()?;
    if !(-89.99..=89.99).contains(&location.latitude) {
        return Err(SkyError::InvalidInput(format!(
            "rise and set are undefined at latitude {}",
            location.latitude
        )));
    }

    let mut alpha = [samples[0].alpha, samples[1].alpha, samples[2].alpha];
    align_angles(&mut alpha);
    let samples = Samples {
        alpha,
        delta: [samples[0].delta, samples[1].delta, samples[2].delta],
        grid,
        location,
        theta0,
    };

    let m0 = day_fraction((alpha[1] + location.longitude - theta0) / 360.0);
    let transit = samples.refine_transit(m0)?;
    let (_, _, transit_altitude) = samples.at(transit);
    let transit = day_fraction(transit);

    let phi = location.latitude.to_radians();
    let delta = samples.delta[1].to_radians();
    let cos_h0 = (h0.to_radians().sin() - phi.sin() * delta.sin()) / (phi.cos() * delta.cos());

    let mut result = RiseTransitSet {
        rise: None,
        transit,
        set: None,
        rise_azimuth: None,
        set_azimuth: None,
        transit_altitude,
        duration: 0.0,
        state: VisibilityState::Regular,
    };

    if cos_h0 > 1.0 {
        result.state = VisibilityState::NeverRises;
        return Ok(result);
    }
    if cos_h0 < -1.0 {
        result.state = VisibilityState::Circumpolar;
        result.duration = 1.0;
        return Ok(result);
    }

    let semi_arc = cos_h0.acos().to_degrees() / 360.0;
    let rise = samples.refine_crossing(day_fraction(m0 - semi_arc), h0)?;
    let set = samples.refine_crossing(day_fraction(m0 + semi_arc), h0)?;

    result.rise_azimuth = Some(samples.azimuth(rise));
    result.set_azimuth = Some(samples.azimuth(set));
    result.duration = day_fraction(set - rise);
    result.rise = Some(day_fraction(rise));
    result.set = Some(day_fraction(set));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn minutes(fraction: f64) -> f64 {
        fraction * 1440.0
    }

    fn boston() -> GeoLocation {
        GeoLocation::new(71.0833, 42.3333)
    }

    /// Venus at 0h TD on 1988 March 19, 20 and 21 (Meeus, example 15.a)
    fn venus_daily() -> [Equatorial; 3] {
        [
            Equatorial::new(40.68021, 18.04761),
            Equatorial::new(41.73129, 18.44092),
            Equatorial::new(42.78204, 18.82742),
        ]
    }

    /// The same table interpolated to 0h, 12h and 24h of March 20
    fn venus_half_day() -> [Equatorial; 3] {
        [
            Equatorial::new(41.73129, 18.44092),
            Equatorial::new(42.25671, 18.63502),
            Equatorial::new(42.78204, 18.82742),
        ]
    }

    fn assert_meeus_15a(rts: &RiseTransitSet) {
        // Rising 12h25m, transit 19h41m, setting 2h55m UT
        assert_eq!(rts.state, VisibilityState::Regular);
        assert_relative_eq!(minutes(rts.rise.unwrap()), 12.0 * 60.0 + 25.0, epsilon = 1.0);
        assert_relative_eq!(minutes(rts.transit), 19.0 * 60.0 + 41.0, epsilon = 1.0);
        assert_relative_eq!(minutes(rts.set.unwrap()), 2.0 * 60.0 + 55.0, epsilon = 1.0);
    }

    #[test]
    fn test_venus_at_boston() {
        let rts = rise_transit_set(
            venus_daily(),
            SampleGrid::daily(56.0),
            &boston(),
            177.74208,
            STANDARD_ALTITUDE,
        )
        .unwrap();

        assert_meeus_15a(&rts);
        assert!(rts.rise_azimuth.unwrap() > 180.0, "Venus rises in the east");
        assert!(rts.set_azimuth.unwrap() < 180.0, "Venus sets in the west");
    }

    #[test]
    fn test_half_day_grid_matches_daily_table() {
        let daily = rise_transit_set(
            venus_daily(),
            SampleGrid::daily(0.0),
            &boston(),
            177.74208,
            STANDARD_ALTITUDE,
        )
        .unwrap();
        let half_day = rise_transit_set(
            venus_half_day(),
            SampleGrid::HALF_DAY,
            &boston(),
            177.74208,
            STANDARD_ALTITUDE,
        )
        .unwrap();

        assert_meeus_15a(&half_day);
        assert_relative_eq!(minutes(half_day.transit), minutes(daily.transit), epsilon = 0.1);
        assert_relative_eq!(
            minutes(half_day.rise.unwrap()),
            minutes(daily.rise.unwrap()),
            epsilon = 0.1
        );
        assert_relative_eq!(
            minutes(half_day.set.unwrap()),
            minutes(daily.set.unwrap()),
            epsilon = 0.1
        );
    }

    #[test]
    fn test_transit_altitude() {
        let rts = rise_transit_set(
            venus_daily(),
            SampleGrid::daily(56.0),
            &boston(),
            177.74208,
            STANDARD_ALTITUDE,
        )
        .unwrap();
        // Meridian altitude is 90 - φ + δ, with δ = 18.7585 at transit
        assert_relative_eq!(rts.transit_altitude, 90.0 - 42.3333 + 18.7585, epsilon = 0.01);
        assert!(rts.duration > 0.5 && rts.duration < 0.7);
    }

    #[test]
    fn test_bad_grid_is_rejected() {
        let grid = SampleGrid {
            interval: 0.0,
            ..SampleGrid::HALF_DAY
        };
        let result = rise_transit_set(venus_daily(), grid, &boston(), 177.74208, STANDARD_ALTITUDE);
        assert!(matches!(result, Err(SkyError::InvalidInput(_))));
    }

    #[test]
    fn test_circumpolar_and_never_rises() {
        let oslo = GeoLocation::new(-10.75, 59.91);
        let polaris = [Equatorial::new(37.95, 89.26); 3];
        let rts = rise_transit_set(polaris, SampleGrid::HALF_DAY, &oslo, 100.0, STANDARD_ALTITUDE).unwrap();
        assert_eq!(rts.state, VisibilityState::Circumpolar);
        assert!(rts.rise.is_none() && rts.set.is_none());
        assert_relative_eq!(rts.duration, 1.0);

        let canopus = [Equatorial::new(95.99, -52.70); 3];
        let rts = rise_transit_set(canopus, SampleGrid::HALF_DAY, &oslo, 100.0, STANDARD_ALTITUDE).unwrap();
        assert_eq!(rts.state, VisibilityState::NeverRises);
        assert!(rts.transit_altitude < 0.0);
    }

    #[test]
    fn test_right_ascension_wrap() {
        // Samples straddling 0h must not confuse the interpolation
        let samples = [
            Equatorial::new(359.5, 0.0),
            Equatorial::new(0.0, 0.0),
            Equatorial::new(0.5, 0.0),
        ];
        let greenwich = GeoLocation::new(0.0, 51.5);
        let rts = rise_transit_set(samples, SampleGrid::HALF_DAY, &greenwich, 0.0, STANDARD_ALTITUDE).unwrap();
        assert!((0.0..1.0).contains(&rts.transit));
        assert!((0.0..1.0).contains(&rts.rise.unwrap()));
        assert!((0.0..1.0).contains(&rts.set.unwrap()));
        // An equatorial body is up for about half a day
        assert_relative_eq!(rts.duration, 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_pole_is_rejected() {
        let pole = GeoLocation::new(0.0, 90.0);
        let result = rise_transit_set(venus_daily(), SampleGrid::HALF_DAY, &pole, 0.0, STANDARD_ALTITUDE);
        assert!(result.is_err());
    }
}
