//! Ephemeris tables and single-instant information
//!
//! A table is a sequence of rows, one per instant of a date range, each
//! mapping the requested quantities to formatted cells. A failure at one
//! instant is recorded in that row's cells and never aborts the range.

pub mod info;

pub use info::{InfoRow, InfoSection, InfoTable};

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::celestial::CelestialObject;
use crate::config::CalculationSettings;
use crate::context::SkyContext;
use crate::coordinates::angle::{Dms, Hms};
use crate::earthlib::GeoLocation;
use crate::{Result, SkyError};

/// Cooperative cancellation shared between a batch job and its owner
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running job to stop at its next checkpoint
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancellation has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SkyError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Quantities an ephemeris row can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EphemerisKey {
    RightAscension,
    Declination,
    EclipticLongitude,
    EclipticLatitude,
    Azimuth,
    Altitude,
    Distance,
    Magnitude,
    PhaseAngle,
    Phase,
    Elongation,
    Semidiameter,
    HorizontalParallax,
    Rise,
    Transit,
    Set,
    CentralMeridian,
    RingTilt,
}

impl EphemerisKey {
    pub const ALL: [EphemerisKey; 18] = [
        EphemerisKey::RightAscension,
        EphemerisKey::Declination,
        EphemerisKey::EclipticLongitude,
        EphemerisKey::EclipticLatitude,
        EphemerisKey::Azimuth,
        EphemerisKey::Altitude,
        EphemerisKey::Distance,
        EphemerisKey::Magnitude,
        EphemerisKey::PhaseAngle,
        EphemerisKey::Phase,
        EphemerisKey::Elongation,
        EphemerisKey::Semidiameter,
        EphemerisKey::HorizontalParallax,
        EphemerisKey::Rise,
        EphemerisKey::Transit,
        EphemerisKey::Set,
        EphemerisKey::CentralMeridian,
        EphemerisKey::RingTilt,
    ];

    /// Short identifier, also accepted by `FromStr`
    pub fn id(&self) -> &'static str {
        match self {
            EphemerisKey::RightAscension => "ra",
            EphemerisKey::Declination => "dec",
            EphemerisKey::EclipticLongitude => "lambda",
            EphemerisKey::EclipticLatitude => "beta",
            EphemerisKey::Azimuth => "az",
            EphemerisKey::Altitude => "alt",
            EphemerisKey::Distance => "dist",
            EphemerisKey::Magnitude => "mag",
            EphemerisKey::PhaseAngle => "phase-angle",
            EphemerisKey::Phase => "phase",
            EphemerisKey::Elongation => "elong",
            EphemerisKey::Semidiameter => "sd",
            EphemerisKey::HorizontalParallax => "hp",
            EphemerisKey::Rise => "rise",
            EphemerisKey::Transit => "transit",
            EphemerisKey::Set => "set",
            EphemerisKey::CentralMeridian => "cm",
            EphemerisKey::RingTilt => "ring-tilt",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            EphemerisKey::RightAscension => "Right ascension",
            EphemerisKey::Declination => "Declination",
            EphemerisKey::EclipticLongitude => "Ecliptical longitude",
            EphemerisKey::EclipticLatitude => "Ecliptical latitude",
            EphemerisKey::Azimuth => "Azimuth",
            EphemerisKey::Altitude => "Altitude",
            EphemerisKey::Distance => "Distance",
            EphemerisKey::Magnitude => "Magnitude",
            EphemerisKey::PhaseAngle => "Phase angle",
            EphemerisKey::Phase => "Phase",
            EphemerisKey::Elongation => "Elongation",
            EphemerisKey::Semidiameter => "Semidiameter",
            EphemerisKey::HorizontalParallax => "Horizontal parallax",
            EphemerisKey::Rise => "Rise",
            EphemerisKey::Transit => "Transit",
            EphemerisKey::Set => "Set",
            EphemerisKey::CentralMeridian => "Central meridian",
            EphemerisKey::RingTilt => "Ring tilt",
        }
    }

    /// How values of this key are displayed
    pub fn format_hint(&self) -> FormatHint {
        match self {
            EphemerisKey::RightAscension => FormatHint::RightAscension,
            EphemerisKey::Declination | EphemerisKey::Altitude => FormatHint::Declination,
            EphemerisKey::Distance => FormatHint::AstronomicalUnits,
            EphemerisKey::Magnitude => FormatHint::Magnitude,
            EphemerisKey::Phase => FormatHint::Fraction,
            EphemerisKey::Semidiameter => FormatHint::Arcseconds,
            EphemerisKey::Rise | EphemerisKey::Transit | EphemerisKey::Set => {
                FormatHint::LocalTime
            }
            _ => FormatHint::Degrees,
        }
    }
}

impl fmt::Display for EphemerisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EphemerisKey {
    type Err = SkyError;

    fn from_str(s: &str) -> Result<Self> {
        EphemerisKey::ALL
            .iter()
            .find(|k| k.id().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| SkyError::InvalidInput(format!("unknown ephemeris key '{}'", s)))
    }
}

/// Formatting applied to a numeric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatHint {
    /// Degrees shown as hours, minutes and seconds
    RightAscension,
    /// Signed degrees, arcminutes and arcseconds
    Declination,
    /// Decimal degrees
    Degrees,
    Magnitude,
    AstronomicalUnits,
    Kilometers,
    Days,
    /// Value in [0, 1]
    Fraction,
    Arcseconds,
    /// Hours of local civil time
    LocalTime,
    /// Julian Day
    JulianDay,
}

/// A computed number together with its display format
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisValue {
    pub value: f64,
    pub hint: FormatHint,
}

impl EphemerisValue {
    pub fn new(value: f64, hint: FormatHint) -> Self {
        Self { value, hint }
    }
}

impl fmt::Display for EphemerisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value;
        match self.hint {
            FormatHint::RightAscension => write!(f, "{}", Hms::from_degrees(v)),
            FormatHint::Declination => write!(f, "{}", Dms::from_degrees(v)),
            FormatHint::Degrees => write!(f, "{:.4}°", v),
            FormatHint::Magnitude => write!(f, "{:+.2}", v),
            FormatHint::AstronomicalUnits => write!(f, "{:.6} au", v),
            FormatHint::Kilometers => write!(f, "{:.0} km", v),
            FormatHint::Days => write!(f, "{:.2} d", v),
            FormatHint::Fraction => write!(f, "{:.3}", v),
            FormatHint::Arcseconds => write!(f, "{:.2}″", v),
            FormatHint::LocalTime => {
                let minutes = (v * 60.0).round().rem_euclid(1440.0) as u32;
                write!(f, "{:02}:{:02}", minutes / 60, minutes % 60)
            }
            FormatHint::JulianDay => write!(f, "{:.5}", v),
        }
    }
}

/// Content of one table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EphemerisCell {
    Value(EphemerisValue),
    /// Descriptive text such as a spectral class
    Text(String),
    /// The quantity does not apply (no rise for a circumpolar body, no phase for a star)
    Unavailable,
    /// The computation failed at this instant
    Failed(String),
}

impl EphemerisCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            EphemerisCell::Value(v) => Some(v.value),
            _ => None,
        }
    }
}

impl From<Result<Option<EphemerisValue>>> for EphemerisCell {
    fn from(result: Result<Option<EphemerisValue>>) -> Self {
        match result {
            Ok(Some(v)) => EphemerisCell::Value(v),
            Ok(None) => EphemerisCell::Unavailable,
            Err(e) => EphemerisCell::Failed(e.to_string()),
        }
    }
}

impl fmt::Display for EphemerisCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemerisCell::Value(v) => write!(f, "{}", v),
            EphemerisCell::Text(text) => f.write_str(text),
            EphemerisCell::Unavailable => f.write_str("—"),
            EphemerisCell::Failed(_) => f.write_str("error"),
        }
    }
}

/// Evenly spaced instants, both ends included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// First Julian Day (UT)
    pub from: f64,
    /// Last Julian Day (UT)
    pub to: f64,
    /// Step in days
    pub step: f64,
}

impl DateRange {
    pub fn new(from: f64, to: f64, step: f64) -> Self {
        Self { from, to, step }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(SkyError::InvalidInput(format!("step {} must be positive", self.step)));
        }
        if !(self.from.is_finite() && self.to.is_finite()) || self.to < self.from {
            return Err(SkyError::InvalidInput(format!(
                "range [{}, {}] is empty",
                self.from, self.to
            )));
        }
        Ok(())
    }

    /// Number of instants in the range
    pub fn len(&self) -> usize {
        ((self.to - self.from) / self.step + 1e-9).floor() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }

    pub fn instant(&self, index: usize) -> f64 {
        self.from + index as f64 * self.step
    }
}

/// One instant of an ephemeris table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisRow {
    /// Julian Day (UT)
    pub julian_day: f64,
    pub cells: Vec<(EphemerisKey, EphemerisCell)>,
}

impl EphemerisRow {
    pub fn get(&self, key: EphemerisKey) -> Option<&EphemerisCell> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, c)| c)
    }
}

/// Ephemeris of one body over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisTable {
    pub body: String,
    pub keys: Vec<EphemerisKey>,
    pub rows: Vec<EphemerisRow>,
}

impl fmt::Display for EphemerisTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.body)?;
        write!(f, "{:<19}", "Date (UT)")?;
        for key in &self.keys {
            write!(f, "\t{}", key.label())?;
        }
        writeln!(f)?;
        for row in &self.rows {
            write!(f, "{:<19}", crate::time::calendar_date(row.julian_day).to_string())?;
            for (_, cell) in &row.cells {
                write!(f, "\t{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build an ephemeris table for one body
///
/// `progress` receives the completed fraction after each row. The job stops
/// with `SkyError::Cancelled` between rows once `cancel` is set.
pub fn generate_table<P>(
    body: &dyn CelestialObject,
    location: &GeoLocation,
    settings: &CalculationSettings,
    range: &DateRange,
    keys: &[EphemerisKey],
    cancel: &CancelFlag,
    mut progress: P,
) -> Result<EphemerisTable>
where
    P: FnMut(f64),
{
    settings.validate()?;
    location.validate()?;
    range.validate()?;

    let count = range.len();
    if count > settings.ephemeris_max_rows {
        return Err(SkyError::InvalidInput(format!(
            "range yields {} rows, more than the limit of {}",
            count, settings.ephemeris_max_rows
        )));
    }

    let name = body.name();
    debug!("Generating {} ephemeris rows for {}", count, name);

    let mut rows = Vec::with_capacity(count);
    for index in 0..count {
        cancel.check()?;

        let julian_day = range.instant(index);
        let ctx = SkyContext::with_settings(julian_day, *location, settings.clone());
        let cells = keys
            .iter()
            .map(|&key| {
                let result = body.ephemeris_value(&ctx, key);
                if let Err(e) = &result {
                    warn!("{} of {} failed at JD {}: {}", key.label(), name, julian_day, e);
                }
                (key, EphemerisCell::from(result))
            })
            .collect();
        rows.push(EphemerisRow { julian_day, cells });

        progress((index + 1) as f64 / count as f64);
    }

    debug!("Finished ephemeris of {}", name);
    Ok(EphemerisTable {
        body: name,
        keys: keys.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FormatHint::RightAscension, 41.0499417, "02h 44m 12.0s")]
    #[case(FormatHint::Declination, -7.783871, "-07° 47′ 01.9″")]
    #[case(FormatHint::LocalTime, 19.66, "19:40")]
    #[case(FormatHint::LocalTime, 23.999, "00:00")]
    #[case(FormatHint::Magnitude, -4.217, "-4.22")]
    #[case(FormatHint::Fraction, 0.6466, "0.647")]
    fn test_value_formatting(#[case] hint: FormatHint, #[case] value: f64, #[case] text: &str) {
        assert_eq!(EphemerisValue::new(value, hint).to_string(), text);
    }

    #[test]
    fn test_key_ids_parse() {
        for key in EphemerisKey::ALL {
            assert_eq!(key.id().parse::<EphemerisKey>().unwrap(), key);
        }
        assert!("bogus".parse::<EphemerisKey>().is_err());
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(2451545.0, 2451555.0, 1.0);
        assert_eq!(range.len(), 11);
        assert_eq!(range.instant(10), 2451555.0);
        assert!(DateRange::new(2451545.0, 2451544.0, 1.0).validate().is_err());
        assert!(DateRange::new(2451545.0, 2451546.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_cancel_flag_shared() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(flag.check().is_ok());
        handle.cancel();
        assert_eq!(flag.check(), Err(SkyError::Cancelled));
    }

    #[test]
    fn test_cell_from_result() {
        let ok: Result<Option<EphemerisValue>> =
            Ok(Some(EphemerisValue::new(1.0, FormatHint::Degrees)));
        assert_eq!(EphemerisCell::from(ok).value(), Some(1.0));
        assert_eq!(EphemerisCell::from(Ok(None)), EphemerisCell::Unavailable);
        let failed = EphemerisCell::from(Err(SkyError::Cancelled));
        assert!(matches!(failed, EphemerisCell::Failed(_)));
    }
}
