//! The Moon's apparent place, parallax and phase

use serde::{Deserialize, Serialize};

use super::{sun, CelestialObject};
use crate::almanac::riseset::disk_standard_altitude;
use crate::context::SkyContext;
use crate::coordinates::{Ecliptical, Equatorial};
use crate::ephemeris::FormatHint;
use crate::moonlib::{self, LunarPosition};
use crate::Result;

/// The Moon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Moon;

/// Geometric position, mean equinox of date
pub fn position(ctx: &SkyContext) -> LunarPosition {
    moonlib::geocentric(ctx.jde())
}

/// Apparent ecliptical position; the distance is in AU
pub fn ecliptical(ctx: &SkyContext) -> Ecliptical {
    let pos = ctx.get(position);
    let mut ecl = pos.to_ecliptical();
    ecl.lambda += ctx.nutation().delta_psi;
    ecl
}

pub fn equatorial(ctx: &SkyContext) -> Equatorial {
    ctx.get(ecliptical).to_equatorial(ctx.epsilon())
}

/// Geocentric elongation from the Sun and phase angle, degrees
fn elongation_and_phase(ctx: &SkyContext) -> Result<(f64, f64)> {
    let sun = ctx.get(sun::equatorial)?;
    let sun_distance = ctx.get(sun::ecliptical)?.distance;
    let elongation = sun.angular_separation(&ctx.get(equatorial));
    let i = moonlib::phase_angle(elongation, ctx.get(position).distance, sun_distance);
    Ok((elongation, i))
}

impl CelestialObject for Moon {
    fn name(&self) -> String {
        "Moon".to_string()
    }

    fn equatorial(&self, ctx: &SkyContext) -> Result<Equatorial> {
        Ok(ctx.get(equatorial))
    }

    fn ecliptical(&self, ctx: &SkyContext) -> Result<Ecliptical> {
        Ok(ctx.get(ecliptical))
    }

    fn magnitude(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let (_, i) = ctx.get(elongation_and_phase)?;
        Ok(Some(moonlib::magnitude(i)))
    }

    fn parallax(&self, ctx: &SkyContext) -> Result<f64> {
        Ok(ctx.get(position).parallax())
    }

    fn semidiameter(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(ctx.get(position).semidiameter()))
    }

    /// Distance between the centers of the Earth and the Moon, km
    fn distance(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(ctx.get(position).distance))
    }

    fn distance_hint(&self) -> FormatHint {
        FormatHint::Kilometers
    }

    fn phase_angle(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(ctx.get(elongation_and_phase)?.1))
    }

    fn elongation(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(ctx.get(elongation_and_phase)?.0))
    }

    fn standard_altitude(&self, ctx: &SkyContext) -> Result<f64> {
        let pos = ctx.get(position);
        Ok(disk_standard_altitude(pos.semidiameter() / 3600.0, pos.parallax()))
    }
}
