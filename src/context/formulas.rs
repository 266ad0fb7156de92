//! Quantities shared by every calculation at one instant

use super::SkyContext;
use crate::aberrationlib::{self, AberrationElements};
use crate::constants::DAY_S;
use crate::coordinates::Heliocentrical;
use crate::nutationlib::{self, NutationElements};
use crate::planetlib::{self, Planet};
use crate::time;
use crate::Result;

pub fn delta_t(ctx: &SkyContext) -> f64 {
    time::delta_t(ctx.julian_day())
}

pub fn jde(ctx: &SkyContext) -> f64 {
    ctx.julian_day() + ctx.delta_t() / DAY_S
}

pub fn nutation(ctx: &SkyContext) -> NutationElements {
    nutationlib::nutation_elements(ctx.jde())
}

pub fn mean_obliquity(ctx: &SkyContext) -> f64 {
    nutationlib::mean_obliquity(ctx.jde())
}

pub fn true_obliquity(ctx: &SkyContext) -> f64 {
    ctx.mean_obliquity() + ctx.nutation().delta_epsilon
}

pub fn aberration(ctx: &SkyContext) -> AberrationElements {
    aberrationlib::aberration_elements(ctx.jde())
}

pub fn mean_sidereal_time(ctx: &SkyContext) -> f64 {
    time::mean_sidereal_time(ctx.julian_day())
}

pub fn apparent_sidereal_time(ctx: &SkyContext) -> f64 {
    time::apparent_sidereal_time(ctx.julian_day(), &ctx.nutation(), ctx.epsilon())
}

pub fn local_midnight(ctx: &SkyContext) -> f64 {
    time::local_midnight(ctx.julian_day(), ctx.location().utc_offset)
}

/// Heliocentric position of the Earth, shared by the Sun and every planet
pub fn earth_heliocentric(ctx: &SkyContext) -> Result<Heliocentrical> {
    planetlib::heliocentric(Planet::Earth, ctx.jde(), ctx.high_precision())
}
