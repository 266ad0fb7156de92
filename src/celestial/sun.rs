//! The Sun's apparent place
//!
//! The geometric position is the Earth's VSOP87 position seen from the
//! other side, brought to FK5. Nutation in longitude and the solar form of
//! aberration give the apparent place.

use serde::{Deserialize, Serialize};

use super::CelestialObject;
use crate::aberrationlib;
use crate::almanac::riseset::disk_standard_altitude;
use crate::context::formulas::earth_heliocentric;
use crate::context::SkyContext;
use crate::coordinates::{Ecliptical, Equatorial, Heliocentrical};
use crate::earthlib::horizontal_parallax;
use crate::nutationlib::{self, NutationElements};
use crate::planetlib::{self, fk5_correction, Planet};
use crate::Result;

/// Semidiameter of the Sun at 1 AU, arcseconds
pub const SEMIDIAMETER_1AU: f64 = 959.63;

/// Visual magnitude of the Sun
pub const MAGNITUDE: f64 = -26.74;

/// The Sun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sun;

fn apparent_from_earth(earth: &Heliocentrical, jde: f64, nutation: &NutationElements) -> Ecliptical {
    let geometric = Ecliptical::new(earth.l + 180.0, -earth.b, earth.r);
    let fk5 = geometric + fk5_correction(&geometric, jde);
    Ecliptical::new(
        fk5.lambda + nutation.delta_psi + aberrationlib::solar_effect(earth.r),
        fk5.beta,
        earth.r,
    )
}

/// Apparent ecliptical coordinates of the Sun at a Julian Ephemeris Day
///
/// The distance is the Earth's radius vector in AU.
pub fn apparent_ecliptical(jde: f64, high_precision: bool) -> Result<Ecliptical> {
    let earth = planetlib::heliocentric(Planet::Earth, jde, high_precision)?;
    Ok(apparent_from_earth(&earth, jde, &nutationlib::nutation_elements(jde)))
}

/// Apparent longitude of the Sun at a Julian Ephemeris Day
pub fn apparent_longitude(jde: f64, high_precision: bool) -> Result<f64> {
    Ok(apparent_ecliptical(jde, high_precision)?.lambda)
}

/// Apparent ecliptical position at the context's instant
pub fn ecliptical(ctx: &SkyContext) -> Result<Ecliptical> {
    let earth = ctx.get(earth_heliocentric)?;
    Ok(apparent_from_earth(&earth, ctx.jde(), &ctx.nutation()))
}

/// Apparent equatorial position at the context's instant
pub fn equatorial(ctx: &SkyContext) -> Result<Equatorial> {
    Ok(ctx.get(ecliptical)?.to_equatorial(ctx.epsilon()))
}

impl CelestialObject for Sun {
    fn name(&self) -> String {
        "Sun".to_string()
    }

    fn equatorial(&self, ctx: &SkyContext) -> Result<Equatorial> {
        ctx.get(equatorial)
    }

    fn ecliptical(&self, ctx: &SkyContext) -> Result<Ecliptical> {
        ctx.get(ecliptical)
    }

    fn magnitude(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(MAGNITUDE))
    }

    fn parallax(&self, ctx: &SkyContext) -> Result<f64> {
        Ok(horizontal_parallax(ctx.get(ecliptical)?.distance))
    }

    fn semidiameter(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(SEMIDIAMETER_1AU / ctx.get(ecliptical)?.distance))
    }

    fn distance(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(ctx.get(ecliptical)?.distance))
    }

    fn elongation(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(None)
    }

    fn standard_altitude(&self, ctx: &SkyContext) -> Result<f64> {
        let sd = self.semidiameter(ctx)?.unwrap_or(SEMIDIAMETER_1AU) / 3600.0;
        Ok(disk_standard_altitude(sd, self.parallax(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::almanac::riseset::VisibilityState;
    use crate::earthlib::GeoLocation;
    use approx::assert_relative_eq;

    const ARCSEC: f64 = 1.0 / 3600.0;

    #[test]
    fn test_apparent_position_1992_october_13() {
        let ctx = SkyContext::from_jde(2448908.5, GeoLocation::new(0.0, 0.0));
        let eq = Sun.equatorial(&ctx).unwrap();
        assert_relative_eq!(eq.alpha, 198.378178, epsilon = 2.0 * ARCSEC);
        assert_relative_eq!(eq.delta, -7.783871, epsilon = 2.0 * ARCSEC);

        let ecl = apparent_ecliptical(2448908.5, true).unwrap();
        assert_relative_eq!(ecl.lambda, 199.906060, epsilon = 2.0 * ARCSEC);
        assert_relative_eq!(ecl.distance, 0.99760775, epsilon = 1e-6);
    }

    #[test]
    fn test_fast_tier_stays_close() {
        let full = apparent_longitude(2459000.5, true).unwrap();
        let fast = apparent_longitude(2459000.5, false).unwrap();
        assert_relative_eq!(full, fast, epsilon = 10.0 * ARCSEC);
    }

    #[test]
    fn test_disk_and_parallax() {
        let ctx = SkyContext::from_jde(2448908.5, GeoLocation::new(0.0, 0.0));
        let sd = Sun.semidiameter(&ctx).unwrap().unwrap();
        assert_relative_eq!(sd, 961.93, epsilon = 0.05);
        assert_relative_eq!(Sun.parallax(&ctx).unwrap() * 3600.0, 8.815, epsilon = 0.01);
        let h0 = Sun.standard_altitude(&ctx).unwrap();
        assert_relative_eq!(h0, -0.8314, epsilon = 1e-3);
    }

    #[test]
    fn test_midsummer_sun_at_high_latitude() {
        // Tromsø at the June solstice of 2020: the Sun does not set
        let ctx = SkyContext::new(2459021.5, GeoLocation::new(-18.96, 69.65));
        let rts = Sun.rise_transit_set(&ctx).unwrap();
        assert_eq!(rts.state, VisibilityState::Circumpolar);
        assert_eq!(rts.rise, None);

        // Greenwich on the same day has about 16.6 hours of daylight
        let ctx = SkyContext::new(2459021.5, GeoLocation::new(0.0, 51.4769));
        let rts = Sun.rise_transit_set(&ctx).unwrap();
        assert_eq!(rts.state, VisibilityState::Regular);
        assert_relative_eq!(rts.duration * 24.0, 16.6, epsilon = 0.1);
        assert_relative_eq!(rts.transit * 24.0, 12.03, epsilon = 0.02);
    }
}
