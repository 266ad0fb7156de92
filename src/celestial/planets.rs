//! Apparent places and appearance of the planets
//!
//! The planet is taken at the instant its light left it, the Earth at the
//! instant of observation. The geometric geocentric place is brought to FK5
//! and then corrected for nutation and aberration.

use serde::{Deserialize, Serialize};

use super::CelestialObject;
use crate::aberrationlib::{self, AberrationElements};
use crate::context::formulas::earth_heliocentric;
use crate::context::SkyContext;
use crate::coordinates::{Ecliptical, Equatorial, Heliocentrical};
use crate::earthlib::horizontal_parallax;
use crate::ephemeris::{EphemerisKey, EphemerisValue, FormatHint, InfoSection, InfoTable};
use crate::nutationlib::{self, NutationElements};
use crate::planetlib::appearance::{self, PhysicalEphemeris, SaturnRings};
use crate::planetlib::{self, fk5_correction, light_time_iterate, Planet};
use crate::{Result, SkyError};

/// Every stage of a planet's apparent place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    /// Heliocentric position at the retarded time
    pub heliocentric: Heliocentrical,
    /// Geometric geocentric position, light-time corrected; distance in AU
    pub geometric: Ecliptical,
    /// Apparent ecliptical position, true equinox of date
    pub ecliptical: Ecliptical,
    /// Apparent equatorial position, true equator and equinox of date
    pub equatorial: Equatorial,
    /// Sun-Earth distance in AU
    pub earth_distance: f64,
    /// Light time in days
    pub light_time: f64,
}

struct Corrections {
    nutation: NutationElements,
    aberration: AberrationElements,
    epsilon: f64,
}

fn check_planet(planet: Planet) -> Result<()> {
    if planet == Planet::Earth {
        return Err(SkyError::InvalidInput(
            "the Earth has no geocentric position".into(),
        ));
    }
    Ok(())
}

fn compute(
    planet: Planet,
    jde: f64,
    high_precision: bool,
    earth: &Heliocentrical,
    corrections: &Corrections,
) -> Result<PlanetPosition> {
    check_planet(planet)?;

    let solution = light_time_iterate(jde, |t| {
        let helio = planetlib::heliocentric(planet, t, high_precision)?;
        let geo = helio.to_geocentric(earth);
        Ok(((helio, geo), geo.distance))
    })?;
    let (heliocentric, geometric) = solution.value;

    let fk5 = geometric + fk5_correction(&geometric, jde);
    let aberration = aberrationlib::ecliptical_effect(&fk5, &corrections.aberration);
    let mut ecliptical = fk5 + aberration;
    ecliptical.lambda += corrections.nutation.delta_psi;
    let ecliptical = Ecliptical::new(ecliptical.lambda, ecliptical.beta, geometric.distance);

    Ok(PlanetPosition {
        heliocentric,
        geometric,
        ecliptical,
        equatorial: ecliptical.to_equatorial(corrections.epsilon),
        earth_distance: earth.r,
        light_time: solution.light_time,
    })
}

/// Apparent position of a planet at a Julian Ephemeris Day
pub fn apparent_position(planet: Planet, jde: f64, high_precision: bool) -> Result<PlanetPosition> {
    let earth = planetlib::heliocentric(Planet::Earth, jde, high_precision)?;
    let nutation = nutationlib::nutation_elements(jde);
    let corrections = Corrections {
        nutation,
        aberration: aberrationlib::aberration_elements(jde),
        epsilon: nutationlib::true_obliquity(jde, nutation.delta_epsilon),
    };
    compute(planet, jde, high_precision, &earth, &corrections)
}

/// Apparent position at the context's instant
pub fn position(ctx: &SkyContext, planet: Planet) -> Result<PlanetPosition> {
    let earth = ctx.get(earth_heliocentric)?;
    let corrections = Corrections {
        nutation: ctx.nutation(),
        aberration: ctx.aberration(),
        epsilon: ctx.epsilon(),
    };
    compute(planet, ctx.jde(), ctx.high_precision(), &earth, &corrections)
}

/// Central meridian, axis position angle and sub-Earth latitude
pub fn physical_ephemeris(ctx: &SkyContext, planet: Planet) -> Result<Option<PhysicalEphemeris>> {
    let pos = ctx.get1(position, planet)?;
    Ok(
        appearance::rotation_elements(planet, ctx.jde() - pos.light_time)
            .map(|rot| appearance::physical_ephemeris(&rot, &pos.equatorial)),
    )
}

/// Ring geometry, `None` for every planet but Saturn
pub fn saturn_rings(ctx: &SkyContext, planet: Planet) -> Result<Option<SaturnRings>> {
    if planet != Planet::Saturn {
        return Ok(None);
    }
    let pos = ctx.get1(position, planet)?;
    Ok(Some(appearance::saturn_rings(
        ctx.jde(),
        &pos.heliocentric,
        &pos.geometric,
    )))
}

impl CelestialObject for Planet {
    fn name(&self) -> String {
        Planet::name(self).to_string()
    }

    fn equatorial(&self, ctx: &SkyContext) -> Result<Equatorial> {
        Ok(ctx.get1(position, *self)?.equatorial)
    }

    fn ecliptical(&self, ctx: &SkyContext) -> Result<Ecliptical> {
        Ok(ctx.get1(position, *self)?.ecliptical)
    }

    fn magnitude(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let pos = ctx.get1(position, *self)?;
        let i = appearance::phase_angle(pos.heliocentric.r, pos.geometric.distance, pos.earth_distance);
        let rings = ctx.get1(saturn_rings, *self)?;
        appearance::magnitude(
            *self,
            pos.heliocentric.r,
            pos.geometric.distance,
            i,
            rings.as_ref(),
        )
        .map(Some)
    }

    fn parallax(&self, ctx: &SkyContext) -> Result<f64> {
        Ok(horizontal_parallax(ctx.get1(position, *self)?.geometric.distance))
    }

    fn semidiameter(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let pos = ctx.get1(position, *self)?;
        Ok(appearance::semidiameter(*self, pos.geometric.distance))
    }

    fn distance(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(ctx.get1(position, *self)?.geometric.distance))
    }

    fn phase_angle(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let pos = ctx.get1(position, *self)?;
        Ok(Some(appearance::phase_angle(
            pos.heliocentric.r,
            pos.geometric.distance,
            pos.earth_distance,
        )))
    }

    fn elongation(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let pos = ctx.get1(position, *self)?;
        Ok(Some(appearance::elongation(
            pos.heliocentric.r,
            pos.geometric.distance,
            pos.earth_distance,
        )))
    }

    fn ephemeris_keys(&self) -> Vec<EphemerisKey> {
        let mut keys = vec![
            EphemerisKey::RightAscension,
            EphemerisKey::Declination,
            EphemerisKey::Azimuth,
            EphemerisKey::Altitude,
            EphemerisKey::Distance,
            EphemerisKey::Magnitude,
            EphemerisKey::Phase,
            EphemerisKey::Elongation,
            EphemerisKey::Semidiameter,
            EphemerisKey::Rise,
            EphemerisKey::Transit,
            EphemerisKey::Set,
            EphemerisKey::CentralMeridian,
        ];
        if *self == Planet::Saturn {
            keys.push(EphemerisKey::RingTilt);
        }
        keys
    }

    fn extra_value(&self, ctx: &SkyContext, key: EphemerisKey) -> Result<Option<EphemerisValue>> {
        let value = match key {
            EphemerisKey::CentralMeridian => {
                ctx.get1(physical_ephemeris, *self)?.map(|p| p.central_meridian)
            }
            EphemerisKey::RingTilt => ctx.get1(saturn_rings, *self)?.map(|r| r.b),
            _ => None,
        };
        Ok(value.map(|v| EphemerisValue::new(v, FormatHint::Degrees)))
    }

    fn extra_info(&self, ctx: &SkyContext, table: &mut InfoTable) -> Result<()> {
        let pos = ctx.get1(position, *self)?;
        table.push(
            InfoSection::new("Heliocentric coordinates")
                .value("Longitude", pos.heliocentric.l, FormatHint::Degrees)
                .value("Latitude", pos.heliocentric.b, FormatHint::Degrees)
                .value("Radius vector", pos.heliocentric.r, FormatHint::AstronomicalUnits),
        );

        if let Some(phys) = ctx.get1(physical_ephemeris, *self)? {
            table.push(
                InfoSection::new("Physical ephemeris")
                    .value("Central meridian", phys.central_meridian, FormatHint::Degrees)
                    .value("Earth declination", phys.earth_declination, FormatHint::Degrees)
                    .value("Axis position angle", phys.position_angle, FormatHint::Degrees),
            );
        }

        if let Some(rings) = ctx.get1(saturn_rings, *self)? {
            table.push(
                InfoSection::new("Rings")
                    .value("Tilt", rings.b, FormatHint::Degrees)
                    .value("Major axis", rings.major_axis, FormatHint::Arcseconds)
                    .value("Minor axis", rings.minor_axis, FormatHint::Arcseconds),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earthlib::GeoLocation;
    use approx::assert_relative_eq;

    const ARCSEC: f64 = 1.0 / 3600.0;

    #[test]
    fn test_venus_1992_december_20() {
        let pos = apparent_position(Planet::Venus, 2448976.5, true).unwrap();
        assert_relative_eq!(pos.equatorial.alpha, 316.172725, epsilon = 2.0 * ARCSEC);
        assert_relative_eq!(pos.equatorial.delta, -18.888011, epsilon = 2.0 * ARCSEC);
        assert_relative_eq!(pos.geometric.distance, 0.910947, epsilon = 1e-5);
        assert_relative_eq!(pos.light_time, 0.0052612, epsilon = 1e-6);
    }

    #[test]
    fn test_context_matches_pure_pipeline() {
        let ctx = SkyContext::from_jde(2448976.5, GeoLocation::new(0.0, 0.0));
        let eq = Planet::Venus.equatorial(&ctx).unwrap();
        let pure = apparent_position(Planet::Venus, 2448976.5, true).unwrap();
        assert_relative_eq!(eq.alpha, pure.equatorial.alpha, epsilon = 1e-6);
        assert_relative_eq!(eq.delta, pure.equatorial.delta, epsilon = 1e-6);
    }

    #[test]
    fn test_venus_appearance() {
        let ctx = SkyContext::from_jde(2448976.5, GeoLocation::new(0.0, 0.0));
        let i = Planet::Venus.phase_angle(&ctx).unwrap().unwrap();
        assert_relative_eq!(i, 72.96, epsilon = 0.02);
        let k = Planet::Venus.phase(&ctx).unwrap().unwrap();
        assert_relative_eq!(k, 0.647, epsilon = 1e-3);
        let m = Planet::Venus.magnitude(&ctx).unwrap().unwrap();
        assert_relative_eq!(m, -4.2, epsilon = 0.05);
    }

    #[test]
    fn test_earth_rejected() {
        let ctx = SkyContext::new(2451545.0, GeoLocation::new(0.0, 0.0));
        assert!(matches!(
            Planet::Earth.equatorial(&ctx),
            Err(SkyError::InvalidInput(_))
        ));
        assert!(apparent_position(Planet::Earth, 2451545.0, true).is_err());
    }

    #[test]
    fn test_saturn_ring_tilt_1992() {
        let ctx = SkyContext::from_jde(2448972.50068, GeoLocation::new(0.0, 0.0));
        let tilt = Planet::Saturn
            .ephemeris_value(&ctx, EphemerisKey::RingTilt)
            .unwrap()
            .unwrap();
        assert_relative_eq!(tilt.value, 16.442, epsilon = 0.01);
        assert_eq!(
            Planet::Jupiter.ephemeris_value(&ctx, EphemerisKey::RingTilt).unwrap(),
            None
        );
        assert!(Planet::Saturn.ephemeris_keys().contains(&EphemerisKey::RingTilt));
    }

    #[test]
    fn test_every_planet_has_a_position() {
        let ctx = SkyContext::new(2459000.5, GeoLocation::new(0.0, 0.0));
        for planet in Planet::ALL.iter().filter(|p| **p != Planet::Earth) {
            let pos = ctx.get1(position, *planet).unwrap();
            assert!((-90.0..=90.0).contains(&pos.equatorial.delta));
            assert!(pos.light_time > 0.0);
            assert!(planet.magnitude(&ctx).unwrap().is_some());
        }
    }
}
