//! Per-body calculators
//!
//! Every kind of body implements [`CelestialObject`]: the apparent geocentric
//! position is the one required calculation, and visibility, appearance,
//! information tables and ephemeris values are derived from it by the
//! trait's provided methods. Bodies override the appearance hooks they can
//! answer. [`CelestialBody`] collects the kinds into one closed set.

pub mod minor_bodies;
pub mod moon;
pub mod planets;
pub mod stars;
pub mod sun;

pub use moon::Moon;
pub use planets::PlanetPosition;
pub use stars::apparent_place;
pub use sun::Sun;

use std::ops::Deref;
use std::str::FromStr;

use crate::almanac::riseset::{self, RiseTransitSet, SampleGrid, STANDARD_ALTITUDE};
use crate::catalogs::{CatalogStar, DeepSkyObject, MinorBody, ProperMotion};
use crate::context::SkyContext;
use crate::coordinates::{Ecliptical, Equatorial, Horizontal};
use crate::earthlib;
use crate::ephemeris::{
    EphemerisCell, EphemerisKey, EphemerisValue, FormatHint, InfoSection, InfoTable,
};
use crate::planetlib::{appearance, Planet};
use crate::{Result, SkyError};

/// A body whose apparent place can be computed for an instant and observer
pub trait CelestialObject {
    fn name(&self) -> String;

    /// Apparent geocentric equatorial coordinates, true equator and equinox of date
    fn equatorial(&self, ctx: &SkyContext) -> Result<Equatorial>;

    /// Visual magnitude, `None` when unknown
    fn magnitude(&self, ctx: &SkyContext) -> Result<Option<f64>>;

    /// Apparent geocentric ecliptical coordinates
    fn ecliptical(&self, ctx: &SkyContext) -> Result<Ecliptical> {
        Ok(self.equatorial(ctx)?.to_ecliptical(ctx.epsilon()))
    }

    /// Equatorial horizontal parallax in degrees
    fn parallax(&self, _ctx: &SkyContext) -> Result<f64> {
        Ok(0.0)
    }

    /// Apparent semidiameter in arcseconds
    fn semidiameter(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(None)
    }

    /// Distance from the Earth's center, in the unit of [`Self::distance_hint`]
    fn distance(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(None)
    }

    fn distance_hint(&self) -> FormatHint {
        FormatHint::AstronomicalUnits
    }

    /// Sun-body-Earth angle in degrees
    fn phase_angle(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(None)
    }

    /// Illuminated fraction of the disk
    fn phase(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(self.phase_angle(ctx)?.map(appearance::illuminated_fraction))
    }

    /// Angular distance from the Sun in degrees
    fn elongation(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let sun = Sun.equatorial(ctx)?;
        Ok(Some(sun.angular_separation(&self.equatorial(ctx)?)))
    }

    /// Apparent place seen from the observer rather than the Earth's center
    fn topocentric(&self, ctx: &SkyContext) -> Result<Equatorial> {
        let eq = self.equatorial(ctx)?;
        let parallax = self.parallax(ctx)?;
        if parallax == 0.0 {
            return Ok(eq);
        }
        Ok(earthlib::topocentric(
            &eq,
            ctx.location(),
            ctx.sidereal_time(),
            parallax,
        ))
    }

    /// Azimuth and altitude for the observer, refracted when the settings ask for it
    fn horizontal(&self, ctx: &SkyContext) -> Result<Horizontal> {
        let mut hor = self
            .topocentric(ctx)?
            .to_horizontal(ctx.location(), ctx.sidereal_time());
        if ctx.settings().apply_refraction {
            hor.altitude = earthlib::apparent_altitude(hor.altitude);
        }
        Ok(hor)
    }

    /// Geometric altitude of the body's center at rising and setting, degrees
    fn standard_altitude(&self, _ctx: &SkyContext) -> Result<f64> {
        Ok(STANDARD_ALTITUDE)
    }

    /// Rise, transit and set on the observer's local day containing the instant
    ///
    /// Evaluated once per body and context; the cached result serves every
    /// later query at the same instant.
    fn rise_transit_set(&self, ctx: &SkyContext) -> Result<RiseTransitSet> {
        let identity = (std::any::type_name::<Self>(), self.name());
        ctx.get_tagged::<RiseTransitSet, _, _, _>(identity, |ctx| {
            self.sample_rise_transit_set(ctx)
        })
    }

    /// Rise, transit and set from fresh samples at local midnight, noon
    /// and the next midnight
    fn sample_rise_transit_set(&self, ctx: &SkyContext) -> Result<RiseTransitSet> {
        let midnight = ctx.local_midnight();
        let contexts = [ctx.at(midnight), ctx.at(midnight + 0.5), ctx.at(midnight + 1.0)];
        let samples = [
            self.equatorial(&contexts[0])?,
            self.equatorial(&contexts[1])?,
            self.equatorial(&contexts[2])?,
        ];
        let h0 = self.standard_altitude(&contexts[1])?;
        riseset::rise_transit_set(
            samples,
            SampleGrid::HALF_DAY,
            ctx.location(),
            contexts[0].sidereal_time(),
            h0,
        )
    }

    /// Quantities offered in ephemeris tables for this body
    fn ephemeris_keys(&self) -> Vec<EphemerisKey> {
        vec![
            EphemerisKey::RightAscension,
            EphemerisKey::Declination,
            EphemerisKey::Azimuth,
            EphemerisKey::Altitude,
            EphemerisKey::Magnitude,
            EphemerisKey::Rise,
            EphemerisKey::Transit,
            EphemerisKey::Set,
        ]
    }

    /// Value of one ephemeris quantity; `Ok(None)` when it does not apply
    fn ephemeris_value(
        &self,
        ctx: &SkyContext,
        key: EphemerisKey,
    ) -> Result<Option<EphemerisValue>> {
        let hint = key.format_hint();
        let value = |v: f64| Some(EphemerisValue::new(v, hint));
        let local_time = |fraction: f64| EphemerisValue::new(fraction * 24.0, hint);

        Ok(match key {
            EphemerisKey::RightAscension => value(self.equatorial(ctx)?.alpha),
            EphemerisKey::Declination => value(self.equatorial(ctx)?.delta),
            EphemerisKey::EclipticLongitude => value(self.ecliptical(ctx)?.lambda),
            EphemerisKey::EclipticLatitude => value(self.ecliptical(ctx)?.beta),
            EphemerisKey::Azimuth => value(self.horizontal(ctx)?.azimuth),
            EphemerisKey::Altitude => value(self.horizontal(ctx)?.altitude),
            EphemerisKey::Distance => self
                .distance(ctx)?
                .map(|d| EphemerisValue::new(d, self.distance_hint())),
            EphemerisKey::Magnitude => self.magnitude(ctx)?.and_then(value),
            EphemerisKey::PhaseAngle => self.phase_angle(ctx)?.and_then(value),
            EphemerisKey::Phase => self.phase(ctx)?.and_then(value),
            EphemerisKey::Elongation => self.elongation(ctx)?.and_then(value),
            EphemerisKey::Semidiameter => self.semidiameter(ctx)?.and_then(value),
            EphemerisKey::HorizontalParallax => value(self.parallax(ctx)?),
            EphemerisKey::Rise => self.rise_transit_set(ctx)?.rise.map(local_time),
            EphemerisKey::Transit => Some(local_time(self.rise_transit_set(ctx)?.transit)),
            EphemerisKey::Set => self.rise_transit_set(ctx)?.set.map(local_time),
            EphemerisKey::CentralMeridian | EphemerisKey::RingTilt => {
                self.extra_value(ctx, key)?
            }
        })
    }

    /// Body-specific ephemeris quantities
    fn extra_value(
        &self,
        _ctx: &SkyContext,
        _key: EphemerisKey,
    ) -> Result<Option<EphemerisValue>> {
        Ok(None)
    }

    /// Labelled description of the body at one instant
    fn info(&self, ctx: &SkyContext) -> Result<InfoTable> {
        let mut table = InfoTable::new(self.name());

        let eq = self.equatorial(ctx)?;
        table.push(
            InfoSection::new("Equatorial coordinates")
                .value("Right ascension", eq.alpha, FormatHint::RightAscension)
                .value("Declination", eq.delta, FormatHint::Declination),
        );

        let ecl = self.ecliptical(ctx)?;
        table.push(
            InfoSection::new("Ecliptical coordinates")
                .value("Longitude", ecl.lambda, FormatHint::Degrees)
                .value("Latitude", ecl.beta, FormatHint::Degrees),
        );

        let hor = self.horizontal(ctx)?;
        table.push(
            InfoSection::new("Horizontal coordinates")
                .value("Azimuth", hor.azimuth, FormatHint::Degrees)
                .value("Altitude", hor.altitude, FormatHint::Declination),
        );

        // Rise and set may be undefined at the observer's latitude
        let visibility = match self.rise_transit_set(ctx) {
            Ok(rts) => {
                let hours = |fraction: Option<f64>| fraction.map(|f| f * 24.0);
                InfoSection::new("Visibility")
                    .cell("Rise", optional_cell(hours(rts.rise), FormatHint::LocalTime))
                    .value("Transit", rts.transit * 24.0, FormatHint::LocalTime)
                    .cell("Set", optional_cell(hours(rts.set), FormatHint::LocalTime))
                    .value("Transit altitude", rts.transit_altitude, FormatHint::Degrees)
                    .value("Duration", rts.duration * 24.0, FormatHint::LocalTime)
            }
            Err(e) => InfoSection::new("Visibility")
                .cell("Rise and set", EphemerisCell::Failed(e.to_string())),
        };
        table.push(visibility);

        table.push(
            InfoSection::new("Appearance")
                .optional("Magnitude", self.magnitude(ctx)?, FormatHint::Magnitude)
                .optional("Phase", self.phase(ctx)?, FormatHint::Fraction)
                .optional("Phase angle", self.phase_angle(ctx)?, FormatHint::Degrees)
                .optional("Elongation", self.elongation(ctx)?, FormatHint::Degrees)
                .optional("Semidiameter", self.semidiameter(ctx)?, FormatHint::Arcseconds)
                .optional("Distance", self.distance(ctx)?, self.distance_hint()),
        );

        self.extra_info(ctx, &mut table)?;
        Ok(table)
    }

    /// Append body-specific sections to an information table
    fn extra_info(&self, _ctx: &SkyContext, _table: &mut InfoTable) -> Result<()> {
        Ok(())
    }
}

fn optional_cell(value: Option<f64>, hint: FormatHint) -> EphemerisCell {
    value.map_or(EphemerisCell::Unavailable, |v| {
        EphemerisCell::Value(EphemerisValue::new(v, hint))
    })
}

/// Every kind of body the crate can compute
#[derive(Debug, Clone, PartialEq)]
pub enum CelestialBody {
    Sun(Sun),
    Moon(Moon),
    Planet(Planet),
    Star(CatalogStar),
    DeepSky(DeepSkyObject),
    MinorBody(MinorBody),
}

impl CelestialBody {
    pub fn as_object(&self) -> &(dyn CelestialObject + 'static) {
        match self {
            CelestialBody::Sun(sun) => sun,
            CelestialBody::Moon(moon) => moon,
            CelestialBody::Planet(planet) => planet,
            CelestialBody::Star(star) => star,
            CelestialBody::DeepSky(dso) => dso,
            CelestialBody::MinorBody(body) => body,
        }
    }

    /// The Sun, the Moon and the planets other than the Earth
    pub fn solar_system() -> Vec<CelestialBody> {
        let mut bodies = vec![CelestialBody::Sun(Sun), CelestialBody::Moon(Moon)];
        bodies.extend(
            Planet::ALL
                .iter()
                .filter(|p| **p != Planet::Earth)
                .map(|p| CelestialBody::Planet(*p)),
        );
        bodies
    }
}

impl Deref for CelestialBody {
    type Target = dyn CelestialObject;

    fn deref(&self) -> &Self::Target {
        self.as_object()
    }
}

impl FromStr for CelestialBody {
    type Err = SkyError;

    /// Look up the Sun, the Moon or a planet by name
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sun" => Ok(CelestialBody::Sun(Sun)),
            "moon" => Ok(CelestialBody::Moon(Moon)),
            "earth" => Err(SkyError::InvalidInput(
                "the Earth is the observer's own planet".into(),
            )),
            _ => s.parse::<Planet>().map(CelestialBody::Planet),
        }
    }
}

impl From<Planet> for CelestialBody {
    fn from(planet: Planet) -> Self {
        CelestialBody::Planet(planet)
    }
}

impl From<CatalogStar> for CelestialBody {
    fn from(star: CatalogStar) -> Self {
        CelestialBody::Star(star)
    }
}

impl From<DeepSkyObject> for CelestialBody {
    fn from(dso: DeepSkyObject) -> Self {
        CelestialBody::DeepSky(dso)
    }
}

impl From<MinorBody> for CelestialBody {
    fn from(body: MinorBody) -> Self {
        CelestialBody::MinorBody(body)
    }
}

/// A catalog position tracked across calculation passes
///
/// `equatorial0` is the mean place at J2000.0 and never changes; the
/// apparent places are recomputed by [`CelestialPoint::update`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CelestialPoint {
    pub equatorial0: Equatorial,
    pub equatorial: Equatorial,
    pub horizontal: Horizontal,
}

impl CelestialPoint {
    pub fn new(equatorial0: Equatorial) -> Self {
        Self {
            equatorial0,
            equatorial: equatorial0,
            horizontal: Horizontal::new(0.0, 0.0),
        }
    }

    /// Recompute the apparent places for the context's instant and observer
    pub fn update(&mut self, ctx: &SkyContext) {
        self.equatorial = apparent_place(&self.equatorial0, &ProperMotion::default(), ctx);
        self.horizontal = self
            .equatorial
            .to_horizontal(ctx.location(), ctx.sidereal_time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earthlib::GeoLocation;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn ctx() -> SkyContext {
        SkyContext::new(2459000.5, GeoLocation::new(-10.75, 59.91))
    }

    #[test]
    fn test_body_lookup() {
        assert_eq!("sun".parse::<CelestialBody>().unwrap(), CelestialBody::Sun(Sun));
        assert_eq!(" Moon".parse::<CelestialBody>().unwrap(), CelestialBody::Moon(Moon));
        assert_eq!(
            "saturn".parse::<CelestialBody>().unwrap(),
            CelestialBody::Planet(Planet::Saturn)
        );
        assert!(matches!(
            "earth".parse::<CelestialBody>(),
            Err(SkyError::InvalidInput(_))
        ));
        assert!(matches!(
            "Nibiru".parse::<CelestialBody>(),
            Err(SkyError::ObjectNotFound(_))
        ));
        assert_eq!(CelestialBody::solar_system().len(), 10);
    }

    #[test]
    fn test_enum_delegates_to_body() {
        let ctx = ctx();
        let body = CelestialBody::from(Planet::Mars);
        let direct = Planet::Mars.equatorial(&ctx).unwrap();
        let via_enum = body.equatorial(&ctx).unwrap();
        assert_eq!(direct, via_enum);
        assert_eq!(body.name(), "Mars");
        assert!(body.ephemeris_keys().contains(&EphemerisKey::CentralMeridian));
    }

    #[test]
    fn test_sun_elongation_of_itself_undefined() {
        let ctx = ctx();
        assert_eq!(Sun.elongation(&ctx).unwrap(), None);
        let e = Planet::Venus.elongation(&ctx).unwrap().unwrap();
        assert!(e > 0.0 && e < 48.0);
    }

    #[test]
    fn test_info_has_common_sections() {
        let ctx = ctx();
        let info = CelestialBody::Planet(Planet::Jupiter).info(&ctx).unwrap();
        for title in ["Equatorial coordinates", "Horizontal coordinates", "Visibility", "Appearance"] {
            assert!(info.section(title).is_some(), "missing {}", title);
        }
        assert!(info.get("Central meridian").is_some());
    }

    #[test]
    fn test_refraction_raises_altitude() {
        let plain = ctx();
        let mut settings = plain.settings().clone();
        settings.apply_refraction = true;
        let refracted = SkyContext::with_settings(plain.julian_day(), *plain.location(), settings);

        let a = Sun.horizontal(&plain).unwrap();
        let b = Sun.horizontal(&refracted).unwrap();
        assert_relative_eq!(a.azimuth, b.azimuth, epsilon = 1e-12);
        if a.altitude > -1.0 {
            assert!(b.altitude > a.altitude);
        }
    }

    /// Fixed point that counts how often its place is asked for
    struct CountingPoint {
        equatorial: Equatorial,
        calls: Cell<usize>,
    }

    impl CelestialObject for CountingPoint {
        fn name(&self) -> String {
            "counting point".to_string()
        }

        fn equatorial(&self, _ctx: &SkyContext) -> Result<Equatorial> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.equatorial)
        }

        fn magnitude(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
            Ok(None)
        }
    }

    #[test]
    fn test_rise_transit_set_evaluated_once_per_context() {
        let ctx = ctx();
        let point = CountingPoint {
            equatorial: Equatorial::new(100.0, 20.0),
            calls: Cell::new(0),
        };

        let rise = point.ephemeris_value(&ctx, EphemerisKey::Rise).unwrap();
        let transit = point.ephemeris_value(&ctx, EphemerisKey::Transit).unwrap();
        let set = point.ephemeris_value(&ctx, EphemerisKey::Set).unwrap();
        assert!(rise.is_some() && transit.is_some() && set.is_some());
        // Three samples of the local day, shared by all three quantities
        assert_eq!(point.calls.get(), 3);

        // Information tables reuse the cached result as well
        let before = point.calls.get();
        point.info(&ctx).unwrap();
        let cached = point.calls.get() - before;
        let fresh_ctx = ctx.at(ctx.julian_day());
        let before = point.calls.get();
        point.info(&fresh_ctx).unwrap();
        assert_eq!(point.calls.get() - before, cached + 3);

        let next_day = ctx.at(ctx.julian_day() + 1.0);
        let before = point.calls.get();
        point.rise_transit_set(&next_day).unwrap();
        point.rise_transit_set(&next_day).unwrap();
        assert_eq!(point.calls.get() - before, 3);
    }

    #[test]
    fn test_cached_rise_transit_set_is_per_body() {
        let ctx = ctx();
        let sun = Sun.rise_transit_set(&ctx).unwrap();
        let mars = Planet::Mars.rise_transit_set(&ctx).unwrap();
        assert_ne!(sun.transit, mars.transit);
        assert_eq!(Sun.rise_transit_set(&ctx).unwrap(), sun);
    }

    #[test]
    fn test_celestial_point_update() {
        let ctx = ctx();
        let vega = Equatorial::new(279.23473, 38.78369);
        let mut point = CelestialPoint::new(vega);
        point.update(&ctx);
        assert_eq!(point.equatorial0, vega);
        // Twenty years of precession move Vega by well under a degree
        let shift = point.equatorial.angular_separation(&vega);
        assert!(shift > 0.01 && shift < 0.5);
        assert_relative_eq!(
            point.horizontal.altitude,
            point.equatorial.to_horizontal(ctx.location(), ctx.sidereal_time()).altitude,
            epsilon = 1e-12
        );
    }
}
