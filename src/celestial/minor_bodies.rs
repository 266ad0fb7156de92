//! Asteroids and comets on Keplerian orbits
//!
//! The body's heliocentric position comes from its osculating elements, the
//! Earth's from VSOP87 precessed onto the ecliptic of the elements' equinox.
//! After the light-time iteration the geocentric vector is turned onto the
//! equator of that equinox (the astrometric place) and then carried to the
//! apparent place like a catalog star.

use super::CelestialObject;
use crate::aberrationlib;
use crate::catalogs::MinorBody;
use crate::context::formulas::earth_heliocentric;
use crate::context::SkyContext;
use crate::coordinates::{Cartesian3, Ecliptical, Equatorial, Heliocentrical};
use crate::ephemeris::{EphemerisKey, FormatHint, InfoSection, InfoTable};
use crate::framelib::ecliptic_to_equatorial;
use crate::framelib::inertial::InertialFrame;
use crate::nutationlib;
use crate::orbitlib::{OrbitKind, OrbitalElements};
use crate::planetlib::{appearance, light_time_iterate};
use crate::precessionlib;
use crate::Result;

/// Astrometric place of a minor body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AstrometricPosition {
    /// Heliocentric ecliptic vector at the retarded time, AU
    pub heliocentric: Cartesian3,
    /// Geocentric direction, mean equator and equinox of the elements
    pub equatorial: Equatorial,
    /// Distance from the Earth in AU
    pub distance: f64,
    /// Distance from the Sun in AU
    pub radius: f64,
    /// Sun-Earth distance in AU
    pub earth_distance: f64,
    /// Light time in days
    pub light_time: f64,
}

/// Astrometric place given the Earth's position on the ecliptic of date
pub fn astrometric_position(
    elements: &OrbitalElements,
    jde: f64,
    earth: &Heliocentrical,
) -> Result<AstrometricPosition> {
    elements.validate()?;

    let to_equinox = precessionlib::ecliptical_elements(jde, elements.equinox);
    let earth_ecl = precessionlib::ecliptical_coordinates(
        &Ecliptical::new(earth.l, earth.b, earth.r),
        &to_equinox,
    );
    let earth_vec = earth_ecl.to_rectangular();

    let solution = light_time_iterate(jde, |t| {
        let helio = elements.heliocentric_rectangular(t)?;
        let geo = helio - earth_vec;
        Ok(((helio, geo), geo.magnitude()))
    })?;
    let (heliocentric, geocentric) = solution.value;

    let obliquity = nutationlib::mean_obliquity(elements.equinox);
    let rotated = ecliptic_to_equatorial(obliquity) * geocentric.to_vector3();

    Ok(AstrometricPosition {
        heliocentric,
        equatorial: Equatorial::from_cartesian(Cartesian3::from_vector3(rotated)),
        distance: solution.distance,
        radius: heliocentric.magnitude(),
        earth_distance: earth.r,
        light_time: solution.light_time,
    })
}

/// Astrometric place at the context's instant
pub fn astrometric(ctx: &SkyContext, elements: OrbitalElements) -> Result<AstrometricPosition> {
    let earth = ctx.get(earth_heliocentric)?;
    astrometric_position(&elements, ctx.jde(), &earth)
}

/// Apparent place at the context's instant
pub fn apparent(ctx: &SkyContext, elements: OrbitalElements) -> Result<Equatorial> {
    let astrometric = ctx.get1(astrometric, elements)?;
    let precession = precessionlib::elements_fk5(elements.equinox, ctx.jde());
    let mean = precessionlib::equatorial_coordinates(&astrometric.equatorial, &precession);
    let epsilon = ctx.epsilon();
    Ok(mean
        + nutationlib::equatorial_effect(&mean, &ctx.nutation(), epsilon)
        + aberrationlib::equatorial_effect(&mean, &ctx.aberration(), epsilon))
}

impl CelestialObject for MinorBody {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn equatorial(&self, ctx: &SkyContext) -> Result<Equatorial> {
        ctx.get1(apparent, self.elements)
    }

    fn magnitude(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let pos = ctx.get1(astrometric, self.elements)?;
        let i = appearance::phase_angle(pos.radius, pos.distance, pos.earth_distance);
        Ok(Some(self.magnitude_model.magnitude(pos.radius, pos.distance, i)))
    }

    fn distance(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(ctx.get1(astrometric, self.elements)?.distance))
    }

    fn phase_angle(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let pos = ctx.get1(astrometric, self.elements)?;
        Ok(Some(appearance::phase_angle(pos.radius, pos.distance, pos.earth_distance)))
    }

    fn elongation(&self, ctx: &SkyContext) -> Result<Option<f64>> {
        let pos = ctx.get1(astrometric, self.elements)?;
        Ok(Some(appearance::elongation(pos.radius, pos.distance, pos.earth_distance)))
    }

    fn parallax(&self, ctx: &SkyContext) -> Result<f64> {
        let distance = ctx.get1(astrometric, self.elements)?.distance;
        Ok(crate::earthlib::horizontal_parallax(distance))
    }

    fn ephemeris_keys(&self) -> Vec<EphemerisKey> {
        vec![
            EphemerisKey::RightAscension,
            EphemerisKey::Declination,
            EphemerisKey::Azimuth,
            EphemerisKey::Altitude,
            EphemerisKey::Distance,
            EphemerisKey::Magnitude,
            EphemerisKey::PhaseAngle,
            EphemerisKey::Elongation,
            EphemerisKey::Rise,
            EphemerisKey::Transit,
            EphemerisKey::Set,
        ]
    }

    fn extra_info(&self, ctx: &SkyContext, table: &mut InfoTable) -> Result<()> {
        let el = &self.elements;
        let kind = match el.kind() {
            OrbitKind::Elliptic => "Elliptic",
            OrbitKind::Parabolic => "Parabolic",
            OrbitKind::Hyperbolic => "Hyperbolic",
        };
        table.push(
            InfoSection::new("Orbit")
                .text("Type", kind)
                .value("Perihelion distance", el.perihelion_distance, FormatHint::AstronomicalUnits)
                .value("Eccentricity", el.eccentricity, FormatHint::Fraction)
                .value("Inclination", el.inclination, FormatHint::Degrees)
                .optional("Period", el.period(), FormatHint::Days)
                .value(
                    "Radius vector",
                    ctx.get1(astrometric, *el)?.radius,
                    FormatHint::AstronomicalUnits,
                ),
        );
        Ok(())
    }
}
