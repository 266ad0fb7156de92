//! Stars and deep-sky objects
//!
//! Catalog places are mean places at J2000.0. The apparent place adds proper
//! motion, precession to the date, nutation and annual aberration.

use super::CelestialObject;
use crate::aberrationlib;
use crate::catalogs::{CatalogStar, DeepSkyObject, ProperMotion};
use crate::constants::{DAYS_PER_JULIAN_YEAR, J2000};
use crate::context::SkyContext;
use crate::coordinates::Equatorial;
use crate::ephemeris::{EphemerisKey, FormatHint, InfoSection, InfoTable};
use crate::nutationlib;
use crate::precessionlib::{self, PrecessionalElements};
use crate::Result;

/// Precession angles from J2000.0 to the context's instant
pub fn precession_from_j2000(ctx: &SkyContext) -> PrecessionalElements {
    precessionlib::elements_fk5(J2000, ctx.jde())
}

/// Mean place at a Julian Ephemeris Day: proper motion plus precession
pub fn mean_place(eq0: &Equatorial, pm: &ProperMotion, jde: f64) -> Equatorial {
    mean_place_with(eq0, pm, jde, &precessionlib::elements_fk5(J2000, jde))
}

fn mean_place_with(
    eq0: &Equatorial,
    pm: &ProperMotion,
    jde: f64,
    precession: &PrecessionalElements,
) -> Equatorial {
    let years = (jde - J2000) / DAYS_PER_JULIAN_YEAR;
    let moved = Equatorial::new(
        eq0.alpha + pm.alpha * years / 3600.0,
        eq0.delta + pm.delta * years / 3600.0,
    );
    precessionlib::equatorial_coordinates(&moved, precession)
}

/// Apparent place of a J2000.0 catalog position at the context's instant
pub fn apparent_place(eq0: &Equatorial, pm: &ProperMotion, ctx: &SkyContext) -> Equatorial {
    let precession = ctx.get(precession_from_j2000);
    let mean = mean_place_with(eq0, pm, ctx.jde(), &precession);
    let epsilon = ctx.epsilon();
    let nutation = nutationlib::equatorial_effect(&mean, &ctx.nutation(), epsilon);
    let aberration = aberrationlib::equatorial_effect(&mean, &ctx.aberration(), epsilon);
    mean + nutation + aberration
}

fn fixed_object_keys() -> Vec<EphemerisKey> {
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

impl CelestialObject for CatalogStar {
    fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{}", self.id))
    }

    fn equatorial(&self, ctx: &SkyContext) -> Result<Equatorial> {
        Ok(apparent_place(&self.equatorial0, &self.proper_motion, ctx))
    }

    fn magnitude(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(Some(self.magnitude))
    }

    fn ephemeris_keys(&self) -> Vec<EphemerisKey> {
        fixed_object_keys()
    }

    fn extra_info(&self, _ctx: &SkyContext, table: &mut InfoTable) -> Result<()> {
        let mut section = InfoSection::new("Catalog")
            .value("J2000 right ascension", self.equatorial0.alpha, FormatHint::RightAscension)
            .value("J2000 declination", self.equatorial0.delta, FormatHint::Declination)
            .value("Proper motion in RA", self.proper_motion.alpha, FormatHint::Arcseconds)
            .value("Proper motion in Dec", self.proper_motion.delta, FormatHint::Arcseconds);
        if let Some(class) = &self.spectral_class {
            section = section.text("Spectral class", class);
        }
        table.push(section);
        Ok(())
    }
}

impl CelestialObject for DeepSkyObject {
    fn name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.id, name),
            None => self.id.clone(),
        }
    }

    fn equatorial(&self, ctx: &SkyContext) -> Result<Equatorial> {
        Ok(apparent_place(&self.equatorial0, &ProperMotion::default(), ctx))
    }

    fn magnitude(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(self.magnitude)
    }

    /// Half the major axis
    fn semidiameter(&self, _ctx: &SkyContext) -> Result<Option<f64>> {
        Ok(self.size_arcmin.map(|(major, _)| major * 30.0))
    }

    fn ephemeris_keys(&self) -> Vec<EphemerisKey> {
        fixed_object_keys()
    }

    fn extra_info(&self, _ctx: &SkyContext, table: &mut InfoTable) -> Result<()> {
        let mut section = InfoSection::new("Catalog")
            .text("Type", self.kind.name())
            .value("J2000 right ascension", self.equatorial0.alpha, FormatHint::RightAscension)
            .value("J2000 declination", self.equatorial0.delta, FormatHint::Declination);
        if let Some((major, minor)) = self.size_arcmin {
            section = section
                .value("Major axis", major * 60.0, FormatHint::Arcseconds)
                .value("Minor axis", minor * 60.0, FormatHint::Arcseconds);
        }
        table.push(section);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::almanac::riseset::VisibilityState;
    use crate::catalogs::DeepSkyKind;
    use crate::earthlib::GeoLocation;
    use approx::assert_relative_eq;

    const ARCSEC: f64 = 1.0 / 3600.0;

    fn theta_persei() -> CatalogStar {
        CatalogStar {
            id: 13_005,
            name: Some("θ Persei".to_string()),
            equatorial0: Equatorial::new(41.0499417, 49.2284667),
            magnitude: 4.12,
            proper_motion: ProperMotion::from_time_seconds(0.03425, -0.0895),
            spectral_class: Some("F7V".to_string()),
        }
    }

    #[test]
    fn test_theta_persei_mean_place() {
        let star = theta_persei();
        let mean = mean_place(&star.equatorial0, &star.proper_motion, 2462088.69);
        assert_relative_eq!(mean.alpha, 41.547214, epsilon = 0.05 * ARCSEC);
        assert_relative_eq!(mean.delta, 49.348483, epsilon = 0.05 * ARCSEC);
    }

    #[test]
    fn test_theta_persei_apparent_place() {
        let ctx = SkyContext::from_jde(2462088.69, GeoLocation::new(0.0, 0.0));
        let eq = theta_persei().equatorial(&ctx).unwrap();
        assert_relative_eq!(eq.alpha, 41.559958, epsilon = 0.5 * ARCSEC);
        assert_relative_eq!(eq.delta, 49.352069, epsilon = 0.5 * ARCSEC);
    }

    #[test]
    fn test_names() {
        let mut star = theta_persei();
        assert_eq!(CelestialObject::name(&star), "θ Persei");
        star.name = None;
        assert_eq!(CelestialObject::name(&star), "#13005");
    }

    #[test]
    fn test_circumpolar_star() {
        // Polaris from Oslo never sets
        let polaris = CatalogStar {
            id: 11_767,
            name: Some("Polaris".to_string()),
            equatorial0: Equatorial::new(37.95456, 89.26411),
            magnitude: 1.98,
            proper_motion: ProperMotion::default(),
            spectral_class: None,
        };
        let ctx = SkyContext::new(2459000.5, GeoLocation::new(-10.75, 59.91));
        let rts = polaris.rise_transit_set(&ctx).unwrap();
        assert_eq!(rts.state, VisibilityState::Circumpolar);
        assert_eq!(
            polaris.ephemeris_value(&ctx, EphemerisKey::Rise).unwrap(),
            None
        );
    }

    #[test]
    fn test_deep_sky_object() {
        let m31 = DeepSkyObject {
            id: "M31".to_string(),
            name: Some("Andromeda Galaxy".to_string()),
            kind: DeepSkyKind::Galaxy,
            equatorial0: Equatorial::new(10.68471, 41.26875),
            magnitude: Some(3.44),
            size_arcmin: Some((190.0, 60.0)),
        };
        let ctx = SkyContext::new(2459000.5, GeoLocation::new(0.0, 51.4769));
        assert_eq!(CelestialObject::name(&m31), "M31 (Andromeda Galaxy)");
        assert_eq!(m31.semidiameter(&ctx).unwrap(), Some(5700.0));
        let info = m31.info(&ctx).unwrap();
        assert!(info.get("Type").is_some());
        assert!(info.get("Major axis").is_some());
    }
}
