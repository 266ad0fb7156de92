//! Catalog records consumed by the calculators
//!
//! Parsing catalog files happens elsewhere; this module only defines the
//! shapes the core expects once records are loaded, plus a small in-memory
//! container with the usual lookups.

use serde::{Deserialize, Serialize};

use crate::coordinates::Equatorial;
use crate::orbitlib::OrbitalElements;

/// Annual proper motion of a star
///
/// `alpha` is the change of right ascension itself (not μα·cos δ); both
/// components are in arcseconds per Julian year.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProperMotion {
    pub alpha: f64,
    pub delta: f64,
}

impl ProperMotion {
    /// From a right-ascension rate in seconds of time per year
    pub fn from_time_seconds(alpha_seconds: f64, delta_arcsec: f64) -> Self {
        Self {
            alpha: alpha_seconds * 15.0,
            delta: delta_arcsec,
        }
    }
}

/// A star from a positional catalog, J2000 mean place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStar {
    pub id: u32,
    pub name: Option<String>,
    /// Mean equatorial coordinates at J2000.0
    pub equatorial0: Equatorial,
    /// Visual magnitude
    pub magnitude: f64,
    #[serde(default)]
    pub proper_motion: ProperMotion,
    pub spectral_class: Option<String>,
}

/// Morphological class of a deep-sky object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeepSkyKind {
    Galaxy,
    OpenCluster,
    GlobularCluster,
    EmissionNebula,
    PlanetaryNebula,
    DarkNebula,
    Other,
}

impl DeepSkyKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeepSkyKind::Galaxy => "Galaxy",
            DeepSkyKind::OpenCluster => "Open cluster",
            DeepSkyKind::GlobularCluster => "Globular cluster",
            DeepSkyKind::EmissionNebula => "Emission nebula",
            DeepSkyKind::PlanetaryNebula => "Planetary nebula",
            DeepSkyKind::DarkNebula => "Dark nebula",
            DeepSkyKind::Other => "Other",
        }
    }
}

/// A deep-sky object (NGC/IC style record), J2000 mean place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepSkyObject {
    /// Catalog designation, e.g. "NGC 224"
    pub id: String,
    pub name: Option<String>,
    pub kind: DeepSkyKind,
    pub equatorial0: Equatorial,
    pub magnitude: Option<f64>,
    /// Major and minor angular size in arcminutes
    pub size_arcmin: Option<(f64, f64)>,
}

/// Photometric model of a minor body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MagnitudeModel {
    /// Asteroid with absolute magnitude H and slope parameter G
    Asteroid { h: f64, g: f64 },
    /// Comet with absolute magnitude g and activity parameter k
    Comet { g: f64, k: f64 },
}

impl MagnitudeModel {
    /// Apparent magnitude at heliocentric distance `r` and geocentric
    /// distance `delta` (AU), phase angle in degrees
    pub fn magnitude(&self, r: f64, delta: f64, phase_angle: f64) -> f64 {
        match *self {
            MagnitudeModel::Asteroid { h, g } => {
                let tan_half = (phase_angle.to_radians() / 2.0).tan().abs();
                let phi1 = (-3.33 * tan_half.powf(0.63)).exp();
                let phi2 = (-1.87 * tan_half.powf(1.22)).exp();
                h + 5.0 * (r * delta).log10() - 2.5 * ((1.0 - g) * phi1 + g * phi2).log10()
            }
            MagnitudeModel::Comet { g, k } => g + 5.0 * delta.log10() + k * r.log10(),
        }
    }
}

/// An asteroid or comet with osculating elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinorBody {
    pub name: String,
    pub elements: OrbitalElements,
    pub magnitude_model: MagnitudeModel,
}

/// Common view of a catalog record
pub trait CatalogEntry {
    /// Identifier used for lookups
    fn designation(&self) -> String;

    /// Mean place at the catalog epoch
    fn equatorial0(&self) -> Equatorial;

    fn magnitude(&self) -> Option<f64>;
}

impl CatalogEntry for CatalogStar {
    fn designation(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{}", self.id))
    }

    fn equatorial0(&self) -> Equatorial {
        self.equatorial0
    }

    fn magnitude(&self) -> Option<f64> {
        Some(self.magnitude)
    }
}

impl CatalogEntry for DeepSkyObject {
    fn designation(&self) -> String {
        self.id.clone()
    }

    fn equatorial0(&self) -> Equatorial {
        self.equatorial0
    }

    fn magnitude(&self) -> Option<f64> {
        self.magnitude
    }
}

/// Generic trait for all catalogs of fixed objects
pub trait SkyCatalog {
    /// Entry type for this catalog
    type Entry: CatalogEntry;

    fn entries(&self) -> &[Self::Entry];

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry by designation, ignoring case
    fn find(&self, designation: &str) -> Option<&Self::Entry> {
        self.entries()
            .iter()
            .find(|e| e.designation().eq_ignore_ascii_case(designation))
    }

    /// Filter entries based on a predicate
    fn filter<F>(&self, predicate: F) -> Vec<&Self::Entry>
    where
        F: Fn(&Self::Entry) -> bool,
    {
        self.entries().iter().filter(|e| predicate(e)).collect()
    }

    /// Entries at or brighter than a magnitude; entries without one are skipped
    fn brighter_than(&self, magnitude: f64) -> Vec<&Self::Entry> {
        self.filter(|e| e.magnitude().is_some_and(|m| m <= magnitude))
    }

    /// Entries within `radius` degrees of `center`
    fn in_field(&self, center: &Equatorial, radius: f64) -> Vec<&Self::Entry> {
        self.filter(|e| e.equatorial0().angular_separation(center) <= radius)
    }
}

/// In-memory catalog of already parsed records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog<T> {
    pub name: String,
    entries: Vec<T>,
}

impl<T> Catalog<T> {
    pub fn new(name: impl Into<String>, entries: Vec<T>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }
}

impl<T: CatalogEntry> SkyCatalog for Catalog<T> {
    type Entry = T;

    fn entries(&self) -> &[T] {
        &self.entries
    }
}

pub type StarCatalog = Catalog<CatalogStar>;
pub type DeepSkyCatalog = Catalog<DeepSkyObject>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::distributions::{Distribution, Uniform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn star(id: u32, alpha: f64, delta: f64, magnitude: f64) -> CatalogStar {
        CatalogStar {
            id,
            name: None,
            equatorial0: Equatorial::new(alpha, delta),
            magnitude,
            proper_motion: ProperMotion::default(),
            spectral_class: None,
        }
    }

    fn random_catalog(count: usize, seed: u64) -> StarCatalog {
        let mut rng = StdRng::seed_from_u64(seed);
        let ra = Uniform::from(0.0..360.0);
        let sin_dec = Uniform::from(-1.0..1.0);
        let mag = Uniform::from(-1.0..8.0);
        let stars = (0..count as u32)
            .map(|id| {
                let delta = f64::asin(sin_dec.sample(&mut rng)).to_degrees();
                star(id, ra.sample(&mut rng), delta, mag.sample(&mut rng))
            })
            .collect();
        Catalog::new("random", stars)
    }

    #[test]
    fn test_lookups() {
        let mut catalog = Catalog::new(
            "test",
            vec![
                star(1, 101.287, -16.716, -1.46),
                star(2, 95.988, -52.696, -0.74),
                star(3, 279.234, 38.784, 0.03),
            ],
        );
        catalog.push(CatalogStar {
            name: Some("Polaris".to_string()),
            ..star(4, 37.955, 89.264, 1.98)
        });

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.brighter_than(0.0).len(), 2);
        assert_eq!(catalog.find("polaris").map(|s| s.id), Some(4));
        assert_eq!(catalog.find("#3").map(|s| s.id), Some(3));
        assert!(catalog.find("Vega").is_none());
    }

    #[test]
    fn test_field_query_matches_brute_force() {
        let catalog = random_catalog(2000, 42);
        let center = Equatorial::new(83.8, -5.4);
        let field = catalog.in_field(&center, 10.0);
        let expected = catalog
            .entries()
            .iter()
            .filter(|s| s.equatorial0.angular_separation(&center) <= 10.0)
            .count();
        assert_eq!(field.len(), expected);
        // A 10° cap holds about 0.76% of the sphere
        assert!(field.len() > 5 && field.len() < 40);
    }

    #[test]
    fn test_asteroid_magnitude() {
        // At opposition the phase function is 1
        let m = MagnitudeModel::Asteroid { h: 3.34, g: 0.12 };
        assert_relative_eq!(m.magnitude(2.0, 1.0, 0.0), 3.34 + 5.0 * 2f64.log10(), epsilon = 1e-12);
        assert!(m.magnitude(2.0, 1.0, 20.0) > m.magnitude(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_comet_magnitude() {
        // Comet Encke on 1990 October 6: m = 5.5 + 5 log Δ + 10 log r
        let m = MagnitudeModel::Comet { g: 5.5, k: 10.0 };
        let expected = 5.5 + 5.0 * 0.82354_f64.log10() + 10.0 * 0.62775_f64.log10();
        assert_relative_eq!(m.magnitude(0.62775, 0.82354, 0.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_deep_sky_designation() {
        let m31 = DeepSkyObject {
            id: "NGC 224".to_string(),
            name: Some("Andromeda Galaxy".to_string()),
            kind: DeepSkyKind::Galaxy,
            equatorial0: Equatorial::new(10.6847, 41.2690),
            magnitude: Some(3.44),
            size_arcmin: Some((190.0, 60.0)),
        };
        let catalog: DeepSkyCatalog = Catalog::new("NGC", vec![m31]);
        assert_eq!(catalog.find("ngc 224").map(|o| o.kind), Some(DeepSkyKind::Galaxy));
        assert_eq!(DeepSkyKind::Galaxy.name(), "Galaxy");
    }
}
