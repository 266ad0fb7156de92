//! Stargazer: apparent positions, visibility and events of celestial bodies
//!
//! Positions of the Sun, Moon, planets, stars, deep-sky objects and minor
//! bodies are computed for an observer at a given place and time. Every
//! quantity for one instant is evaluated through a [`SkyContext`], which
//! memoizes intermediate results so that magnitude, phase, parallax and
//! rise/set share the same positions.
//!
//! Angles are in degrees. Geographic longitude is positive west and azimuth
//! is measured from the south, as in Meeus' *Astronomical Algorithms*.
//!
//! ```
//! use stargazer::{CelestialBody, CelestialObject, GeoLocation, SkyContext};
//!
//! let greenwich = GeoLocation::new(0.0, 51.4769);
//! let ctx = SkyContext::new(2451545.0, greenwich);
//! let sun: CelestialBody = "Sun".parse()?;
//! let position = sun.equatorial(&ctx)?;
//! assert!((position.alpha - 281.3).abs() < 0.1);
//! # Ok::<(), stargazer::SkyError>(())
//! ```

use thiserror::Error;

pub mod aberrationlib;
pub mod almanac;
pub mod catalogs;
pub mod celestial;
pub mod config;
pub mod constants;
pub mod context;
pub mod coordinates;
pub mod earthlib;
pub mod ephemeris;
pub mod framelib;
pub mod interpolation;
pub mod moonlib;
pub mod nutationlib;
pub mod orbitlib;
pub mod planetlib;
pub mod precessionlib;
pub mod time;

// Re-export commonly used types
pub use celestial::{CelestialBody, CelestialObject, CelestialPoint};
pub use config::CalculationSettings;
pub use context::SkyContext;
pub use coordinates::{Ecliptical, Equatorial, Horizontal};
pub use earthlib::GeoLocation;
pub use ephemeris::{CancelFlag, EphemerisKey, EphemerisTable};
pub use planetlib::Planet;

/// Main error type for the stargazer library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkyError {
    #[error("{algorithm} did not converge after {iterations} iterations")]
    NoConvergence {
        algorithm: &'static str,
        iterations: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Object not found: {0}")]
    ObjectNotFound(String),
}

/// Result type for stargazer operations
pub type Result<T> = std::result::Result<T, SkyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = SkyError::NoConvergence {
            algorithm: "Kepler equation",
            iterations: 50,
        };
        assert_eq!(e.to_string(), "Kepler equation did not converge after 50 iterations");
        assert_eq!(
            SkyError::ObjectNotFound("Vulcan".into()).to_string(),
            "Object not found: Vulcan"
        );
    }
}
