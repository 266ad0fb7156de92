//! Coordinate systems used by the calculators
//!
//! Spherical types live in [`spherical`], the rectangular intermediate in
//! [`cartesian`], angle helpers in [`angle`] and the date-dependent
//! conversions between systems in [`transforms`].

pub mod angle;
pub mod cartesian;
pub mod spherical;
pub mod transforms;

pub use cartesian::Cartesian3;
pub use spherical::{
    Ecliptical, EclipticalDelta, Equatorial, EquatorialDelta, Galactic, Heliocentrical,
    Horizontal,
};
