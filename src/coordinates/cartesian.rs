//! # Rectangular Coordinate Module
//!
//! [`Cartesian3`] is the intermediate format used wherever positions are
//! combined as vectors: heliocentric planet and Earth positions, orbital
//! positions from Keplerian elements, and frame rotations.
//!
//! ## Axis Convention
//!
//! The axes follow whichever reference plane the producer uses:
//! - **Ecliptic frames**: X toward the equinox, Z toward the ecliptic pole
//! - **Equatorial frames**: X toward the equinox, Z toward the celestial pole
//!
//! Spherical conversions take and return degrees, matching the rest of the
//! crate.
//!
//! ## Examples
//!
//! ```rust
//! use stargazer::coordinates::cartesian::Cartesian3;
//!
//! // Sun-to-planet minus Sun-to-Earth gives Earth-to-planet
//! let planet = Cartesian3::new(0.6, 0.4, 0.0);
//! let earth = Cartesian3::new(1.0, 0.0, 0.0);
//! let geocentric = planet - earth;
//! assert!((geocentric.magnitude() - 0.565685).abs() < 1e-6);
//! ```

use nalgebra::Vector3;

/// Three-dimensional rectangular coordinates
///
/// Represents either a direction (unit vector) or a position with distance
/// information. Units are those of the producer, usually AU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian3 {
    /// X-component (toward the equinox)
    pub x: f64,
    /// Y-component (90° east along the reference plane)
    pub y: f64,
    /// Z-component (toward the pole of the reference plane)
    pub z: f64,
}

impl Cartesian3 {
    /// Creates a new rectangular coordinate
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stargazer::coordinates::cartesian::Cartesian3;
    ///
    /// let coord = Cartesian3::new(1.0, 0.0, 0.0);
    /// assert_eq!(coord.x, 1.0);
    /// ```
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Creates rectangular coordinates from spherical ones
    ///
    /// # Arguments
    ///
    /// * `longitude` - Longitude-like angle in degrees (α, λ or l)
    /// * `latitude` - Latitude-like angle in degrees (δ, β or b)
    /// * `distance` - Distance from origin (1.0 for unit vectors)
    ///
    /// # Mathematical Conversion
    ///
    /// - `x = distance * cos(lat) * cos(lon)`
    /// - `y = distance * cos(lat) * sin(lon)`
    /// - `z = distance * sin(lat)`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stargazer::coordinates::cartesian::Cartesian3;
    ///
    /// let pole = Cartesian3::from_spherical(0.0, 90.0, 1.0);
    /// assert!(pole.x.abs() < 1e-15);
    /// assert!((pole.z - 1.0).abs() < 1e-15);
    /// ```
    pub fn from_spherical(longitude: f64, latitude: f64, distance: f64) -> Self {
        let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
        let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
        Cartesian3 {
            x: distance * cos_lat * cos_lon,
            y: distance * cos_lat * sin_lon,
            z: distance * sin_lat,
        }
    }

    /// Converts to spherical coordinates
    ///
    /// Returns `(longitude, latitude, distance)` with longitude in `[0, 360)`
    /// degrees and latitude in `[-90, 90]` degrees. The zero vector maps to
    /// `(0, 0, 0)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stargazer::coordinates::cartesian::Cartesian3;
    ///
    /// let (lon, lat, dist) = Cartesian3::new(0.0, -2.0, 0.0).to_spherical();
    /// assert_eq!(lon, 270.0);
    /// assert_eq!(lat, 0.0);
    /// assert_eq!(dist, 2.0);
    /// ```
    pub fn to_spherical(&self) -> (f64, f64, f64) {
        let distance = self.magnitude();

        if distance == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let latitude = (self.z / distance).clamp(-1.0, 1.0).asin().to_degrees();
        let longitude = if self.x == 0.0 && self.y == 0.0 {
            0.0 // Arbitrary choice at poles
        } else {
            super::angle::to360(self.y.atan2(self.x).to_degrees())
        };

        (longitude, latitude, distance)
    }

    /// Euclidean length of the vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Dot product with another vector
    pub fn dot(&self, other: &Cartesian3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another vector
    pub fn cross(&self, other: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Angle between two direction vectors in degrees `[0, 180]`
    ///
    /// Computed as `atan2(|a × b|, a · b)`, which does not lose precision
    /// near 0° or 180° the way `acos` does.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stargazer::coordinates::cartesian::Cartesian3;
    ///
    /// let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
    /// let y_axis = Cartesian3::new(0.0, 3.0, 0.0);
    /// assert!((x_axis.angle_to(&y_axis) - 90.0).abs() < 1e-12);
    /// ```
    pub fn angle_to(&self, other: &Cartesian3) -> f64 {
        let cross = self.cross(other).magnitude();
        let dot = self.dot(other);
        if cross == 0.0 && dot == 0.0 {
            return 0.0;
        }
        cross.atan2(dot).to_degrees()
    }

    /// Convert to a nalgebra vector for matrix operations
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Build from a nalgebra vector
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3 {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }
}

// Arithmetic operations for convenience
impl std::ops::Add for Cartesian3 {
    type Output = Cartesian3;

    fn add(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Cartesian3 {
    type Output = Cartesian3;

    fn sub(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn mul(self, scalar: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_spherical_roundtrip_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let lon: f64 = rng.gen_range(0.0..360.0);
            let lat: f64 = rng.gen_range(-89.9..89.9);
            let dist: f64 = rng.gen_range(0.1..50.0);
            let (lon2, lat2, dist2) = Cartesian3::from_spherical(lon, lat, dist).to_spherical();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
            assert_relative_eq!(dist2, dist, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_vector() {
        let zero = Cartesian3::new(0.0, 0.0, 0.0);
        assert_eq!(zero.to_spherical(), (0.0, 0.0, 0.0));
        assert_eq!(zero.angle_to(&zero), 0.0);
    }

    #[test]
    fn test_cross_product_right_handed() {
        let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
        let y_axis = Cartesian3::new(0.0, 1.0, 0.0);
        assert_eq!(x_axis.cross(&y_axis), Cartesian3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_small_angle_precision() {
        let a = Cartesian3::from_spherical(10.0, 20.0, 1.0);
        let b = Cartesian3::from_spherical(10.0, 20.0 + 1e-7, 1.0);
        assert_relative_eq!(a.angle_to(&b), 1e-7, max_relative = 1e-5);
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let c = Cartesian3::new(1.5, -2.0, 0.25);
        assert_eq!(Cartesian3::from_vector3(c.to_vector3()), c);
        assert_eq!((c + c - c) * 2.0, Cartesian3::new(3.0, -4.0, 0.5));
    }
}
