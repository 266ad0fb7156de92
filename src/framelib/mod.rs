//! Reference frame rotations
//!
//! Rotation matrices follow the "rotate the frame" convention: applying
//! `rot_x(θ)` to a vector gives its components in a frame turned by `θ`
//! degrees about the x axis.

pub mod inertial;

pub use inertial::InertialFrame;

use lazy_static::lazy_static;
use nalgebra::Matrix3;

use crate::constants::OBLIQUITY_J2000;

/// Frame rotation about the x axis by `angle` degrees
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.to_radians().sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Frame rotation about the y axis by `angle` degrees
pub fn rot_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.to_radians().sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Frame rotation about the z axis by `angle` degrees
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.to_radians().sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Ecliptic-to-equatorial rotation for an obliquity `epsilon` in degrees
pub fn ecliptic_to_equatorial(epsilon: f64) -> Matrix3<f64> {
    rot_x(-epsilon)
}

lazy_static! {
    /// Mean ecliptic and equinox of J2000.0 to the J2000.0 equator
    pub static ref ECLIPTIC_J2000_TO_EQUATORIAL: Matrix3<f64> =
        ecliptic_to_equatorial(OBLIQUITY_J2000);

    /// J2000.0 equator to the IAU galactic system (Hipparcos realization)
    pub static ref EQUATORIAL_J2000_TO_GALACTIC: Matrix3<f64> = Matrix3::new(
        -0.054_875_560_416_215_4, -0.873_437_090_234_885_0, -0.483_835_015_548_713_2,
        0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9,
        -0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_rotations_are_orthonormal() {
        for m in [rot_x(23.4), rot_y(-71.0), rot_z(190.0), *EQUATORIAL_J2000_TO_GALACTIC] {
            let product = m * m.transpose();
            assert_relative_eq!(product, Matrix3::identity(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_frame_rotation_sense() {
        // Turning the frame by +90 about z moves the old y axis onto the new x axis
        let v = rot_z(90.0) * Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(v, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-15);
    }
}
