//! Laws and textbook examples checked through the public API

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use stargazer::almanac::VisibilityState;
use stargazer::coordinates::angle::{to360, Dms, Hms};
use stargazer::planetlib::light_time_iterate;
use stargazer::precessionlib::{elements_fk5, equatorial_coordinates};
use stargazer::{CelestialBody, Equatorial, GeoLocation, SkyContext, SkyError};

#[rstest]
#[case(-30.0, 330.0)]
#[case(360.0, 0.0)]
#[case(725.5, 5.5)]
#[case(-720.0, 0.0)]
fn test_to360_cases(#[case] input: f64, #[case] expected: f64) {
    assert_relative_eq!(to360(input), expected, epsilon = 1e-12);
}

#[test]
fn test_to360_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(360);
    for _ in 0..1000 {
        let x = rng.gen_range(-1.0e5..1.0e5);
        let once = to360(x);
        assert!((0.0..360.0).contains(&once), "{} -> {}", x, once);
        assert_eq!(to360(once), once);
    }
}

#[test]
fn test_sexagesimal_roundtrip() {
    let mut rng = StdRng::seed_from_u64(60);
    for _ in 0..1000 {
        let alpha = rng.gen_range(0.0..360.0);
        let delta = rng.gen_range(-90.0..90.0);
        assert!((Hms::from_degrees(alpha).to_degrees() - alpha).abs() * 3600.0 < 0.01);
        assert!((Dms::from_degrees(delta).to_degrees() - delta).abs() * 3600.0 < 0.01);
    }
}

#[test]
fn test_zero_interval_precession_is_identity() {
    let mut rng = StdRng::seed_from_u64(2000);
    for _ in 0..200 {
        let jd = rng.gen_range(2_200_000.0..2_700_000.0);
        let eq = Equatorial::new(rng.gen_range(0.0..360.0), rng.gen_range(-89.0..89.0));
        let same = equatorial_coordinates(&eq, &elements_fk5(jd, jd));
        assert!(eq.angular_separation(&same) < 1e-9);
    }
}

#[test]
fn test_horizontal_example_and_inverse() {
    // Venus from the US Naval Observatory, 1987 April 10, 19h21m UT
    let washington = GeoLocation::new(77.0656, 38.9214);
    let alpha = Hms {
        negative: false,
        hours: 23,
        minutes: 9,
        seconds: 16.641,
    };
    let delta = Dms {
        negative: true,
        degrees: 6,
        minutes: 43,
        seconds: 11.61,
    };
    let venus = Equatorial::new(alpha.to_degrees(), delta.to_degrees());
    let theta0 = 128.7369091;

    let horizontal = venus.to_horizontal(&washington, theta0);
    assert_relative_eq!(horizontal.altitude, 15.1249, epsilon = 1e-4);
    assert_relative_eq!(horizontal.azimuth, 68.0336, epsilon = 1e-4);

    let back = horizontal.to_equatorial(&washington, theta0);
    assert!(venus.angular_separation(&back) * 3600.0 < 0.1);
}

#[test]
fn test_runaway_light_time_is_reported() {
    // Every pass doubles the light time, so it never settles
    let jde = 2451545.0;
    let result = light_time_iterate(jde, |t| {
        let tau = jde - t;
        Ok(((), (2.0 * tau + 1.0) * stargazer::constants::C_AUDAY))
    });
    assert!(matches!(result, Err(SkyError::NoConvergence { .. })));
}

#[test]
fn test_sun_through_context() {
    // Meeus example 25.b, 1992 October 13.0 TD
    let ctx = SkyContext::from_jde(2448908.5, GeoLocation::new(0.0, 0.0));
    let sun: CelestialBody = "sun".parse().unwrap();
    let eq = sun.equatorial(&ctx).unwrap();
    assert_relative_eq!(eq.alpha, 198.378178, epsilon = 1.0 / 3600.0);
    assert_relative_eq!(eq.delta, -7.783871, epsilon = 1.0 / 3600.0);
}

#[test]
fn test_moon_through_context() {
    // Meeus example 47.a, 1992 April 12.0 TD
    let ctx = SkyContext::from_jde(2448724.5, GeoLocation::new(0.0, 0.0));
    let moon: CelestialBody = "Moon".parse().unwrap();
    let eq = moon.equatorial(&ctx).unwrap();
    assert_relative_eq!(eq.alpha, 134.688470, epsilon = 2.0 / 3600.0);
    assert_relative_eq!(eq.delta, 13.768368, epsilon = 2.0 / 3600.0);
    assert_relative_eq!(moon.distance(&ctx).unwrap().unwrap(), 368409.7, epsilon = 1.0);
}

#[test]
fn test_sun_day_length_at_equinox() {
    // Near an equinox the day is close to twelve hours everywhere
    let ctx = SkyContext::new(2460389.5, GeoLocation::new(-10.0, 45.0));
    let sun: CelestialBody = "sun".parse().unwrap();
    let rts = sun.rise_transit_set(&ctx).unwrap();
    assert_eq!(rts.state, VisibilityState::Regular);
    let length = rts.duration * 24.0;
    assert!((12.0..12.4).contains(&length), "day lasts {} h", length);
}
