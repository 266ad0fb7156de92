//! Shared evaluation of derived quantities through `SkyContext`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use approx::assert_relative_eq;
use stargazer::celestial::planets;
use stargazer::{CelestialBody, CelestialObject, GeoLocation, Planet, SkyContext};

static EVALUATIONS: AtomicUsize = AtomicUsize::new(0);

fn counted_mars_distance(ctx: &SkyContext, scale: u32) -> f64 {
    EVALUATIONS.fetch_add(1, Ordering::SeqCst);
    let position = ctx.get1(planets::position, Planet::Mars).expect("Mars has a position");
    position.geometric.distance * f64::from(scale)
}

fn greenwich() -> GeoLocation {
    GeoLocation::new(0.0, 51.4769)
}

#[test]
fn test_formula_runs_once_per_argument() {
    let mut ctx = SkyContext::new(2460310.5, greenwich());
    let before = EVALUATIONS.load(Ordering::SeqCst);

    let first = ctx.get1(counted_mars_distance, 1);
    let again = ctx.get1(counted_mars_distance, 1);
    assert_eq!(first.to_bits(), again.to_bits());
    assert_eq!(EVALUATIONS.load(Ordering::SeqCst) - before, 1);

    assert_relative_eq!(ctx.get1(counted_mars_distance, 2), 2.0 * first);
    assert_eq!(EVALUATIONS.load(Ordering::SeqCst) - before, 2);

    ctx.set_julian_day(2460311.5);
    let next_day = ctx.get1(counted_mars_distance, 1);
    assert_eq!(EVALUATIONS.load(Ordering::SeqCst) - before, 3);
    assert!((next_day - first).abs() > 1e-6);
}

#[test]
fn test_quantities_share_positions() {
    let ctx = SkyContext::new(2460310.5, greenwich());
    let jupiter = CelestialBody::Planet(Planet::Jupiter);

    jupiter.equatorial(&ctx).unwrap();
    let after_position = ctx.cache_len();
    assert!(after_position > 0);

    // Repeating a query adds nothing
    jupiter.equatorial(&ctx).unwrap();
    assert_eq!(ctx.cache_len(), after_position);

    // Magnitude and phase reuse the cached geometry
    let magnitude = jupiter.magnitude(&ctx).unwrap().unwrap();
    let phase = jupiter.phase(&ctx).unwrap().unwrap();
    assert!(magnitude < -1.5);
    assert!(phase > 0.98);

    let after_appearance = ctx.cache_len();
    jupiter.info(&ctx).unwrap();
    let after_info = ctx.cache_len();
    jupiter.info(&ctx).unwrap();
    assert_eq!(ctx.cache_len(), after_info);
    assert!(after_info >= after_appearance);
}

#[test]
fn test_fast_preference_changes_results() {
    let mut ctx = SkyContext::new(2460310.5, greenwich());
    let high = Planet::Saturn.equatorial(&ctx).unwrap();
    ctx.set_prefer_fast_calculation(true);
    assert_eq!(ctx.cache_len(), 0);
    let fast = Planet::Saturn.equatorial(&ctx).unwrap();

    let separation = high.angular_separation(&fast) * 3600.0;
    assert!(separation > 0.0);
    assert!(separation < 20.0, "fast tier off by {}″", separation);
}

#[test]
fn test_one_context_per_thread() {
    let instants: Vec<f64> = (0..8).map(|i| 2460310.5 + 3.0 * i as f64).collect();

    let sequential: Vec<_> = instants
        .iter()
        .map(|&jd| Planet::Mars.equatorial(&SkyContext::new(jd, greenwich())).unwrap())
        .collect();

    let parallel: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = instants
            .iter()
            .map(|&jd| {
                scope.spawn(move || {
                    let ctx = SkyContext::new(jd, greenwich());
                    Planet::Mars.equatorial(&ctx).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
