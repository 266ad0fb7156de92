use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stargazer::almanac::{find_mutual_conjunctions, phase_instant, LunarPhase};
use stargazer::ephemeris::{generate_table, DateRange};
use stargazer::{
    CalculationSettings, CancelFlag, CelestialBody, CelestialObject, EphemerisKey, GeoLocation,
    Planet, SkyContext,
};

const JD: f64 = 2460310.5;

fn settings(fast: bool) -> CalculationSettings {
    CalculationSettings {
        prefer_fast_calculation: fast,
        ..CalculationSettings::default()
    }
}

fn planet_position_bench(c: &mut Criterion) {
    let location = GeoLocation::new(0.0, 51.4769);

    let mut group = c.benchmark_group("planet_position");
    for (label, fast) in [("high", false), ("fast", true)] {
        group.bench_function(label, |b| {
            b.iter(|| {
                let ctx = SkyContext::with_settings(black_box(JD), location, settings(fast));
                for planet in Planet::ALL.iter().filter(|p| **p != Planet::Earth) {
                    planet.equatorial(&ctx).expect("position should succeed");
                }
            })
        });
    }
    group.finish();
}

fn shared_context_bench(c: &mut Criterion) {
    let location = GeoLocation::new(0.0, 51.4769);
    let moon: CelestialBody = "moon".parse().expect("known body");

    c.bench_function("moon_info", |b| {
        b.iter(|| {
            let ctx = SkyContext::new(black_box(JD), location);
            moon.info(&ctx).expect("info should succeed")
        })
    });
}

fn table_bench(c: &mut Criterion) {
    let location = GeoLocation::new(0.0, 51.4769);
    let range = DateRange::new(JD, JD + 30.0, 1.0);
    let keys = [EphemerisKey::RightAscension, EphemerisKey::Declination, EphemerisKey::Magnitude];

    let mut group = c.benchmark_group("ephemeris_table");
    group.sample_size(20);
    group.bench_function("mars_30_days", |b| {
        b.iter(|| {
            generate_table(
                &Planet::Mars,
                &location,
                &settings(false),
                black_box(&range),
                &keys,
                &CancelFlag::new(),
                |_| {},
            )
            .expect("table should build")
        })
    });
    group.finish();
}

fn events_bench(c: &mut Criterion) {
    let location = GeoLocation::new(0.0, 51.4769);

    let mut group = c.benchmark_group("events");
    group.sample_size(10);
    group.bench_function("jupiter_saturn_2020", |b| {
        b.iter(|| {
            find_mutual_conjunctions(
                &[Planet::Jupiter, Planet::Saturn],
                black_box(2459190.5),
                2459220.5,
                &location,
                &settings(true),
                &CancelFlag::new(),
                |_| {},
            )
            .expect("scan should succeed")
        })
    });
    group.bench_function("full_moon", |b| {
        b.iter(|| phase_instant(LunarPhase::Full, black_box(JD), true).expect("phase should converge"))
    });
    group.finish();
}

criterion_group!(
    benches,
    planet_position_bench,
    shared_context_bench,
    table_bench,
    events_bench
);
criterion_main!(benches);
