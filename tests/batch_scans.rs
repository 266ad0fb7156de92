//! Date-range operations: ephemeris tables and conjunction scans

use std::cell::Cell;

use approx::assert_relative_eq;
use stargazer::almanac::{
    find_mutual_conjunctions, scan_conjunctions, ConjunctionSample, PassDirection,
};
use stargazer::catalogs::{MagnitudeModel, MinorBody};
use stargazer::ephemeris::{generate_table, DateRange, EphemerisCell};
use stargazer::orbitlib::OrbitalElements;
use stargazer::{
    CalculationSettings, CancelFlag, CelestialBody, EphemerisKey, GeoLocation,
    Planet, SkyError,
};

fn greenwich() -> GeoLocation {
    GeoLocation::new(0.0, 51.4769)
}

#[test]
fn test_great_conjunction_2020() {
    let events = find_mutual_conjunctions(
        &[Planet::Jupiter, Planet::Saturn],
        2459199.5,
        2459209.5,
        &greenwich(),
        &CalculationSettings::default(),
        &CancelFlag::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.bodies, (Planet::Jupiter, Planet::Saturn));
    // 2020 December 21, about 13:40 UT
    assert_relative_eq!(event.julian_day, 2459205.0696, epsilon = 0.01);
    assert_relative_eq!(event.separation, 0.104, epsilon = 0.005);
    assert_eq!(event.direction, PassDirection::South);
    let (jupiter, saturn) = event.magnitudes;
    assert!(jupiter.unwrap() < saturn.unwrap());
}

#[test]
fn test_conjunction_scan_cancelled_midway() {
    let cancel = CancelFlag::new();
    let samples = Cell::new(0);
    let sample = |jd: f64, body: u8| {
        samples.set(samples.get() + 1);
        if samples.get() == 20 {
            cancel.cancel();
        }
        Ok(ConjunctionSample {
            equatorial: stargazer::Equatorial::new(jd * f64::from(body + 1) % 360.0, 0.0),
            magnitude: None,
        })
    };

    let range = DateRange::new(0.0, 100.0, 1.0);
    let result = scan_conjunctions(&[0u8, 1], &range, 1000, sample, &cancel, |_| {});
    assert_eq!(result, Err(SkyError::Cancelled));
    assert!(samples.get() < 30);
}

#[test]
fn test_conjunction_scan_step_limit() {
    let settings = CalculationSettings {
        scan_max_samples: 50,
        ..CalculationSettings::default()
    };
    let result = find_mutual_conjunctions(
        &[Planet::Mars, Planet::Venus],
        2451545.0,
        2451645.0,
        &greenwich(),
        &settings,
        &CancelFlag::new(),
        |_| {},
    );
    assert!(matches!(result, Err(SkyError::InvalidInput(_))));
}

#[test]
fn test_table_rows_and_progress() {
    let range = DateRange::new(2460310.5, 2460315.5, 0.5);
    let keys = [
        EphemerisKey::RightAscension,
        EphemerisKey::Declination,
        EphemerisKey::Phase,
        EphemerisKey::Rise,
    ];
    let mut fractions = Vec::new();
    let body: CelestialBody = "moon".parse().unwrap();
    let table = generate_table(
        body.as_object(),
        &greenwich(),
        &CalculationSettings::default(),
        &range,
        &keys,
        &CancelFlag::new(),
        |f| fractions.push(f),
    )
    .unwrap();

    assert_eq!(table.rows.len(), 11);
    assert_eq!(fractions.len(), 11);
    assert!(fractions.windows(2).all(|w| w[0] < w[1]));
    assert_relative_eq!(*fractions.last().unwrap(), 1.0);

    for row in &table.rows {
        assert!(row.get(EphemerisKey::RightAscension).and_then(EphemerisCell::value).is_some());
        let phase = row.get(EphemerisKey::Phase).and_then(EphemerisCell::value).unwrap();
        assert!((0.0..=1.0).contains(&phase));
    }

    let text = table.to_string();
    assert!(text.contains("Moon"));
    assert_eq!(text.lines().count(), table.rows.len() + 2);
}

#[test]
fn test_table_is_cancellable() {
    let cancel = CancelFlag::new();
    let range = DateRange::new(2460310.5, 2460410.5, 1.0);
    let result = generate_table(
        &Planet::Mars,
        &greenwich(),
        &CalculationSettings::default(),
        &range,
        &[EphemerisKey::RightAscension],
        &cancel,
        |f| {
            if f > 0.1 {
                cancel.cancel()
            }
        },
    );
    assert!(matches!(result, Err(SkyError::Cancelled)));
}

#[test]
fn test_table_flags_failed_rows() {
    // Elements that every instant rejects
    let comet = MinorBody {
        name: "C/Broken".into(),
        elements: OrbitalElements {
            perihelion_distance: -1.0,
            eccentricity: 0.5,
            inclination: 10.0,
            ascending_node: 0.0,
            argument_of_perihelion: 0.0,
            perihelion_time: 2451545.0,
            equinox: 2451545.0,
        },
        magnitude_model: MagnitudeModel::Comet { g: 10.0, k: 10.0 },
    };
    let range = DateRange::new(2451545.0, 2451547.0, 1.0);
    let table = generate_table(
        &comet,
        &greenwich(),
        &CalculationSettings::default(),
        &range,
        &[EphemerisKey::RightAscension],
        &CancelFlag::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(table.rows.len(), 3);
    for row in &table.rows {
        assert!(matches!(
            row.get(EphemerisKey::RightAscension),
            Some(EphemerisCell::Failed(_))
        ));
    }
}

#[test]
fn test_table_row_limit() {
    let settings = CalculationSettings {
        ephemeris_max_rows: 10,
        ..CalculationSettings::default()
    };
    let range = DateRange::new(2451545.0, 2451645.0, 1.0);
    let result = generate_table(
        &Planet::Venus,
        &greenwich(),
        &settings,
        &range,
        &[EphemerisKey::Magnitude],
        &CancelFlag::new(),
        |_| {},
    );
    assert!(matches!(result, Err(SkyError::InvalidInput(_))));
}
