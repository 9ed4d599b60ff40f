use std::f64::consts::PI;

use esc_core::errors::EscError;
use esc_core::PhysicalConstants;
use esc_loss::{EscapeRegime, MassLossIntegrator, PhysicalTimeSeries, Planet, Star};

/// Unit bodies and constants chosen so that rate = pi * flux and the
/// planetary surface field equals the dipole moment.
fn unit_integrator(stellar_field: f64) -> MassLossIntegrator {
    let constants = PhysicalConstants {
        gravitational_constant: 1.0,
        vacuum_permittivity: 1.0 / (6.0 * PI),
        seconds_per_time_unit: 1.0,
        ..PhysicalConstants::default()
    };
    let planet = Planet {
        radius: 1.0,
        mass: 1.0,
        eta: 1.0,
    };
    let star = Star {
        surface_field: stellar_field,
        radius: 1.0,
    };
    MassLossIntegrator::new(planet, star, 1.0, constants).expect("integrator")
}

fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= 1e-12 * scale,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn euler_steps_accumulate_rate_times_dt() {
    let integrator = unit_integrator(0.0);
    let series = PhysicalTimeSeries::new(vec![0.0, 1.0, 3.0], vec![1.0, 2.0, 4.0], vec![0.0; 3]);
    let trajectory = integrator
        .integrate(&series, EscapeRegime::EnergyLimited)
        .expect("integrate");
    assert_eq!(trajectory.len(), 3);
    assert_eq!(trajectory.cumulative()[0], 0.0);
    assert_close(trajectory.cumulative()[1], 2.0 * PI);
    assert_close(trajectory.cumulative()[2], 10.0 * PI);
    assert_close(trajectory.total(), 10.0 * PI);
}

#[test]
fn seconds_per_time_unit_scales_dt() {
    let series = PhysicalTimeSeries::new(vec![0.0, 2.0], vec![1.0, 1.0], vec![0.0, 0.0]);
    let default_units = MassLossIntegrator::new(
        Planet::earth(),
        Star::sun(),
        esc_core::constants::AU,
        PhysicalConstants::default(),
    )
    .expect("integrator");
    let trajectory = default_units
        .integrate(&series, EscapeRegime::EnergyLimited)
        .expect("integrate");
    let expected = default_units.energy_limited_rate(1.0) * 2.0 * esc_core::constants::SECONDS_PER_YEAR;
    assert_close(trajectory.total(), expected);
}

#[test]
fn magnetic_regime_scales_rate_by_confinement() {
    let integrator = unit_integrator(0.125);
    // beta = 0.125 / dipole with the unit fixture.
    let series = PhysicalTimeSeries::new(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![1.0; 4],
        vec![1.0, 1.0, 0.1, 0.0],
    );
    let magnetic = integrator
        .integrate(&series, EscapeRegime::Magnetic)
        .expect("magnetic");
    let unmagnetized = integrator
        .integrate(&series, EscapeRegime::EnergyLimited)
        .expect("energy limited");

    let f_ap = 1.0 - (1.0 - 3.0 * 0.5 / 2.125_f64).sqrt();
    assert_close(magnetic.rate()[0], PI * f_ap);
    assert_close(magnetic.rate()[1], PI * f_ap);
    assert_close(magnetic.rate()[2], PI);
    assert_close(magnetic.rate()[3], PI);
    assert!(magnetic.total() < unmagnetized.total());
    assert_close(unmagnetized.total(), 3.0 * PI);
}

#[test]
fn truncates_to_shortest_column() {
    let integrator = unit_integrator(0.125);
    let time: Vec<f64> = (0..8).map(f64::from).collect();
    let series = PhysicalTimeSeries::new(time, vec![1.0; 8], vec![1.0; 5]);
    let trajectory = integrator
        .integrate(&series, EscapeRegime::Magnetic)
        .expect("integrate");
    assert_eq!(trajectory.len(), 5);
    assert_eq!(trajectory.time(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn empty_series_yields_empty_trajectory() {
    let integrator = unit_integrator(0.125);
    let series = PhysicalTimeSeries::new(vec![0.0, 1.0], vec![], vec![1.0, 1.0]);
    let trajectory = integrator
        .integrate(&series, EscapeRegime::Magnetic)
        .expect("empty is not an error");
    assert!(trajectory.is_empty());
    assert_eq!(trajectory.total(), 0.0);
}

#[test]
fn non_monotonic_time_is_rejected() {
    let integrator = unit_integrator(0.125);
    let series = PhysicalTimeSeries::new(vec![0.0, 2.0, 1.0], vec![1.0; 3], vec![1.0; 3]);
    let err = integrator
        .integrate(&series, EscapeRegime::EnergyLimited)
        .expect_err("time goes backwards");
    match err {
        EscError::InvalidInput(info) => {
            assert_eq!(info.code, "series-time-order");
            assert_eq!(info.context.get("index").map(String::as_str), Some("2"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn repeated_time_is_rejected() {
    let integrator = unit_integrator(0.125);
    let series = PhysicalTimeSeries::new(vec![0.0, 1.0, 1.0], vec![1.0; 3], vec![1.0; 3]);
    assert!(matches!(
        integrator.integrate(&series, EscapeRegime::Magnetic),
        Err(EscError::InvalidInput(_))
    ));
}

#[test]
fn disorder_past_the_truncation_point_is_ignored() {
    let integrator = unit_integrator(0.125);
    let series = PhysicalTimeSeries::new(vec![0.0, 1.0, 2.0, 0.5], vec![1.0; 4], vec![1.0; 3]);
    let trajectory = integrator
        .integrate(&series, EscapeRegime::Magnetic)
        .expect("only the first three samples are read");
    assert_eq!(trajectory.len(), 3);
}

#[test]
fn negative_dipole_is_rejected_in_magnetic_regime_only() {
    let integrator = unit_integrator(0.125);
    let series = PhysicalTimeSeries::new(vec![0.0, 1.0], vec![1.0; 2], vec![1.0, -1.0]);
    let err = integrator
        .integrate(&series, EscapeRegime::Magnetic)
        .expect_err("negative dipole");
    assert_eq!(err.info().code, "beta-negative");
    assert_eq!(err.info().context.get("index").map(String::as_str), Some("1"));
    assert!(integrator
        .integrate(&series, EscapeRegime::EnergyLimited)
        .is_ok());
}

#[test]
fn negative_flux_is_rejected() {
    let integrator = unit_integrator(0.125);
    let series = PhysicalTimeSeries::new(vec![0.0, 1.0], vec![1.0, -0.5], vec![1.0; 2]);
    assert!(matches!(
        integrator.integrate(&series, EscapeRegime::EnergyLimited),
        Err(EscError::InvalidInput(_))
    ));
}

#[test]
fn invalid_bodies_are_configuration_errors() {
    let constants = PhysicalConstants::default();
    let bad_star = Star {
        surface_field: -1e-4,
        radius: 6.957e8,
    };
    assert!(matches!(
        MassLossIntegrator::new(Planet::earth(), bad_star, 1.0, constants),
        Err(EscError::Configuration(_))
    ));
    assert!(matches!(
        MassLossIntegrator::new(Planet::earth(), Star::sun(), 0.0, constants),
        Err(EscError::Configuration(_))
    ));
}

#[test]
fn escape_state_checks_index() {
    let integrator = unit_integrator(0.125);
    let series = PhysicalTimeSeries::new(vec![0.0, 1.0], vec![1.0; 2], vec![1.0; 2]);
    let state = integrator
        .escape_state(&series, 1, EscapeRegime::Magnetic)
        .expect("state");
    assert_close(state.planet_field, 1.0);
    assert!(matches!(
        integrator.escape_state(&series, 2, EscapeRegime::Magnetic),
        Err(EscError::IndexOutOfBounds(_))
    ));
}

#[test]
fn from_normalized_converts_simulator_units() {
    let constants = PhysicalConstants::default();
    let distance = esc_core::constants::AU;
    let series =
        PhysicalTimeSeries::from_normalized(&[0.0, 1.0], &[1e-4, 2e-4], &[1.0, 0.5], distance, &constants)
            .expect("series");
    let sphere = 4.0 * PI * distance * distance;
    assert_close(series.xuv_flux()[0], 1e-4 * constants.solar_luminosity / sphere);
    assert_close(series.dipole_moment()[1], 0.5 * constants.earth_magnetic_moment);
}
