use std::fs;

use esc_core::constants::AU;
use esc_core::PhysicalConstants;
use esc_loss::{EscapeRegime, IntegratorConfig, MassLossIntegrator, PhysicalTimeSeries, Planet, Star};

fn sample_series() -> PhysicalTimeSeries {
    PhysicalTimeSeries::new(
        vec![0.0, 1e6, 2e6],
        vec![1e-2, 5e-3, 2e-3],
        vec![7.94e22, 7.94e22, 0.0],
    )
}

#[test]
fn trajectory_csv_has_header_and_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out").join("trajectory.csv");
    let integrator =
        MassLossIntegrator::new(Planet::earth(), Star::sun(), AU, PhysicalConstants::default())
            .expect("integrator");
    let trajectory = integrator
        .integrate(&sample_series(), EscapeRegime::Magnetic)
        .expect("integrate");
    trajectory.write_csv(&path).expect("write");
    let text = fs::read_to_string(&path).expect("read");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "time,rate,cumulative_mass_loss");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].ends_with(",0.0"));
}

#[test]
fn profile_reports_sentinel_beta_as_infinite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("planet_output.csv");
    let integrator =
        MassLossIntegrator::new(Planet::earth(), Star::sun(), AU, PhysicalConstants::default())
            .expect("integrator");
    let profile = integrator.profile(&sample_series()).expect("profile");
    assert_eq!(profile.rows.len(), 3);
    assert_eq!(profile.rows[2].f_ap, 1.0);
    assert!(profile.rows[2].beta.is_infinite());
    profile.write_csv(&path).expect("write");
    let text = fs::read_to_string(&path).expect("read");
    assert!(text.starts_with("time,F_AP,beta,planetB,semimajorAxis,stellarRadius"));
}

#[test]
fn config_defaults_and_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("integrator.yaml");
    fs::write(
        &path,
        "planet:\n  eta: 0.3\nstar:\n  surface_field: 0.15\n  radius: 7.8e7\nregime: energy-limited\n",
    )
    .expect("write config");
    let config = IntegratorConfig::load(&path).expect("load");
    assert_eq!(config.planet.eta, 0.3);
    assert_eq!(config.planet.radius, esc_core::constants::EARTH_RADIUS);
    assert_eq!(config.orbital_distance, AU);
    assert_eq!(config.regime, EscapeRegime::EnergyLimited);
    let integrator = config.build().expect("build");
    assert_eq!(integrator.star().surface_field, 0.15);
}
