use esc_core::errors::EscError;
use esc_core::PhysicalConstants;
use esc_loss::{planet_surface_field, MagneticBeta};

#[test]
fn zero_planet_field_is_the_unconfined_sentinel() {
    let beta = MagneticBeta::from_fields(1e-4, 0.0, 6.957e8, 1.49598e11).expect("beta");
    assert_eq!(beta, MagneticBeta::Unconfined);
    assert!(beta.is_saturated());
    assert!(beta.is_unconfined());
    assert_eq!(beta.value(), f64::INFINITY);
    assert_eq!(beta.confinement_factor(), 1.0);
}

#[test]
fn saturated_beta_gives_full_escape() {
    for value in [1.0, 1.5, 10.0, 1e300] {
        let beta = MagneticBeta::Finite(value);
        assert!(beta.is_saturated());
        assert_eq!(beta.confinement_factor(), 1.0);
    }
}

#[test]
fn confinement_factor_is_continuous_at_one() {
    let just_below = MagneticBeta::Finite(1.0 - 1e-12).confinement_factor();
    assert!((just_below - 1.0).abs() < 1e-3);
    assert!(just_below <= 1.0);
}

#[test]
fn confinement_factor_matches_closed_form() {
    let beta: f64 = 0.008;
    let expected = 1.0 - (1.0 - 3.0 * beta.cbrt() / (2.0 + beta)).sqrt();
    let actual = MagneticBeta::Finite(beta).confinement_factor();
    assert!((actual - expected).abs() < 1e-15);
    assert!(actual > 0.0 && actual < 1.0);
    assert_eq!(MagneticBeta::Finite(0.0).confinement_factor(), 0.0);
}

#[test]
fn confinement_factor_grows_with_beta() {
    let mut previous = 0.0;
    for step in 1..100 {
        let factor = MagneticBeta::Finite(step as f64 / 100.0).confinement_factor();
        assert!(factor >= previous);
        previous = factor;
    }
}

#[test]
fn negative_fields_are_rejected() {
    assert!(matches!(
        MagneticBeta::from_fields(1e-4, -1e-5, 1.0, 1.0),
        Err(EscError::InvalidInput(_))
    ));
    assert!(matches!(
        MagneticBeta::from_fields(-1e-4, 1e-5, 1.0, 1.0),
        Err(EscError::InvalidInput(_))
    ));
}

#[test]
fn negative_ratio_never_escapes_the_unit_interval() {
    assert!(matches!(MagneticBeta::finite(-0.5), Err(EscError::InvalidInput(_))));
    assert!(matches!(MagneticBeta::finite(f64::NAN), Err(EscError::InvalidInput(_))));
    assert_eq!(MagneticBeta::finite(0.25).expect("beta"), MagneticBeta::Finite(0.25));
    assert_eq!(
        MagneticBeta::finite(f64::INFINITY).expect("beta"),
        MagneticBeta::Unconfined
    );

    let factor = MagneticBeta::Finite(-0.5).confinement_factor();
    assert!((0.0..=1.0).contains(&factor), "F_AP = {factor}");
    assert_eq!(factor, 0.0);
}

#[test]
fn decoding_rejects_a_negative_ratio() {
    let decoded: Result<MagneticBeta, _> =
        serde_json::from_str(r#"{"kind":"finite","value":-0.5}"#);
    assert!(decoded.is_err());

    let beta = MagneticBeta::Finite(0.3);
    let encoded = serde_json::to_string(&beta).expect("encode");
    let back: MagneticBeta = serde_json::from_str(&encoded).expect("decode");
    assert_eq!(back, beta);
    let unconfined: MagneticBeta =
        serde_json::from_str(r#"{"kind":"unconfined"}"#).expect("decode");
    assert!(unconfined.is_unconfined());
}

#[test]
fn earth_dipole_gives_expected_surface_field() {
    let constants = PhysicalConstants::default();
    let field = planet_surface_field(
        esc_core::constants::EARTH_MAGNETIC_MOMENT,
        esc_core::constants::EARTH_RADIUS,
        &constants,
    );
    // Tens of microtesla, the right order for Earth's surface field.
    assert!(field > 1e-5 && field < 1e-4, "field = {field}");
}
