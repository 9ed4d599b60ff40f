use esc_core::EscError;
use esc_table::{LossMetric, LossMode, MassKind, OutputTable, PRESENT_DAY_YEARS};

fn table(rows: &str) -> OutputTable {
    let columns = ["Time", "EnvelopeMass", "SurfWaterMass"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    OutputTable::parse(rows, columns).expect("table")
}

#[test]
fn flags_decode_to_modes() {
    assert_eq!(
        LossMode::from_flags(LossMode::ATM).expect("atm"),
        LossMode::new(MassKind::Atmosphere, LossMetric::MassLost)
    );
    assert_eq!(
        LossMode::from_flags(LossMode::WATER | LossMode::DESSIC_TIME).expect("water"),
        LossMode::new(MassKind::Water, LossMetric::DesiccationTime)
    );
    let percent = LossMode::from_flags(LossMode::ATM | LossMode::PERCENT).expect("percent");
    assert_eq!(percent.metric, LossMetric::PercentLost);
    assert_eq!(percent.flags(), LossMode::ATM | LossMode::PERCENT);
}

#[test]
fn invalid_flag_words_are_rejected() {
    for flags in [
        0,
        LossMode::ATM | LossMode::WATER,
        LossMode::ATM | LossMode::DESSIC_TIME | LossMode::PERCENT,
        LossMode::WATER | 16,
    ] {
        let err = LossMode::from_flags(flags).expect_err("invalid");
        assert!(matches!(err, EscError::Configuration(_)), "flags {flags}");
    }
}

#[test]
fn modes_parse_from_text() {
    let mode: LossMode = "water:percent".parse().expect("parse");
    assert_eq!(mode, LossMode::new(MassKind::Water, LossMetric::PercentLost));
    let mode: LossMode = "atm".parse().expect("parse");
    assert_eq!(mode.metric, LossMetric::MassLost);
    assert_eq!(mode.to_string(), "atm:mass");
    assert!("ocean:percent".parse::<LossMode>().is_err());
}

#[test]
fn mass_and_percent_use_last_sample_before_cutoff() {
    let table = table("0 100 50\n3e9 60 40\n6e9 40 30\n7e9 0 20\n");
    let lost = LossMode::new(MassKind::Atmosphere, LossMetric::MassLost)
        .evaluate(&table, PRESENT_DAY_YEARS)
        .expect("lost");
    assert_eq!(lost, Some(60.0));
    let percent = LossMode::new(MassKind::Water, LossMetric::PercentLost)
        .evaluate(&table, PRESENT_DAY_YEARS)
        .expect("percent");
    assert_eq!(percent, Some(40.0));
}

#[test]
fn desiccation_time_is_rounded_gyr() {
    let table = table("0 100 50\n3.456e9 0 40\n7e9 0 20\n");
    let atm = LossMode::new(MassKind::Atmosphere, LossMetric::DesiccationTime);
    assert_eq!(atm.evaluate(&table, PRESENT_DAY_YEARS).expect("atm"), Some(3.46));
    let water = LossMode::new(MassKind::Water, LossMetric::DesiccationTime);
    assert_eq!(water.evaluate(&table, PRESENT_DAY_YEARS).expect("water"), None);
    assert_eq!(water.label(), "Time Until Ocean Evaporated [Gyr]");
}

#[test]
fn cutoff_before_first_sample_is_invalid() {
    let table = table("1e9 100 50\n");
    let err = LossMode::new(MassKind::Atmosphere, LossMetric::MassLost)
        .evaluate(&table, 1.0)
        .expect_err("cutoff");
    assert!(matches!(err, EscError::InvalidInput(ref info) if info.code == "table-cutoff"));
}
