use std::fs;

use esc_core::EscError;
use esc_sweep::{load_plan, Linspace};
use serde_json::json;

const PLAN: &str = r#"
trial_name: rad
destination: Parameter_Sweep
files: [vpl.in, earth.in, sun.in]
scheduler:
  parallelism: 2
axes:
  - name: K
    file: earth.in
    options: [dNumCore40K]
    linspace: { start: 0.5, stop: 1.5, num: 3 }
  - name: Th
    file: earth.in
    options: [-dNumMan232Th]
    values: [1, 2]
"#;

fn write_fixture(dir: &std::path::Path, plan: &str) -> std::path::PathBuf {
    fs::write(dir.join("vpl.in"), "saBodyFiles sun.in earth.in\n").expect("vpl");
    fs::write(dir.join("earth.in"), "sName earth\nsaOutputOrder Time\n").expect("earth");
    fs::write(dir.join("sun.in"), "sName sun\nsaOutputOrder Time\n").expect("sun");
    let path = dir.join("sweep.yaml");
    fs::write(&path, plan).expect("plan");
    path
}

#[test]
fn plan_builds_sweep_relative_to_its_directory() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = load_plan(write_fixture(temp.path(), PLAN)).expect("load plan");
    assert_eq!(plan.base_dir, temp.path());
    assert_eq!(plan.marker, "saOutputOrder");
    assert_eq!(plan.scheduler.parallelism, 2);
    assert_eq!(plan.destination_path(), temp.path().join("Parameter_Sweep"));

    let sweep = plan.build().expect("build");
    assert_eq!(sweep.grid().len(), 6);
    assert_eq!(sweep.axes()[0].values, vec![json!(0.5), json!(1.0), json!(1.5)]);
    assert!(sweep.axes()[1].options[0].is_negated());

    let report = sweep
        .expand_with(&plan.destination_path(), &plan.scheduler)
        .expect("expand");
    assert_eq!(report.jobs.len(), 6);
    assert_eq!(report.jobs[0].out_dir, "rad_K0_Th0");
    assert!(temp.path().join("vspace.in").is_file());
}

#[test]
fn axis_needs_exactly_one_value_source() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = PLAN.replace("    values: [1, 2]\n", "");
    let plan = load_plan(write_fixture(temp.path(), &plan)).expect("load plan");
    let err = plan.build().expect_err("no values");
    assert!(matches!(err, EscError::Configuration(ref info) if info.code == "axis-value-source"));
}

#[test]
fn missing_input_file_is_an_io_error() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = PLAN.replace("sun.in]", "mars.in]");
    let plan = load_plan(write_fixture(temp.path(), &plan)).expect("load plan");
    let err = plan.build().expect_err("missing file");
    assert!(matches!(err, EscError::Io(ref info) if info.context.contains_key("path")));
}

#[test]
fn linspace_hits_both_ends() {
    let range = Linspace { start: 0.0, stop: 1.0, num: 5 };
    assert_eq!(range.values(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    let single = Linspace { start: 2.0, stop: 9.0, num: 1 };
    assert_eq!(single.values(), vec![2.0]);
}
