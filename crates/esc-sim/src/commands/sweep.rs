use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use esc_core::serde::to_canonical_json_bytes;
use esc_sweep::load_plan;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML sweep plan.
    #[arg(long)]
    pub plan: PathBuf,
    /// Sweep directory; overrides the plan's destination.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Rows written concurrently; overrides the plan's scheduler.
    #[arg(long)]
    pub parallelism: Option<usize>,
    /// Path for the JSON sweep report.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let mut scheduler = plan.scheduler.clone();
    if let Some(parallelism) = args.parallelism {
        scheduler.parallelism = parallelism;
    }
    let destination = args
        .out
        .clone()
        .unwrap_or_else(|| plan.destination_path());
    let sweep = plan.build()?;
    let report = sweep.expand_with(&destination, &scheduler)?;
    if let Some(path) = &args.report {
        fs::write(path, to_canonical_json_bytes(&report)?)?;
    }
    println!("{}", report.manifest_path.display());
    Ok(())
}
