use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use esc_table::{survey_sweep, LossMode, SurveyOptions, PRESENT_DAY_YEARS};

#[derive(Args, Debug)]
pub struct SurveyArgs {
    /// Sweep directory holding the run directories.
    #[arg(long)]
    pub dir: PathBuf,
    /// Forward output file inside each run directory.
    #[arg(long)]
    pub output_file: String,
    /// Metric, e.g. `atm:percent` or `water:desiccation`.
    #[arg(long, default_value = "atm:mass")]
    pub mode: LossMode,
    /// Cutoff age in years.
    #[arg(long, default_value_t = PRESENT_DAY_YEARS)]
    pub cutoff: f64,
    /// Axis name indexing grid rows.
    #[arg(long, default_value = "K")]
    pub x_axis: String,
    /// Axis name indexing grid columns.
    #[arg(long, default_value = "ThU")]
    pub y_axis: String,
    /// Grid CSV.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &SurveyArgs) -> Result<(), Box<dyn Error>> {
    let mut options = SurveyOptions::new(
        args.x_axis.clone(),
        args.y_axis.clone(),
        args.output_file.clone(),
        args.mode,
    );
    options.cutoff = args.cutoff;
    let grid = survey_sweep(&args.dir, &options)?;
    grid.write_csv(&args.out)?;
    match grid.reference_value(1.0, 1.0) {
        Some(value) => println!("{}: {value}", grid.label()),
        None => println!("{}: earth outside grid", grid.label()),
    }
    Ok(())
}
