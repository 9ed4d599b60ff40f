use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    integrate::{self, IntegrateArgs},
    survey::{self, SurveyArgs},
    sweep::{self, SweepArgs},
};

mod commands;

const LOG_ENV: &str = "ESCAPE_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "esc-sim",
    about = "Atmospheric escape post-processing for planetary evolution runs"
)]
struct Cli {
    /// Log debug diagnostics.
    #[arg(long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Log errors only.
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Integrate cumulative mass loss from stellar and planetary outputs.
    Integrate(IntegrateArgs),
    /// Expand a YAML sweep plan into run directories and a manifest.
    Sweep(SweepArgs),
    /// Reduce a completed sweep to a loss-metric grid.
    Survey(SurveyArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;
    match cli.command {
        Command::Integrate(args) => integrate::run(&args),
        Command::Sweep(args) => sweep::run(&args),
        Command::Survey(args) => survey::run(&args),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), Box<dyn Error>> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| format!("failed to initialize tracing subscriber: {err}"))?;
    Ok(())
}
