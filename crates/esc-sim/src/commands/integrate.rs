use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use esc_core::constants::{AU, EARTH_FLUX};
use esc_core::errors::{ErrorInfo, EscError};
use esc_loss::{
    orbital_distances_for_flux, EscapeRegime, IntegratorConfig, PhysicalTimeSeries, Star,
};
use esc_table::OutputTable;
use tracing::info;

/// Stellar output column with the XUV luminosity in solar units.
const LXUV_COLUMN: &str = "LXUVStellar";
/// Planetary output column with the dipole moment in Earth units.
const MAGMOM_COLUMN: &str = "MagMom";
/// Stellar output column with the bolometric luminosity in solar units.
const LUMINOSITY_COLUMN: &str = "Luminosity";
const TIME_COLUMN: &str = "Time";

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StarPreset {
    Sun,
    MDwarf,
}

impl From<StarPreset> for Star {
    fn from(preset: StarPreset) -> Self {
        match preset {
            StarPreset::Sun => Star::sun(),
            StarPreset::MDwarf => Star::m_dwarf(),
        }
    }
}

#[derive(Args, Debug)]
pub struct IntegrateArgs {
    /// Stellar forward output (columns discovered from its body file).
    #[arg(long)]
    pub stellar: PathBuf,
    /// Planetary forward output (columns discovered from its body file).
    #[arg(long)]
    pub planet: PathBuf,
    /// Star-planet distance in meters; overrides the configuration.
    #[arg(long, conflicts_with = "flux")]
    pub distance: Option<f64>,
    /// Place the planet where it receives this multiple of Earth's flux,
    /// using the last `Luminosity` sample of the stellar output.
    #[arg(long)]
    pub flux: Option<f64>,
    /// Stellar field preset; overrides the configuration.
    #[arg(long, value_enum)]
    pub star: Option<StarPreset>,
    /// Ignore magnetic confinement.
    #[arg(long)]
    pub energy_limited: bool,
    /// YAML integrator configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Trajectory CSV.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional per-sample magnetic diagnostics CSV.
    #[arg(long)]
    pub profile: Option<PathBuf>,
}

pub fn run(args: &IntegrateArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => IntegratorConfig::load(path)?,
        None => IntegratorConfig::default(),
    };
    if let Some(distance) = args.distance {
        config.orbital_distance = distance;
    }
    if let Some(preset) = args.star {
        config.star = preset.into();
    }
    if args.energy_limited {
        config.regime = EscapeRegime::EnergyLimited;
    }
    let stellar = OutputTable::read(&args.stellar, None)?;
    let planet = OutputTable::read(&args.planet, None)?;
    if let Some(fraction) = args.flux {
        config.orbital_distance = present_day_distance(&stellar, fraction, &config)?;
        info!(
            fraction,
            distance_au = config.orbital_distance / AU,
            "orbital distance derived from stellar luminosity"
        );
    }
    let integrator = config.build()?;

    let series = PhysicalTimeSeries::from_normalized(
        stellar.column(TIME_COLUMN)?,
        stellar.column(LXUV_COLUMN)?,
        planet.column(MAGMOM_COLUMN)?,
        config.orbital_distance,
        &config.constants,
    )?;

    let trajectory = integrator.integrate(&series, config.regime)?;
    trajectory.write_csv(&args.out)?;
    if let Some(path) = &args.profile {
        integrator.profile(&series)?.write_csv(path)?;
    }
    info!(
        samples = trajectory.len(),
        total = trajectory.total(),
        out = %args.out.display(),
        "mass-loss trajectory written"
    );
    println!("{}", trajectory.total());
    Ok(())
}

fn present_day_distance(
    stellar: &OutputTable,
    fraction: f64,
    config: &IntegratorConfig,
) -> Result<f64, EscError> {
    let distances = orbital_distances_for_flux(
        fraction * EARTH_FLUX,
        stellar.column(LUMINOSITY_COLUMN)?,
        &config.constants,
    )?;
    distances.last().copied().ok_or_else(|| {
        EscError::InvalidInput(ErrorInfo::new(
            "luminosity-empty",
            "stellar output has no luminosity samples",
        ))
    })
}
