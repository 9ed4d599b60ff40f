//! Loss metrics reduced from a body's output table.

use std::fmt;
use std::str::FromStr;

use esc_core::constants::YEARS_PER_GYR;
use esc_core::errors::{ErrorInfo, EscError};
use serde::{Deserialize, Serialize};

use crate::table::OutputTable;

/// Simulated age of the present-day Solar System, in years.
pub const PRESENT_DAY_YEARS: f64 = 6.0253e9;

/// Time column of every forward output.
pub const TIME_COLUMN: &str = "Time";

/// Reservoir whose loss is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MassKind {
    /// Primordial hydrogen envelope (`EnvelopeMass`).
    Atmosphere,
    /// Surface water inventory (`SurfWaterMass`).
    Water,
}

impl MassKind {
    /// Output column holding the reservoir mass.
    pub fn column(self) -> &'static str {
        match self {
            MassKind::Atmosphere => "EnvelopeMass",
            MassKind::Water => "SurfWaterMass",
        }
    }
}

/// Reduction applied to the mass column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossMetric {
    /// Initial mass minus the mass at the cutoff.
    MassLost,
    /// Mass lost as a percentage of the initial mass.
    PercentLost,
    /// Time at which the reservoir first empties, in Gyr.
    DesiccationTime,
}

/// Validated choice of reservoir and metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LossMode {
    /// Reservoir.
    pub mass: MassKind,
    /// Reduction.
    pub metric: LossMetric,
}

impl LossMode {
    /// Legacy flag: envelope mass.
    pub const ATM: u8 = 1;
    /// Legacy flag: surface water.
    pub const WATER: u8 = 2;
    /// Legacy flag: desiccation time.
    pub const DESSIC_TIME: u8 = 4;
    /// Legacy flag: percentage lost.
    pub const PERCENT: u8 = 8;

    /// Builds a mode.
    pub const fn new(mass: MassKind, metric: LossMetric) -> Self {
        Self { mass, metric }
    }

    /// Decodes a legacy flag word. Exactly one of `ATM` / `WATER` must be
    /// set, and `DESSIC_TIME` excludes `PERCENT`.
    pub fn from_flags(flags: u8) -> Result<Self, EscError> {
        let invalid = |code: &str, message: &str| {
            EscError::Configuration(
                ErrorInfo::new(code, message).with_context("flags", flags.to_string()),
            )
        };
        let known = Self::ATM | Self::WATER | Self::DESSIC_TIME | Self::PERCENT;
        if flags & !known != 0 {
            return Err(invalid("mode-unknown-flag", "unknown mode flag"));
        }
        let mass = match flags & (Self::ATM | Self::WATER) {
            Self::ATM => MassKind::Atmosphere,
            Self::WATER => MassKind::Water,
            _ => {
                return Err(invalid(
                    "mode-mass-kind",
                    "select exactly one of the atmosphere and water flags",
                ))
            }
        };
        let metric = match flags & (Self::DESSIC_TIME | Self::PERCENT) {
            0 => LossMetric::MassLost,
            Self::DESSIC_TIME => LossMetric::DesiccationTime,
            Self::PERCENT => LossMetric::PercentLost,
            _ => {
                return Err(invalid(
                    "mode-metric",
                    "desiccation time and percentage are mutually exclusive",
                ))
            }
        };
        Ok(Self { mass, metric })
    }

    /// Encodes the mode as a legacy flag word.
    pub fn flags(self) -> u8 {
        let mass = match self.mass {
            MassKind::Atmosphere => Self::ATM,
            MassKind::Water => Self::WATER,
        };
        let metric = match self.metric {
            LossMetric::MassLost => 0,
            LossMetric::PercentLost => Self::PERCENT,
            LossMetric::DesiccationTime => Self::DESSIC_TIME,
        };
        mass | metric
    }

    /// Axis label for plots and CSV headers.
    pub fn label(self) -> &'static str {
        match (self.metric, self.mass) {
            (LossMetric::DesiccationTime, MassKind::Water) => "Time Until Ocean Evaporated [Gyr]",
            (LossMetric::DesiccationTime, MassKind::Atmosphere) => {
                "Time Until Atmosphere Lost [Gyr]"
            }
            (LossMetric::PercentLost, MassKind::Water) => "% Water Loss",
            (LossMetric::PercentLost, MassKind::Atmosphere) => "% Atmospheric Mass Loss",
            (LossMetric::MassLost, MassKind::Water) => "Water Loss [TO]",
            (LossMetric::MassLost, MassKind::Atmosphere) => "Atmospheric Mass Loss [kg]",
        }
    }

    /// Reduces a table to this mode's metric.
    ///
    /// Mass metrics compare the first row with the last row at or before
    /// `cutoff` years. The desiccation time is the first time the mass reaches
    /// zero, rounded to 0.01 Gyr, and `None` when that never happens.
    pub fn evaluate(self, table: &OutputTable, cutoff: f64) -> Result<Option<f64>, EscError> {
        let time = table.column(TIME_COLUMN)?;
        let mass = table.column(self.mass.column())?;
        let Some(&initial) = mass.first() else {
            return Err(EscError::InvalidInput(ErrorInfo::new(
                "table-empty",
                "output table has no rows",
            )));
        };

        if self.metric == LossMetric::DesiccationTime {
            return Ok(time
                .iter()
                .zip(mass)
                .find(|&(_, &m)| m == 0.0)
                .map(|(&t, _)| (t / YEARS_PER_GYR * 100.0).round() / 100.0));
        }

        let at_cutoff = time
            .iter()
            .zip(mass)
            .filter(|&(&t, _)| t <= cutoff)
            .map(|(_, &m)| m)
            .last()
            .ok_or_else(|| {
                EscError::InvalidInput(
                    ErrorInfo::new("table-cutoff", "no samples at or before the cutoff")
                        .with_context("cutoff", cutoff.to_string()),
                )
            })?;
        let lost = initial - at_cutoff;
        match self.metric {
            LossMetric::MassLost => Ok(Some(lost)),
            _ if initial == 0.0 => Err(EscError::InvalidInput(
                ErrorInfo::new("table-zero-mass", "initial mass is zero")
                    .with_context("column", self.mass.column()),
            )),
            _ => Ok(Some(100.0 * lost / initial)),
        }
    }
}

impl fmt::Display for LossMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mass = match self.mass {
            MassKind::Atmosphere => "atm",
            MassKind::Water => "water",
        };
        let metric = match self.metric {
            LossMetric::MassLost => "mass",
            LossMetric::PercentLost => "percent",
            LossMetric::DesiccationTime => "desiccation",
        };
        write!(f, "{mass}:{metric}")
    }
}

impl FromStr for LossMode {
    type Err = EscError;

    /// Parses `{atm|water}[:{mass|percent|desiccation}]`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            EscError::Configuration(
                ErrorInfo::new("mode-parse", "unrecognized loss mode")
                    .with_context("mode", raw)
                    .with_hint("use atm|water optionally followed by :mass, :percent or :desiccation"),
            )
        };
        let (mass, metric) = match raw.trim().split_once(':') {
            Some((mass, metric)) => (mass, metric),
            None => (raw.trim(), "mass"),
        };
        let mass = match mass.to_ascii_lowercase().as_str() {
            "atm" | "atmosphere" => MassKind::Atmosphere,
            "water" => MassKind::Water,
            _ => return Err(invalid()),
        };
        let metric = match metric.to_ascii_lowercase().as_str() {
            "mass" | "lost" => LossMetric::MassLost,
            "percent" => LossMetric::PercentLost,
            "desiccation" | "dessic" => LossMetric::DesiccationTime,
            _ => return Err(invalid()),
        };
        Ok(Self { mass, metric })
    }
}
