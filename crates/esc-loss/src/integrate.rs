use std::path::Path;

use esc_core::errors::{ErrorInfo, EscError};
use esc_core::PhysicalConstants;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::body::{positive, Planet, Star};
use crate::escape::{planet_surface_field, EscapeRegime, EscapeState, MagneticBeta};
use crate::export::write_rows;
use crate::series::PhysicalTimeSeries;

/// Integrates XUV-driven mass loss for one planet around one star.
#[derive(Debug, Clone, PartialEq)]
pub struct MassLossIntegrator {
    planet: Planet,
    star: Star,
    orbital_distance: f64,
    constants: PhysicalConstants,
}

impl MassLossIntegrator {
    /// Creates an integrator after checking that every body property is
    /// physically meaningful.
    pub fn new(
        planet: Planet,
        star: Star,
        orbital_distance: f64,
        constants: PhysicalConstants,
    ) -> Result<Self, EscError> {
        planet.validate()?;
        star.validate()?;
        positive("orbital_distance", orbital_distance)?;
        positive("constants.gravitational_constant", constants.gravitational_constant)?;
        positive("constants.seconds_per_time_unit", constants.seconds_per_time_unit)?;
        Ok(Self {
            planet,
            star,
            orbital_distance,
            constants,
        })
    }

    /// Escaping planet.
    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    /// Host star.
    pub fn star(&self) -> &Star {
        &self.star
    }

    /// Star-planet distance [m].
    pub fn orbital_distance(&self) -> f64 {
        self.orbital_distance
    }

    /// Constants in effect.
    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Energy-limited mass-loss rate [kg s^-1] for an XUV flux [W m^-2].
    pub fn energy_limited_rate(&self, xuv_flux: f64) -> f64 {
        (self.planet.eta * std::f64::consts::PI * self.planet.radius.powi(3) * xuv_flux)
            / (self.constants.gravitational_constant * self.planet.mass)
    }

    /// Derives the escape state at `index` of the (truncated) series.
    pub fn escape_state(
        &self,
        series: &PhysicalTimeSeries,
        index: usize,
        regime: EscapeRegime,
    ) -> Result<EscapeState, EscError> {
        if index >= series.len() {
            return Err(EscError::IndexOutOfBounds(
                ErrorInfo::new("series-index", "sample index beyond the series")
                    .with_context("index", index.to_string())
                    .with_context("len", series.len().to_string()),
            ));
        }
        self.state_at(series, index, regime)
    }

    fn state_at(
        &self,
        series: &PhysicalTimeSeries,
        index: usize,
        regime: EscapeRegime,
    ) -> Result<EscapeState, EscError> {
        let dipole = series.dipole_moment()[index];
        let planet_field = planet_surface_field(dipole, self.planet.radius, &self.constants);
        let beta = match regime {
            EscapeRegime::Magnetic => Some(
                MagneticBeta::from_fields(
                    self.star.surface_field,
                    planet_field,
                    self.star.radius,
                    self.orbital_distance,
                )
                .map_err(|err| match err {
                    EscError::InvalidInput(info) => EscError::InvalidInput(
                        info.with_context("index", index.to_string()),
                    ),
                    other => other,
                })?,
            ),
            EscapeRegime::EnergyLimited => None,
        };
        let f_ap = beta.map_or(1.0, |beta| beta.confinement_factor());
        let rate = self.energy_limited_rate(series.xuv_flux()[index]) * f_ap;
        Ok(EscapeState {
            planet_field,
            beta,
            f_ap,
            rate,
        })
    }

    /// Integrates the mass-loss rate with an explicit forward Euler scheme.
    ///
    /// All columns are truncated to the shortest one first. An empty series
    /// yields an empty trajectory.
    pub fn integrate(
        &self,
        series: &PhysicalTimeSeries,
        regime: EscapeRegime,
    ) -> Result<MassLossTrajectory, EscError> {
        let len = series.len();
        if series.is_truncated() {
            debug!(len, "truncating input columns to the shortest common length");
        }
        if len == 0 {
            return Ok(MassLossTrajectory::default());
        }
        series.validate()?;

        let rate = (0..len)
            .map(|index| self.state_at(series, index, regime).map(|state| state.rate))
            .collect::<Result<Vec<_>, _>>()?;
        let time = series.time().to_vec();
        let mut cumulative = vec![0.0; len];
        for index in 1..len {
            let dt = (time[index] - time[index - 1]) * self.constants.seconds_per_time_unit;
            cumulative[index] = cumulative[index - 1] + rate[index] * dt;
        }
        debug!(
            len,
            ?regime,
            total = cumulative[len - 1],
            "integrated mass-loss trajectory"
        );
        Ok(MassLossTrajectory {
            time,
            rate,
            cumulative,
        })
    }

    /// Per-sample magnetic diagnostics for the series.
    pub fn profile(&self, series: &PhysicalTimeSeries) -> Result<EscapeProfile, EscError> {
        series.validate()?;
        let rows = (0..series.len())
            .map(|index| {
                let state = self.state_at(series, index, EscapeRegime::Magnetic)?;
                Ok(ProfileRow {
                    time: series.time()[index],
                    f_ap: state.f_ap,
                    beta: state.beta.map_or(f64::NAN, |beta| beta.value()),
                    planet_field: state.planet_field,
                    semi_major_axis: self.orbital_distance,
                    stellar_radius: self.star.radius,
                })
            })
            .collect::<Result<Vec<_>, EscError>>()?;
        Ok(EscapeProfile { rows })
    }
}

/// Cumulative mass loss aligned with the input samples.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MassLossTrajectory {
    time: Vec<f64>,
    rate: Vec<f64>,
    cumulative: Vec<f64>,
}

#[derive(Serialize)]
struct TrajectoryRow {
    time: f64,
    rate: f64,
    cumulative_mass_loss: f64,
}

impl MassLossTrajectory {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True for a trajectory built from an empty series.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample times in the input's native unit.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Mass-loss rate at each sample [kg s^-1].
    pub fn rate(&self) -> &[f64] {
        &self.rate
    }

    /// Mass lost since the first sample [kg].
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total mass lost over the trajectory [kg].
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Writes `time,rate,cumulative_mass_loss` rows to a CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<(), EscError> {
        let rows = (0..self.len()).map(|index| TrajectoryRow {
            time: self.time[index],
            rate: self.rate[index],
            cumulative_mass_loss: self.cumulative[index],
        });
        write_rows(path, rows)
    }
}

/// Magnetic diagnostics at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    /// Sample time.
    pub time: f64,
    /// Confinement factor.
    #[serde(rename = "F_AP")]
    pub f_ap: f64,
    /// Confinement ratio (`inf` when unconfined).
    pub beta: f64,
    /// Mean planetary surface field [T].
    #[serde(rename = "planetB")]
    pub planet_field: f64,
    /// Star-planet distance [m].
    #[serde(rename = "semimajorAxis")]
    pub semi_major_axis: f64,
    /// Stellar radius [m].
    #[serde(rename = "stellarRadius")]
    pub stellar_radius: f64,
}

/// Table of [`ProfileRow`]s.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EscapeProfile {
    /// One row per sample.
    pub rows: Vec<ProfileRow>,
}

impl EscapeProfile {
    /// Writes the profile to a CSV file with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<(), EscError> {
        write_rows(path, self.rows.iter())
    }
}
