use esc_core::errors::{ErrorInfo, EscError};
use esc_core::PhysicalConstants;

use crate::body::positive;

/// Time-aligned stellar driving and planetary dynamo columns.
///
/// Columns may have different lengths (they usually come from separate
/// simulator tables); every accessor exposes only the shortest common prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalTimeSeries {
    time: Vec<f64>,
    xuv_flux: Vec<f64>,
    dipole_moment: Vec<f64>,
}

impl PhysicalTimeSeries {
    /// Builds a series from time (native unit), XUV flux at the planet
    /// [W m^-2] and dipole moment [A m^2] columns.
    pub fn new(time: Vec<f64>, xuv_flux: Vec<f64>, dipole_moment: Vec<f64>) -> Self {
        Self {
            time,
            xuv_flux,
            dipole_moment,
        }
    }

    /// Builds a series from simulator-normalized columns: XUV luminosity in
    /// solar luminosities and magnetic moment in Earth dipole moments.
    pub fn from_normalized(
        time: &[f64],
        lxuv_solar: &[f64],
        magmom_earth: &[f64],
        orbital_distance: f64,
        constants: &PhysicalConstants,
    ) -> Result<Self, EscError> {
        positive("orbital_distance", orbital_distance)?;
        let sphere = 4.0 * std::f64::consts::PI * orbital_distance.powi(2);
        let xuv_flux = lxuv_solar
            .iter()
            .map(|lxuv| lxuv * constants.solar_luminosity / sphere)
            .collect();
        let dipole_moment = magmom_earth
            .iter()
            .map(|magmom| magmom * constants.earth_magnetic_moment)
            .collect();
        Ok(Self::new(time.to_vec(), xuv_flux, dipole_moment))
    }

    /// Number of usable samples: the shortest column length.
    pub fn len(&self) -> usize {
        self.time
            .len()
            .min(self.xuv_flux.len())
            .min(self.dipole_moment.len())
    }

    /// True when no column has a usable sample.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true when at least one column was longer than [`Self::len`].
    pub fn is_truncated(&self) -> bool {
        let len = self.len();
        self.time.len() != len || self.xuv_flux.len() != len || self.dipole_moment.len() != len
    }

    /// Sample times in the series' native unit.
    pub fn time(&self) -> &[f64] {
        &self.time[..self.len()]
    }

    /// XUV flux at the planet [W m^-2].
    pub fn xuv_flux(&self) -> &[f64] {
        &self.xuv_flux[..self.len()]
    }

    /// Planetary dipole moment [A m^2].
    pub fn dipole_moment(&self) -> &[f64] {
        &self.dipole_moment[..self.len()]
    }

    /// Checks the truncated prefix: finite values, non-negative flux and
    /// strictly increasing time.
    pub fn validate(&self) -> Result<(), EscError> {
        let time = self.time();
        let flux = self.xuv_flux();
        let dipole = self.dipole_moment();
        for index in 0..self.len() {
            if !time[index].is_finite() || !flux[index].is_finite() || !dipole[index].is_finite()
            {
                return Err(invalid(index, "series-non-finite", "sample is not finite"));
            }
            if flux[index] < 0.0 {
                return Err(invalid(index, "series-negative-flux", "XUV flux is negative"));
            }
            if index > 0 && time[index] <= time[index - 1] {
                return Err(EscError::InvalidInput(
                    ErrorInfo::new("series-time-order", "time is not strictly increasing")
                        .with_context("index", index.to_string())
                        .with_context("previous_time", time[index - 1].to_string())
                        .with_context("time", time[index].to_string()),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(index: usize, code: &str, message: &str) -> EscError {
    EscError::InvalidInput(ErrorInfo::new(code, message).with_context("index", index.to_string()))
}
