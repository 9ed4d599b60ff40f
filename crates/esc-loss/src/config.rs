use std::fs;
use std::path::Path;

use esc_core::constants::AU;
use esc_core::errors::EscError;
use esc_core::serde::from_yaml_slice;
use esc_core::PhysicalConstants;
use serde::{Deserialize, Serialize};

use crate::body::{Planet, Star};
use crate::escape::EscapeRegime;
use crate::integrate::MassLossIntegrator;

/// YAML-configurable description of one integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Escaping planet.
    #[serde(default)]
    pub planet: Planet,
    /// Host star.
    #[serde(default)]
    pub star: Star,
    /// Star-planet distance [m].
    #[serde(default = "default_orbital_distance")]
    pub orbital_distance: f64,
    /// Escape regime.
    #[serde(default)]
    pub regime: EscapeRegime,
    /// Unit conventions and universal constants.
    #[serde(default)]
    pub constants: PhysicalConstants,
}

fn default_orbital_distance() -> f64 {
    AU
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            planet: Planet::default(),
            star: Star::default(),
            orbital_distance: default_orbital_distance(),
            regime: EscapeRegime::default(),
            constants: PhysicalConstants::default(),
        }
    }
}

impl IntegratorConfig {
    /// Loads a configuration from a YAML file; absent fields take defaults.
    pub fn load(path: &Path) -> Result<Self, EscError> {
        let bytes = fs::read(path).map_err(|err| EscError::io("config-read", path, err))?;
        from_yaml_slice(&bytes)
    }

    /// Builds the integrator described by this configuration.
    pub fn build(&self) -> Result<MassLossIntegrator, EscError> {
        MassLossIntegrator::new(self.planet, self.star, self.orbital_distance, self.constants)
    }
}
