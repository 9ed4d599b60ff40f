use esc_core::constants::{
    EARTH_MASS, EARTH_RADIUS, SOLAR_RADIUS, SOLAR_SURFACE_FIELD,
};
use esc_core::errors::{ErrorInfo, EscError};
use esc_core::PhysicalConstants;
use serde::{Deserialize, Serialize};

/// Escaping body. Radius and mass enter the energy-limited rate directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    /// Planetary radius [m].
    #[serde(default = "default_planet_radius")]
    pub radius: f64,
    /// Planetary mass [kg].
    #[serde(default = "default_planet_mass")]
    pub mass: f64,
    /// Heating efficiency of the energy-limited flow.
    #[serde(default = "default_eta")]
    pub eta: f64,
}

fn default_planet_radius() -> f64 {
    EARTH_RADIUS
}

fn default_planet_mass() -> f64 {
    EARTH_MASS
}

fn default_eta() -> f64 {
    0.1
}

impl Planet {
    /// Earth-like planet with the default heating efficiency.
    pub fn earth() -> Self {
        Self {
            radius: EARTH_RADIUS,
            mass: EARTH_MASS,
            eta: default_eta(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EscError> {
        positive("planet.radius", self.radius)?;
        positive("planet.mass", self.mass)?;
        non_negative("planet.eta", self.eta)
    }
}

impl Default for Planet {
    fn default() -> Self {
        Self::earth()
    }
}

/// Host star, described by the quantities that set the magnetic pressure
/// balance at the planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Mean stellar surface field [T].
    pub surface_field: f64,
    /// Stellar radius [m].
    pub radius: f64,
}

impl Star {
    /// The Sun.
    pub fn sun() -> Self {
        Self {
            surface_field: SOLAR_SURFACE_FIELD,
            radius: SOLAR_RADIUS,
        }
    }

    /// Late M dwarf with a 1.5 kG surface field and a radius of 12.3 Earth radii.
    pub fn m_dwarf() -> Self {
        Self {
            surface_field: 1.5e3 * 1e-4,
            radius: 12.3 * EARTH_RADIUS,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EscError> {
        non_negative("star.surface_field", self.surface_field)?;
        positive("star.radius", self.radius)
    }
}

impl Default for Star {
    fn default() -> Self {
        Self::sun()
    }
}

/// Orbital distance at which a star of `luminosity` [W] delivers `flux`
/// [W m^-2].
pub fn orbital_distance_for_flux(flux: f64, luminosity: f64) -> f64 {
    (luminosity / (4.0 * std::f64::consts::PI * flux)).sqrt()
}

/// Distance at each sample of a luminosity column (solar units) where the
/// star delivers `flux` [W m^-2].
pub fn orbital_distances_for_flux(
    flux: f64,
    luminosity: &[f64],
    constants: &PhysicalConstants,
) -> Result<Vec<f64>, EscError> {
    positive("flux", flux)?;
    luminosity
        .iter()
        .enumerate()
        .map(|(index, &solar_units)| {
            if solar_units.is_finite() && solar_units > 0.0 {
                Ok(orbital_distance_for_flux(flux, solar_units * constants.solar_luminosity))
            } else {
                Err(EscError::InvalidInput(
                    ErrorInfo::new("luminosity-non-positive", "luminosity must be positive")
                        .with_context("index", index.to_string())
                        .with_context("value", solar_units.to_string()),
                ))
            }
        })
        .collect()
}

pub(crate) fn positive(field: &str, value: f64) -> Result<(), EscError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EscError::Configuration(
            ErrorInfo::new("body-non-positive", "value must be finite and positive")
                .with_context("field", field)
                .with_context("value", value.to_string()),
        ))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), EscError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EscError::Configuration(
            ErrorInfo::new("body-negative", "value must be finite and non-negative")
                .with_context("field", field)
                .with_context("value", value.to_string()),
        ))
    }
}
