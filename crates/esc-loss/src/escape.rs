//! Escape regimes and the magnetic confinement factor.
//!
//! The planetary dipole field stands off the stellar wind; `Beta` compares the
//! stellar field carried to the orbit against the planetary surface field.
//! Below one the magnetosphere confines part of the outflow and the
//! energy-limited rate is scaled by `F_AP`; at or above one the full
//! energy-limited rate applies.

use esc_core::errors::{ErrorInfo, EscError};
use esc_core::PhysicalConstants;
use serde::{Deserialize, Serialize};

/// Selects whether magnetic confinement modulates the energy-limited rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EscapeRegime {
    /// Plain energy-limited escape.
    EnergyLimited,
    /// Energy-limited escape scaled by the confinement factor `F_AP`.
    #[default]
    Magnetic,
}

impl From<bool> for EscapeRegime {
    fn from(magnetic: bool) -> Self {
        if magnetic {
            EscapeRegime::Magnetic
        } else {
            EscapeRegime::EnergyLimited
        }
    }
}

/// Magnetic confinement ratio.
///
/// Deserialization goes through [`MagneticBeta::finite`], so a decoded
/// ratio is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    content = "value",
    rename_all = "kebab-case",
    try_from = "RawMagneticBeta"
)]
pub enum MagneticBeta {
    /// Finite, non-negative ratio.
    Finite(f64),
    /// The planet has no field; the outflow is entirely unconfined.
    Unconfined,
}

#[derive(Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
enum RawMagneticBeta {
    Finite(f64),
    Unconfined,
}

impl TryFrom<RawMagneticBeta> for MagneticBeta {
    type Error = EscError;

    fn try_from(raw: RawMagneticBeta) -> Result<Self, Self::Error> {
        match raw {
            RawMagneticBeta::Finite(beta) => MagneticBeta::finite(beta),
            RawMagneticBeta::Unconfined => Ok(MagneticBeta::Unconfined),
        }
    }
}

impl MagneticBeta {
    /// Wraps a ratio, rejecting negative and NaN values. `+inf` maps to
    /// [`MagneticBeta::Unconfined`].
    pub fn finite(beta: f64) -> Result<Self, EscError> {
        if beta.is_nan() || beta < 0.0 {
            return Err(EscError::InvalidInput(
                ErrorInfo::new("beta-negative", "confinement ratio must be non-negative")
                    .with_context("beta", beta.to_string()),
            ));
        }
        if beta.is_infinite() {
            Ok(MagneticBeta::Unconfined)
        } else {
            Ok(MagneticBeta::Finite(beta))
        }
    }

    /// Computes `(B_star / B_planet) * (R_star / d)^3`.
    ///
    /// A zero planetary field yields [`MagneticBeta::Unconfined`]. Negative
    /// fields are rejected since they would produce a negative ratio.
    pub fn from_fields(
        stellar_field: f64,
        planet_field: f64,
        stellar_radius: f64,
        orbital_distance: f64,
    ) -> Result<Self, EscError> {
        if stellar_field < 0.0 || planet_field < 0.0 {
            return Err(EscError::InvalidInput(
                ErrorInfo::new("beta-negative", "magnetic field strengths must be non-negative")
                    .with_context("stellar_field", stellar_field.to_string())
                    .with_context("planet_field", planet_field.to_string()),
            ));
        }
        if planet_field == 0.0 {
            return Ok(MagneticBeta::Unconfined);
        }
        let beta = (stellar_field / planet_field) * (stellar_radius / orbital_distance).powi(3);
        Self::finite(beta)
    }

    /// Numeric value; `+inf` for the unconfined sentinel.
    pub fn value(&self) -> f64 {
        match self {
            MagneticBeta::Finite(beta) => *beta,
            MagneticBeta::Unconfined => f64::INFINITY,
        }
    }

    /// True for the zero-field sentinel.
    pub fn is_unconfined(&self) -> bool {
        matches!(self, MagneticBeta::Unconfined)
    }

    /// True when `Beta >= 1`, including the unconfined sentinel.
    pub fn is_saturated(&self) -> bool {
        match self {
            MagneticBeta::Finite(beta) => *beta >= 1.0,
            MagneticBeta::Unconfined => true,
        }
    }

    /// Fraction of the energy-limited rate that escapes, `F_AP` in `[0, 1]`.
    ///
    /// A hand-built negative `Finite` ratio is treated as zero.
    pub fn confinement_factor(&self) -> f64 {
        match self {
            MagneticBeta::Finite(beta) if *beta < 1.0 => {
                let beta = beta.max(0.0);
                // The radicand is >= 0 on [0, 1); clamp rounding near beta = 1.
                let radicand = 1.0 - (3.0 * beta.cbrt()) / (2.0 + beta);
                1.0 - radicand.max(0.0).sqrt()
            }
            _ => 1.0,
        }
    }
}

/// Mean planetary surface field [T] for a dipole moment [A m^2].
pub fn planet_surface_field(
    dipole_moment: f64,
    planet_radius: f64,
    constants: &PhysicalConstants,
) -> f64 {
    (4.0 * std::f64::consts::PI * constants.vacuum_permittivity * 3.0 * dipole_moment)
        / (2.0 * planet_radius.powi(3))
}

/// Derived escape quantities at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeState {
    /// Mean planetary surface field [T].
    pub planet_field: f64,
    /// Confinement ratio; `None` in the energy-limited regime.
    pub beta: Option<MagneticBeta>,
    /// Confinement factor applied to the rate (1 in the energy-limited regime).
    pub f_ap: f64,
    /// Instantaneous mass-loss rate [kg s^-1].
    pub rate: f64,
}
