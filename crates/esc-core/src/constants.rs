//! Physical constants and reference values.
//!
//! The named `const` items are the defaults; computations take a
//! [`PhysicalConstants`] value so alternate unit conventions can be injected.

use serde::{Deserialize, Serialize};

/// Gravitational constant [m^3 kg^-1 s^-2].
pub const G: f64 = 6.674e-11;

/// Permittivity factor used when converting dipole moments to surface fields
/// [C^2 kg^-1 m^-3 s^2].
pub const EPSILON_0: f64 = 8.82e-12;

/// Seconds in one year; VPLanet output tables report `Time` in years.
pub const SECONDS_PER_YEAR: f64 = 3.1536e7;

/// Nominal solar luminosity [W].
pub const SOLAR_LUMINOSITY: f64 = 3.828e26;

/// Present-day Earth magnetic dipole moment [A m^2].
pub const EARTH_MAGNETIC_MOMENT: f64 = 7.94e22;

/// Earth volumetric mean radius [m].
pub const EARTH_RADIUS: f64 = 6.371e6;

/// Earth mass [kg].
pub const EARTH_MASS: f64 = 5.97e24;

/// Bolometric flux received by Earth [W m^-2].
pub const EARTH_FLUX: f64 = 1361.87527448;

/// Astronomical unit [m].
pub const AU: f64 = 1.49598e11;

/// Solar volumetric mean radius [m].
pub const SOLAR_RADIUS: f64 = 6.957e8;

/// Mean solar surface field [T].
pub const SOLAR_SURFACE_FIELD: f64 = 1e-4;

/// Years per gigayear.
pub const YEARS_PER_GYR: f64 = 1e9;

/// Unit conventions and universal constants injected into computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Gravitational constant.
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    /// Permittivity factor for the dipole to surface field conversion.
    #[serde(default = "default_vacuum_permittivity")]
    pub vacuum_permittivity: f64,
    /// Seconds per unit of the input series' time axis.
    #[serde(default = "default_seconds_per_time_unit")]
    pub seconds_per_time_unit: f64,
    /// Luminosity unit used by normalized stellar luminosity columns.
    #[serde(default = "default_solar_luminosity")]
    pub solar_luminosity: f64,
    /// Dipole unit used by normalized magnetic moment columns.
    #[serde(default = "default_earth_magnetic_moment")]
    pub earth_magnetic_moment: f64,
}

fn default_gravitational_constant() -> f64 {
    G
}

fn default_vacuum_permittivity() -> f64 {
    EPSILON_0
}

fn default_seconds_per_time_unit() -> f64 {
    SECONDS_PER_YEAR
}

fn default_solar_luminosity() -> f64 {
    SOLAR_LUMINOSITY
}

fn default_earth_magnetic_moment() -> f64 {
    EARTH_MAGNETIC_MOMENT
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gravitational_constant: G,
            vacuum_permittivity: EPSILON_0,
            seconds_per_time_unit: SECONDS_PER_YEAR,
            solar_luminosity: SOLAR_LUMINOSITY,
            earth_magnetic_moment: EARTH_MAGNETIC_MOMENT,
        }
    }
}

/// Primordial Earth radiogenic inventories, in number of atoms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthAbundances {
    /// 232Th in the core.
    pub th232_core: f64,
    /// 232Th in the mantle.
    pub th232_mantle: f64,
    /// 238U in the core.
    pub u238_core: f64,
    /// 238U in the mantle.
    pub u238_mantle: f64,
    /// 235U in the core.
    pub u235_core: f64,
    /// 235U in the mantle.
    pub u235_mantle: f64,
    /// 40K in the mantle.
    pub k40_mantle: f64,
    /// 40K in the core.
    pub k40_core: f64,
}

impl Default for EarthAbundances {
    fn default() -> Self {
        Self {
            th232_core: 1.35657e40,
            th232_mantle: 6.07873e41,
            u238_core: 2.95900e39,
            u238_mantle: 2.86829e41,
            u235_core: 2.45149e39,
            u235_mantle: 9.89663e40,
            k40_mantle: 9.72110e42,
            k40_core: 9.10261e42,
        }
    }
}
