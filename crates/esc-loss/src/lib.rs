#![deny(missing_docs)]
#![doc = "Atmospheric mass loss under stellar XUV irradiation, with optional magnetic confinement of the outflow."]

/// Planet and star descriptions.
pub mod body;
/// YAML integrator configuration.
pub mod config;
pub mod escape;
mod export;
/// Euler integration and per-sample diagnostics.
pub mod integrate;
/// Input time series.
pub mod series;

pub use body::{orbital_distance_for_flux, orbital_distances_for_flux, Planet, Star};
pub use config::IntegratorConfig;
pub use escape::{planet_surface_field, EscapeRegime, EscapeState, MagneticBeta};
pub use integrate::{EscapeProfile, MassLossIntegrator, MassLossTrajectory, ProfileRow};
pub use series::PhysicalTimeSeries;
