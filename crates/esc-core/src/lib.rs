#![deny(missing_docs)]
#![doc = "Shared error taxonomy, physical constants and canonical serde helpers for the escape workspace."]

pub mod constants;
pub mod errors;
/// Canonical JSON, YAML and hashing helpers.
pub mod serde;

pub use constants::{EarthAbundances, PhysicalConstants};
pub use errors::{ErrorInfo, EscError};
