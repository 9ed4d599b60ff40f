#![deny(missing_docs)]
#![doc = "Cartesian parameter sweeps over simulator input files: run directory trees plus a batch manifest."]

/// Axes and the options they write.
pub mod axis;
/// Row rendering, run directory writes and the sweep report.
pub mod expand;
/// Row-major combination indexing.
pub mod grid;
/// The `vspace.in` batch manifest.
pub mod manifest;
/// YAML sweep plans.
pub mod plan;
/// Input documents and marker splicing.
pub mod template;
mod write;

pub use axis::{render_value, InputOption, ParameterAxis};
pub use expand::{ParameterSweep, Scheduler, SweepJob, SweepReport};
pub use grid::{SweepCombination, SweepGrid};
pub use manifest::{SweepManifest, MANIFEST_FILE_NAME};
pub use plan::{load_plan, AxisSpec, Linspace, SweepPlan};
pub use template::{TemplateDocument, BODY_FILES_MARKER, DEFAULT_MARKER};
