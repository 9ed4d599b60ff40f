#![deny(missing_docs)]
#![doc = "Reading simulator forward outputs and reducing completed sweeps to loss-metric grids."]

pub mod mode;
/// Run directory discovery and contour grids.
pub mod survey;
pub mod table;

pub use mode::{LossMetric, LossMode, MassKind, PRESENT_DAY_YEARS};
pub use survey::{parse_run_indices, survey_sweep, ContourGrid, SurveyCell, SurveyOptions};
pub use table::{body_file_for, discover_output_order, OutputTable};
