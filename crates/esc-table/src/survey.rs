use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use esc_core::constants::EarthAbundances;
use esc_core::errors::{ErrorInfo, EscError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::mode::{LossMode, PRESENT_DAY_YEARS};
use crate::table::OutputTable;

/// Core 40K column.
pub const K40_CORE_COLUMN: &str = "40KNumCore";
/// Mantle 232Th column.
pub const TH232_MANTLE_COLUMN: &str = "232ThNumMan";

/// Settings for reducing a completed sweep to a contour grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyOptions {
    /// Axis indexing grid rows (40K core abundance).
    pub x_axis: String,
    /// Axis indexing grid columns (232Th mantle abundance).
    pub y_axis: String,
    /// Forward output file inside each run directory.
    pub output_file: String,
    /// Metric evaluated per run.
    pub mode: LossMode,
    /// Cutoff age in years for mass metrics.
    #[serde(default = "SurveyOptions::default_cutoff")]
    pub cutoff: f64,
    /// Normalisation of the initial abundances.
    #[serde(default)]
    pub abundances: EarthAbundances,
}

impl SurveyOptions {
    fn default_cutoff() -> f64 {
        PRESENT_DAY_YEARS
    }

    /// Options with the default cutoff and Earth abundances.
    pub fn new(
        x_axis: impl Into<String>,
        y_axis: impl Into<String>,
        output_file: impl Into<String>,
        mode: LossMode,
    ) -> Self {
        Self {
            x_axis: x_axis.into(),
            y_axis: y_axis.into(),
            output_file: output_file.into(),
            mode,
            cutoff: Self::default_cutoff(),
            abundances: EarthAbundances::default(),
        }
    }
}

/// One run reduced to a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyCell {
    /// Index along the x axis.
    pub x_index: usize,
    /// Index along the y axis.
    pub y_index: usize,
    /// Initial core 40K in Earth units.
    pub x: f64,
    /// Initial mantle 232Th in Earth units.
    pub y: f64,
    /// Metric value; empty when a desiccation never happens.
    pub value: Option<f64>,
}

/// Dense grid of survey cells, row-major over `(x_index, y_index)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourGrid {
    rows: usize,
    columns: usize,
    cells: Vec<SurveyCell>,
    label: String,
}

impl ContourGrid {
    /// Assembles a grid, requiring every `(x_index, y_index)` cell exactly once.
    pub fn from_cells(mut cells: Vec<SurveyCell>, label: impl Into<String>) -> Result<Self, EscError> {
        let rows = cells.iter().map(|cell| cell.x_index + 1).max().unwrap_or(0);
        let columns = cells.iter().map(|cell| cell.y_index + 1).max().unwrap_or(0);
        cells.sort_by_key(|cell| (cell.x_index, cell.y_index));
        if let Some(pair) = cells
            .windows(2)
            .find(|pair| (pair[0].x_index, pair[0].y_index) == (pair[1].x_index, pair[1].y_index))
        {
            return Err(EscError::Configuration(
                ErrorInfo::new("survey-duplicate-cell", "two runs share grid indices")
                    .with_context("x_index", pair[0].x_index.to_string())
                    .with_context("y_index", pair[0].y_index.to_string()),
            ));
        }
        if cells.is_empty() || cells.len() != rows * columns {
            return Err(EscError::Configuration(
                ErrorInfo::new("survey-incomplete", "sweep does not cover a full grid")
                    .with_context("cells", cells.len().to_string())
                    .with_context("rows", rows.to_string())
                    .with_context("columns", columns.to_string()),
            ));
        }
        Ok(Self {
            rows,
            columns,
            cells,
            label: label.into(),
        })
    }

    /// Number of x positions.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of y positions.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Metric label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[SurveyCell] {
        &self.cells
    }

    /// Cell at `(x_index, y_index)`.
    pub fn cell(&self, x_index: usize, y_index: usize) -> Option<&SurveyCell> {
        (x_index < self.rows && y_index < self.columns)
            .then(|| &self.cells[x_index * self.columns + y_index])
    }

    /// x coordinate of each row, taken from the first column.
    pub fn x_coords(&self) -> Vec<f64> {
        (0..self.rows).map(|i| self.cells[i * self.columns].x).collect()
    }

    /// y coordinate of each column, taken from the first row.
    pub fn y_coords(&self) -> Vec<f64> {
        self.cells[..self.columns].iter().map(|cell| cell.y).collect()
    }

    /// Bilinear interpolation of the metric at `(x, y)`.
    ///
    /// Returns `None` outside the grid or when a surrounding cell has no
    /// value. `reference_value(1.0, 1.0)` is the metric for Earth's
    /// abundances.
    pub fn reference_value(&self, x: f64, y: f64) -> Option<f64> {
        let (i, tx) = bracket(&self.x_coords(), x)?;
        let (j, ty) = bracket(&self.y_coords(), y)?;
        let i1 = (i + 1).min(self.rows - 1);
        let j1 = (j + 1).min(self.columns - 1);
        let z00 = self.cell(i, j)?.value?;
        let z01 = self.cell(i, j1)?.value?;
        let z10 = self.cell(i1, j)?.value?;
        let z11 = self.cell(i1, j1)?.value?;
        let low = z00 + (z01 - z00) * ty;
        let high = z10 + (z11 - z10) * ty;
        Some(low + (high - low) * tx)
    }

    /// Writes one CSV row per cell.
    pub fn write_csv(&self, path: &Path) -> Result<(), EscError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| EscError::io("csv-mkdir", parent, err))?;
        }
        let mut writer = csv::Writer::from_path(path).map_err(|err| wrap_csv(path, err))?;
        for cell in &self.cells {
            writer.serialize(cell).map_err(|err| wrap_csv(path, err))?;
        }
        writer
            .flush()
            .map_err(|err| EscError::io("csv-flush", path, err))
    }
}

/// Lower index and fractional offset of `value` within increasing `coords`.
fn bracket(coords: &[f64], value: f64) -> Option<(usize, f64)> {
    match coords {
        [] => None,
        [only] => (*only == value).then_some((0, 0.0)),
        _ => {
            let last = coords.len() - 1;
            if !(coords[0] <= value && value <= coords[last]) {
                return None;
            }
            let i = coords
                .windows(2)
                .position(|pair| value <= pair[1])
                .unwrap_or(last - 1);
            let span = coords[i + 1] - coords[i];
            let t = if span > 0.0 { (value - coords[i]) / span } else { 0.0 };
            Some((i, t))
        }
    }
}

fn wrap_csv(path: &Path, err: csv::Error) -> EscError {
    EscError::Io(
        ErrorInfo::new("csv-write", "CSV export failure")
            .with_path(path)
            .with_hint(err.to_string()),
    )
}

/// Extracts `{axis}{k}` indices from the `_`-separated parts of a run
/// directory name.
pub fn parse_run_indices(run_name: &str, axes: &[&str]) -> BTreeMap<String, usize> {
    let mut found = BTreeMap::new();
    for part in run_name.split('_').skip(1) {
        for axis in axes {
            let Some(digits) = part.strip_prefix(axis) else {
                continue;
            };
            if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
                continue;
            }
            if let Ok(index) = digits.parse() {
                found.insert((*axis).to_string(), index);
            }
        }
    }
    found
}

/// Reduces every run directory under `dir` to one contour grid cell.
///
/// Entries whose name does not carry both axis indices are skipped.
pub fn survey_sweep(dir: &Path, options: &SurveyOptions) -> Result<ContourGrid, EscError> {
    info!(dir = %dir.display(), mode = %options.mode, "surveying parameter sweep");
    let axes = [options.x_axis.as_str(), options.y_axis.as_str()];
    let mut cells = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            EscError::io("survey-walk", &path, err)
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let indices = parse_run_indices(&name, &axes);
        let (Some(&x_index), Some(&y_index)) =
            (indices.get(&options.x_axis), indices.get(&options.y_axis))
        else {
            warn!(entry = %name, "skipping directory without sweep indices");
            continue;
        };
        let output: PathBuf = entry.path().join(&options.output_file);
        cells.push(survey_run(&output, x_index, y_index, options)?);
        if cells.len() % 50 == 0 {
            debug!(runs = cells.len(), "survey progress");
        }
    }
    ContourGrid::from_cells(cells, options.mode.label())
}

fn survey_run(
    output: &Path,
    x_index: usize,
    y_index: usize,
    options: &SurveyOptions,
) -> Result<SurveyCell, EscError> {
    let table = OutputTable::read(output, None)?;
    let initial = |column: &str| -> Result<f64, EscError> {
        table.column(column)?.first().copied().ok_or_else(|| {
            EscError::InvalidInput(
                ErrorInfo::new("table-empty", "output table has no rows").with_path(output),
            )
        })
    };
    Ok(SurveyCell {
        x_index,
        y_index,
        x: initial(K40_CORE_COLUMN)? / options.abundances.k40_core,
        y: initial(TH232_MANTLE_COLUMN)? / options.abundances.th232_mantle,
        value: options.mode.evaluate(&table, options.cutoff)?,
    })
}
