use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use esc_core::errors::{ErrorInfo, EscError};
use esc_core::serde::stable_hash_string;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::axis::ParameterAxis;
use crate::grid::{SweepCombination, SweepGrid};
use crate::manifest::SweepManifest;
use crate::template::{TemplateDocument, DEFAULT_MARKER};
use crate::write::write_atomic;

/// Scheduler configuration controlling row execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    /// Number of rows written concurrently; 1 writes rows in order on the
    /// calling thread.
    #[serde(default = "Scheduler::default_parallelism")]
    pub parallelism: usize,
}

impl Scheduler {
    const fn default_parallelism() -> usize {
        1
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            parallelism: Self::default_parallelism(),
        }
    }
}

/// Record of one written run directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepJob {
    /// Row within the sweep.
    pub row: usize,
    /// Selected value index per axis.
    pub indices: Vec<usize>,
    /// Run directory name relative to the sweep directory.
    pub out_dir: String,
    /// Selected value per axis name.
    pub params: BTreeMap<String, Value>,
}

/// Summary of a completed expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Stable hash of the axes and template contents.
    pub plan_hash: String,
    /// Sweep directory holding the run directories.
    pub destination: PathBuf,
    /// Location of the written manifest.
    pub manifest_path: PathBuf,
    /// Manifest written for the sweep.
    pub manifest: SweepManifest,
    /// Jobs in row order.
    pub jobs: Vec<SweepJob>,
}

/// Rendered contents of one row, prepared before any file is written.
struct RowFiles {
    job: SweepJob,
    files: Vec<(String, String)>,
}

/// Expands parameter axes over a set of simulator input files.
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    trial_name: String,
    axes: Vec<ParameterAxis>,
    templates: Vec<TemplateDocument>,
    unvaried: Vec<TemplateDocument>,
    grid: SweepGrid,
    marker: String,
}

impl ParameterSweep {
    /// Validates the axes against the documents and builds the sweep.
    ///
    /// Documents are matched to axes by base file name. A document becomes a
    /// template when at least one axis is written into it, regardless of the
    /// list it was passed in; every other document is copied unchanged.
    pub fn new(
        trial_name: impl Into<String>,
        axes: Vec<ParameterAxis>,
        templates: Vec<TemplateDocument>,
        unvaried: Vec<TemplateDocument>,
    ) -> Result<Self, EscError> {
        let trial_name = trial_name.into();
        let mut seen_axes = BTreeSet::new();
        for axis in &axes {
            axis.validate()?;
            if !seen_axes.insert(axis.name.as_str()) {
                return Err(EscError::Configuration(
                    ErrorInfo::new("axis-duplicate", "axis names must be unique")
                        .with_context("axis", axis.name.clone()),
                ));
            }
        }

        let mut seen_files = BTreeSet::new();
        for document in templates.iter().chain(&unvaried) {
            if !seen_files.insert(document.file_name().to_string()) {
                return Err(EscError::Configuration(
                    ErrorInfo::new("template-duplicate", "input file names must be unique")
                        .with_context("file", document.file_name()),
                ));
            }
        }
        for axis in &axes {
            if !seen_files.contains(&axis.file) {
                return Err(EscError::Configuration(
                    ErrorInfo::new("axis-file", "axis references an unknown input file")
                        .with_context("axis", axis.name.clone())
                        .with_context("file", axis.file.clone())
                        .with_hint("list the file among the sweep's templates or unvaried files"),
                ));
            }
        }

        let owned: BTreeSet<&str> = axes.iter().map(|axis| axis.file.as_str()).collect();
        let (templates, unvaried): (Vec<_>, Vec<_>) = templates
            .into_iter()
            .chain(unvaried)
            .partition(|document| owned.contains(document.file_name()));

        let grid = SweepGrid::new(axes.iter().map(ParameterAxis::cardinality).collect())?;
        Ok(Self {
            trial_name,
            axes,
            templates,
            unvaried,
            grid,
            marker: DEFAULT_MARKER.to_string(),
        })
    }

    /// Replaces the insertion marker (default `saOutputOrder`).
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Trial name.
    pub fn trial_name(&self) -> &str {
        &self.trial_name
    }

    /// Axes in column order.
    pub fn axes(&self) -> &[ParameterAxis] {
        &self.axes
    }

    /// Documents receiving injected options.
    pub fn templates(&self) -> &[TemplateDocument] {
        &self.templates
    }

    /// Documents copied unchanged.
    pub fn unvaried(&self) -> &[TemplateDocument] {
        &self.unvaried
    }

    /// Combination grid.
    pub fn grid(&self) -> &SweepGrid {
        &self.grid
    }

    /// Run directory name for a combination: the trial name followed by
    /// `_{axis}{k}` per axis.
    pub fn run_name(&self, combination: &SweepCombination) -> String {
        let mut name = self.trial_name.clone();
        for (axis, k) in self.axes.iter().zip(&combination.indices) {
            name.push('_');
            name.push_str(&axis.name);
            name.push_str(&k.to_string());
        }
        name
    }

    /// Injection block for `template` under `combination`.
    pub fn injection_block(&self, template: &str, combination: &SweepCombination) -> String {
        let mut block = String::new();
        for (column, (axis, k)) in self.axes.iter().zip(&combination.indices).enumerate() {
            if axis.file != template {
                continue;
            }
            block.push_str(&format!("# Varied parameter {}\n", column + 1));
            for option in &axis.options {
                block.push_str(&option.render(&axis.values[*k]));
                block.push('\n');
            }
            block.push('\n');
        }
        block
    }

    fn render_row(&self, row: usize) -> Result<RowFiles, EscError> {
        let combination = self.grid.combination(row)?;
        let mut files = Vec::with_capacity(self.templates.len() + self.unvaried.len());
        for template in &self.templates {
            let block = self.injection_block(template.file_name(), &combination);
            let spliced = template.splice(&block, &self.marker).map_err(|err| match err {
                EscError::MissingMarker(info) => {
                    EscError::MissingMarker(info.with_context("row", row.to_string()))
                }
                other => other,
            })?;
            files.push((template.file_name().to_string(), spliced));
        }
        for document in &self.unvaried {
            files.push((
                document.file_name().to_string(),
                document.contents().to_string(),
            ));
        }
        let params = self
            .axes
            .iter()
            .zip(&combination.indices)
            .map(|(axis, k)| (axis.name.clone(), axis.values[*k].clone()))
            .collect();
        Ok(RowFiles {
            job: SweepJob {
                row,
                out_dir: self.run_name(&combination),
                indices: combination.indices,
                params,
            },
            files,
        })
    }

    /// Writes the run directory for a single row. Existing directories are
    /// reused and their files replaced.
    pub fn write_row(&self, destination: &Path, row: usize) -> Result<SweepJob, EscError> {
        let RowFiles { job, files } = self.render_row(row)?;
        let run_dir = destination.join(&job.out_dir);
        fs::create_dir_all(&run_dir).map_err(|err| EscError::io("run-dir", &run_dir, err))?;
        for (file_name, contents) in &files {
            write_atomic(&run_dir.join(file_name), contents)?;
        }
        debug!(row, dir = %job.out_dir, files = files.len(), "wrote sweep row");
        Ok(job)
    }

    /// Writes a contiguous range of rows in order. Disjoint ranges may be
    /// written concurrently.
    pub fn write_rows(
        &self,
        destination: &Path,
        rows: Range<usize>,
    ) -> Result<Vec<SweepJob>, EscError> {
        rows.map(|row| self.write_row(destination, row)).collect()
    }

    /// Manifest describing this sweep when rooted at `destination`.
    pub fn manifest(&self, destination: &Path) -> SweepManifest {
        let dest_dir_name = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| destination.display().to_string());
        let primary_file = self
            .templates
            .iter()
            .chain(&self.unvaried)
            .find(|document| document.declares_body_files())
            .map(|document| document.file_name().to_string());
        if primary_file.is_none() {
            warn!(trial = %self.trial_name, "no input file declares body files");
        }
        SweepManifest {
            dest_dir_name,
            trial_name: self.trial_name.clone(),
            body_files: self
                .templates
                .iter()
                .map(|document| document.file_name().to_string())
                .collect(),
            parameters: self.axes.iter().map(|axis| axis.name.clone()).collect(),
            primary_file,
        }
    }

    /// Stable hash over the trial name, axes and document contents.
    pub fn plan_hash(&self) -> Result<String, EscError> {
        stable_hash_string(&(
            &self.trial_name,
            &self.axes,
            &self.templates,
            &self.unvaried,
            &self.marker,
        ))
    }

    /// Writes every row sequentially, then the manifest.
    pub fn expand(&self, destination: &Path) -> Result<SweepReport, EscError> {
        self.expand_with(destination, &Scheduler::default())
    }

    /// Writes every row according to `scheduler`, then the manifest. The
    /// manifest is written only once all rows have succeeded.
    pub fn expand_with(
        &self,
        destination: &Path,
        scheduler: &Scheduler,
    ) -> Result<SweepReport, EscError> {
        fs::create_dir_all(destination)
            .map_err(|err| EscError::io("sweep-dir", destination, err))?;
        let rows = 0..self.grid.len();
        let jobs = if scheduler.parallelism <= 1 {
            self.write_rows(destination, rows)?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(scheduler.parallelism)
                .build()
                .map_err(|err| {
                    EscError::Configuration(ErrorInfo::new("thread-pool", err.to_string()))
                })?;
            let mut jobs = pool.install(|| {
                rows.into_par_iter()
                    .map(|row| self.write_row(destination, row))
                    .collect::<Result<Vec<_>, EscError>>()
            })?;
            jobs.sort_by_key(|job| job.row);
            jobs
        };

        let manifest = self.manifest(destination);
        let manifest_path = SweepManifest::path_for(destination);
        manifest.write(&manifest_path)?;
        info!(
            rows = jobs.len(),
            destination = %destination.display(),
            manifest = %manifest_path.display(),
            "parameter sweep expanded"
        );
        Ok(SweepReport {
            plan_hash: self.plan_hash()?,
            destination: destination.to_path_buf(),
            manifest_path,
            manifest,
            jobs,
        })
    }
}
