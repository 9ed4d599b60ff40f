use std::fs;
use std::path::{Path, PathBuf};

use esc_core::errors::{ErrorInfo, EscError};
use esc_core::serde::{from_yaml_slice, to_yaml_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::axis::{InputOption, ParameterAxis};
use crate::expand::{ParameterSweep, Scheduler};
use crate::template::{TemplateDocument, DEFAULT_MARKER};

/// Evenly spaced values including both end points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linspace {
    /// First value.
    pub start: f64,
    /// Last value.
    pub stop: f64,
    /// Number of values.
    pub num: usize,
}

impl Linspace {
    /// Materializes the values.
    pub fn values(&self) -> Vec<f64> {
        match self.num {
            0 => Vec::new(),
            1 => vec![self.start],
            num => {
                let step = (self.stop - self.start) / (num - 1) as f64;
                (0..num)
                    .map(|i| {
                        if i + 1 == num {
                            self.stop
                        } else {
                            self.start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Axis as written in a plan: explicit values or a linear range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Axis name.
    pub name: String,
    /// Input file receiving the options.
    pub file: String,
    /// Option names; a leading `-` selects the alternate unit.
    pub options: Vec<InputOption>,
    /// Explicit values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    /// Linear range generating the values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linspace: Option<Linspace>,
}

impl AxisSpec {
    /// Resolves the value source into a concrete axis.
    pub fn to_axis(&self) -> Result<ParameterAxis, EscError> {
        let values = match (&self.values, &self.linspace) {
            (Some(values), None) => values.clone(),
            (None, Some(range)) => range.values().into_iter().map(Value::from).collect(),
            _ => {
                return Err(EscError::Configuration(
                    ErrorInfo::new(
                        "axis-value-source",
                        "axis needs exactly one of `values` or `linspace`",
                    )
                    .with_context("axis", self.name.clone()),
                ))
            }
        };
        Ok(ParameterAxis {
            name: self.name.clone(),
            file: self.file.clone(),
            options: self.options.clone(),
            values,
        })
    }
}

/// Parameter sweep described in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Trial name prefixing every run directory.
    #[serde(default = "SweepPlan::default_trial_name")]
    pub trial_name: String,
    /// Sweep directory, relative to the plan file unless absolute.
    pub destination: PathBuf,
    /// Insertion marker.
    #[serde(default = "SweepPlan::default_marker")]
    pub marker: String,
    /// Simulator input files, relative to the plan file unless absolute.
    pub files: Vec<PathBuf>,
    /// Varied parameters in column order.
    #[serde(default)]
    pub axes: Vec<AxisSpec>,
    /// Row execution settings.
    #[serde(default)]
    pub scheduler: Scheduler,
    /// Directory containing the plan on disk.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl SweepPlan {
    fn default_trial_name() -> String {
        "run".to_string()
    }

    fn default_marker() -> String {
        DEFAULT_MARKER.to_string()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Resolved sweep directory.
    pub fn destination_path(&self) -> PathBuf {
        self.resolve(&self.destination)
    }

    /// Reads the input files and builds the sweep.
    pub fn build(&self) -> Result<ParameterSweep, EscError> {
        let documents = self
            .files
            .iter()
            .map(|file| TemplateDocument::read(&self.resolve(file)))
            .collect::<Result<Vec<_>, _>>()?;
        let axes = self
            .axes
            .iter()
            .map(AxisSpec::to_axis)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParameterSweep::new(self.trial_name.clone(), axes, documents, Vec::new())?
            .with_marker(self.marker.clone()))
    }

    /// Canonical YAML rendering.
    pub fn to_yaml_string(&self) -> Result<String, EscError> {
        to_yaml_string(self)
    }
}

/// Loads a sweep plan, resolving relative paths against its directory.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<SweepPlan, EscError> {
    let plan_path = path.as_ref();
    let bytes = fs::read(plan_path).map_err(|err| EscError::io("plan-read", plan_path, err))?;
    let mut plan: SweepPlan = from_yaml_slice(&bytes)?;
    plan.base_dir = plan_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok(plan)
}
