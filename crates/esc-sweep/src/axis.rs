use esc_core::errors::{ErrorInfo, EscError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Simulator option written for every value of an axis.
///
/// A leading `-` on the configured option is a unit-sign marker: the option
/// name is written without it and the sign is placed in front of the value,
/// which the simulator reads as "use the alternate unit".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct InputOption {
    name: String,
    negated: bool,
}

impl InputOption {
    /// Parses an option as written in a sweep configuration.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.strip_prefix('-') {
            Some(name) => Self {
                name: name.to_string(),
                negated: true,
            },
            None => Self {
                name: raw.to_string(),
                negated: false,
            },
        }
    }

    /// Option name without the unit-sign marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the value is written with a leading `-`.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Renders the `"{option} {value}"` line for `value`.
    pub fn render(&self, value: &Value) -> String {
        let sign = if self.negated { "-" } else { "" };
        format!("{} {}{}", self.name, sign, render_value(value))
    }
}

impl From<String> for InputOption {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<InputOption> for String {
    fn from(option: InputOption) -> Self {
        if option.negated {
            format!("-{}", option.name)
        } else {
            option.name
        }
    }
}

/// Plain-text rendering of a parameter value inside a simulator input file.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One varied parameter: a name, its candidate values and the options of a
/// single template file it is written into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAxis {
    /// Axis name, used in run directory names (`_{name}{k}`).
    pub name: String,
    /// Base name of the template file this axis is written into.
    pub file: String,
    /// Options receiving the selected value.
    pub options: Vec<InputOption>,
    /// Ordered candidate values.
    pub values: Vec<Value>,
}

impl ParameterAxis {
    /// Creates an axis from option strings (a leading `-` marks a negated unit).
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        file: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        values: Vec<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            options: options
                .into_iter()
                .map(|option| InputOption::parse(option.as_ref()))
                .collect(),
            values,
        }
    }

    /// Number of candidate values.
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn validate(&self) -> Result<(), EscError> {
        let fail = |code: &str, message: &str| {
            Err(EscError::Configuration(
                ErrorInfo::new(code, message).with_context("axis", self.name.clone()),
            ))
        };
        if self.name.trim().is_empty() || self.name.chars().any(char::is_whitespace) {
            return fail("axis-name", "axis names must be non-empty and contain no whitespace");
        }
        if self.values.is_empty() {
            return fail("axis-values", "axis has no values");
        }
        if self.options.is_empty() || self.options.iter().any(|option| option.name.is_empty()) {
            return fail("axis-options", "axis must register at least one named option");
        }
        Ok(())
    }
}
