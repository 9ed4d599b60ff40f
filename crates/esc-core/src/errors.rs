//! Structured error types shared across escape crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`EscError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (axis names, row indices, paths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds the offending filesystem path as context.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the escape workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EscError {
    /// Malformed or non-monotonic input data.
    #[error("invalid input: {0}")]
    InvalidInput(ErrorInfo),
    /// Inconsistent configuration (axes, templates, modes, bodies).
    #[error("configuration error: {0}")]
    Configuration(ErrorInfo),
    /// A template document lacks its insertion marker.
    #[error("missing marker: {0}")]
    MissingMarker(ErrorInfo),
    /// Row index beyond the combinatorial space of a sweep.
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(ErrorInfo),
    /// Filesystem failures on read, write or directory creation.
    #[error("io failure: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl EscError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EscError::InvalidInput(info)
            | EscError::Configuration(info)
            | EscError::MissingMarker(info)
            | EscError::IndexOutOfBounds(info)
            | EscError::Io(info)
            | EscError::Serde(info) => info,
        }
    }

    /// Wraps a filesystem error raised while touching `path`.
    pub fn io(code: &str, path: &Path, err: impl ToString) -> Self {
        EscError::Io(ErrorInfo::new(code, err.to_string()).with_path(path))
    }
}
