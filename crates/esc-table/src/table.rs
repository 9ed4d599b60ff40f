//! Whitespace-delimited simulator output tables.
//!
//! Output files carry no header; column names come from the `saOutputOrder`
//! directive of the body input file sitting next to them.

use std::fs;
use std::path::{Path, PathBuf};

use esc_core::errors::{ErrorInfo, EscError};

/// Directive listing the columns written to a body's forward output.
pub const OUTPUT_ORDER_DIRECTIVE: &str = "saOutputOrder";

const CONTINUATION: char = '$';

/// Extracts the column names declared by the last `saOutputOrder` directive
/// in a body input file.
///
/// The directive may span several lines joined by a trailing `$`. A leading
/// `-` on a name selects the alternate output unit and is not part of the
/// column name.
pub fn discover_output_order(body_text: &str) -> Result<Vec<String>, EscError> {
    let Some(position) = body_text.rfind(OUTPUT_ORDER_DIRECTIVE) else {
        return Err(EscError::Configuration(
            ErrorInfo::new("output-order-missing", "body file declares no output order")
                .with_hint("add an saOutputOrder line to the body input file"),
        ));
    };
    let rest = &body_text[position + OUTPUT_ORDER_DIRECTIVE.len()..];

    let mut columns = Vec::new();
    for line in rest.lines() {
        let line = line.split('#').next().unwrap_or_default().trim_end();
        let (content, continued) = match line.strip_suffix(CONTINUATION) {
            Some(content) => (content, true),
            None => (line, false),
        };
        columns.extend(
            content
                .split_whitespace()
                .map(|token| token.trim_start_matches('-'))
                .filter(|token| !token.is_empty() && *token != "$")
                .map(str::to_string),
        );
        if !continued {
            break;
        }
    }
    if columns.is_empty() {
        return Err(EscError::Configuration(ErrorInfo::new(
            "output-order-empty",
            "saOutputOrder lists no columns",
        )));
    }
    Ok(columns)
}

/// Body input file describing a forward output file:
/// `dir/sol.earth.forward` maps to `dir/earth.in`.
pub fn body_file_for(output_path: &Path) -> Result<PathBuf, EscError> {
    let name = output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 2 || parts[parts.len() - 2].is_empty() {
        return Err(EscError::Configuration(
            ErrorInfo::new("output-name", "cannot derive the body name from the output file")
                .with_path(output_path)
                .with_hint("output files are named {system}.{body}.forward"),
        ));
    }
    let body = format!("{}.in", parts[parts.len() - 2]);
    Ok(match output_path.parent() {
        Some(parent) => parent.join(body),
        None => PathBuf::from(body),
    })
}

/// Column-oriented numeric table.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    columns: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl OutputTable {
    /// Parses whitespace-delimited rows under the given column names.
    /// Blank lines are ignored.
    pub fn parse(text: &str, columns: Vec<String>) -> Result<Self, EscError> {
        let mut data = vec![Vec::new(); columns.len()];
        for (number, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != columns.len() {
                return Err(EscError::InvalidInput(
                    ErrorInfo::new("table-field-count", "row width does not match the columns")
                        .with_context("line", (number + 1).to_string())
                        .with_context("expected", columns.len().to_string())
                        .with_context("found", fields.len().to_string()),
                ));
            }
            for ((column, field), name) in data.iter_mut().zip(&fields).zip(&columns) {
                let value = field.parse::<f64>().map_err(|_| {
                    EscError::InvalidInput(
                        ErrorInfo::new("table-number", "field is not a number")
                            .with_context("line", (number + 1).to_string())
                            .with_context("column", name.clone())
                            .with_context("field", *field),
                    )
                })?;
                column.push(value);
            }
        }
        Ok(Self { columns, data })
    }

    /// Reads an output file. Without explicit `columns` the names are
    /// discovered from the companion body file (see [`body_file_for`]).
    pub fn read(path: &Path, columns: Option<&[String]>) -> Result<Self, EscError> {
        let columns = match columns {
            Some(columns) => columns.to_vec(),
            None => {
                let body_path = body_file_for(path)?;
                let body = fs::read_to_string(&body_path)
                    .map_err(|err| EscError::io("body-read", &body_path, err))?;
                discover_output_order(&body).map_err(|err| match err {
                    EscError::Configuration(info) => {
                        EscError::Configuration(info.with_path(&body_path))
                    }
                    other => other,
                })?
            }
        };
        let text = fs::read_to_string(path).map_err(|err| EscError::io("table-read", path, err))?;
        Self::parse(&text, columns).map_err(|err| match err {
            EscError::InvalidInput(info) => EscError::InvalidInput(info.with_path(path)),
            other => other,
        })
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Result<&[f64], EscError> {
        self.columns
            .iter()
            .position(|column| column == name)
            .map(|index| self.data[index].as_slice())
            .ok_or_else(|| {
                EscError::Configuration(
                    ErrorInfo::new("table-column", "table has no such column")
                        .with_context("column", name)
                        .with_context("available", self.columns.join(" ")),
                )
            })
    }

    /// Keeps only the named columns, in the requested order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, EscError> {
        let mut columns = Vec::with_capacity(names.len());
        let mut data = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            data.push(self.column(name)?.to_vec());
            columns.push(name.to_string());
        }
        Ok(Self { columns, data })
    }
}
