use std::fs;
use std::path::Path;

use esc_core::errors::{ErrorInfo, EscError};
use serde::Serialize;

/// Writes serializable rows to `path` as CSV with a header row.
pub(crate) fn write_rows<I, T>(path: &Path, rows: I) -> Result<(), EscError>
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| EscError::io("csv-mkdir", parent, err))?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(|err| wrap_csv("csv-open", path, err))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| wrap_csv("csv-write-row", path, err))?;
    }
    writer
        .flush()
        .map_err(|err| EscError::io("csv-flush", path, err))
}

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> EscError {
    EscError::Io(
        ErrorInfo::new(code, "CSV export failure")
            .with_path(path)
            .with_hint(err.to_string()),
    )
}
