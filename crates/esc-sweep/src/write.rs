use std::io::{self, Write};
use std::path::Path;

use esc_core::errors::EscError;
use tempfile::NamedTempFile;

/// Mode given to files that do not exist yet, matching a plain create under
/// the usual `022` umask.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Writes `contents` to `path` through a sibling temporary file and an atomic
/// rename, so readers never observe a partially written file.
///
/// The staged file takes the mode of the file it replaces, or `0644` when
/// `path` is new.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), EscError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged =
        NamedTempFile::new_in(dir).map_err(|err| EscError::io("stage-create", dir, err))?;
    staged
        .write_all(contents.as_bytes())
        .and_then(|()| staged.flush())
        .map_err(|err| EscError::io("stage-write", path, err))?;
    publish_mode(&staged, path).map_err(|err| EscError::io("stage-mode", path, err))?;
    staged
        .persist(path)
        .map_err(|err| EscError::io("stage-persist", path, err.error))?;
    Ok(())
}

#[cfg(unix)]
fn publish_mode(staged: &NamedTempFile, path: &Path) -> io::Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let mode = match fs::metadata(path) {
        Ok(meta) => meta.permissions().mode() & 0o7777,
        Err(err) if err.kind() == io::ErrorKind::NotFound => NEW_FILE_MODE,
        Err(err) => return Err(err),
    };
    staged
        .as_file()
        .set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn publish_mode(_staged: &NamedTempFile, _path: &Path) -> io::Result<()> {
    Ok(())
}
