use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::FileError;

/// Read a file to a string
pub fn read_file(path: &Path) -> Result<String, FileError> {
    let bytes = fs::read(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|source| FileError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Write content to a file.
///
/// The content goes to a temp file next to the real document first and is
/// then renamed over it, so readers never see a half-written document. A
/// symlinked `path` is followed, so the link itself survives. Permissions of
/// an existing file are carried over, and a read-only file is refused.
pub fn write_file(path: &Path, content: &str) -> Result<(), FileError> {
    let io_err = |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    };

    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(err) if err.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(err) => return Err(io_err(err)),
    };

    let existing = match fs::metadata(&target) {
        Ok(metadata) => Some(metadata),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => return Err(io_err(err)),
    };

    // rename(2) only needs a writable directory, so check the file itself
    if existing.as_ref().is_some_and(|m| m.permissions().readonly()) {
        return Err(io_err(io::Error::new(
            ErrorKind::PermissionDenied,
            "file is read-only",
        )));
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(content.as_bytes()).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;

    if let Some(metadata) = existing {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_err)?;
    }

    temp.persist(&target).map_err(|source| FileError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
