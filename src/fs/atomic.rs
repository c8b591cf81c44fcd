//! Atomic file writes.
//!
//! Content goes to a uniquely named temporary file in the target's directory,
//! is synced to disk, and then renamed over the target. Source and target are
//! always on the same filesystem, so the rename is atomic on POSIX and uses
//! `MoveFileEx` with replace semantics on Windows (via `tempfile`).

use crate::error::{PycheckError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write bytes to `path`, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if path.file_name().is_none() {
        return Err(PycheckError::UserError(format!(
            "invalid file path '{}'",
            path.display()
        )));
    }

    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| {
            PycheckError::UserError(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Dropping `temp` on any error below removes the partial file.
    let mut temp = tempfile::Builder::new()
        .prefix(".pycheck-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| {
            PycheckError::UserError(format!(
                "failed to create temporary file in '{}': {}",
                parent.display(),
                e
            ))
        })?;

    write_and_sync(&mut temp, content)?;

    temp.persist(path).map_err(|e| {
        PycheckError::UserError(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e.error
        ))
    })?;

    sync_dir(parent);
    Ok(())
}

/// Atomically write a string to `path`.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Persist the directory entry of the renamed file.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(dir) = fs::File::open(dir) {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

fn write_and_sync(temp: &mut NamedTempFile, content: &[u8]) -> Result<()> {
    temp.write_all(content)
        .map_err(|e| PycheckError::UserError(format!("failed to write temporary file: {}", e)))?;
    temp.as_file().sync_all().map_err(|e| {
        PycheckError::UserError(format!("failed to sync temporary file to disk: {}", e))
    })
}
