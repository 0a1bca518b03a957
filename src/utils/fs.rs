use crate::error::{Result, TtsdkError};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

fn map_io(path: &Path, e: std::io::Error) -> TtsdkError {
    match e.kind() {
        ErrorKind::PermissionDenied => TtsdkError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => TtsdkError::from(e),
    }
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| map_io(path, e))?;
    }
    Ok(())
}

/// Removes a file or directory tree. A missing path is not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(map_io(path, e)),
    };

    debug!("Removing {}", path.display());
    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(map_io(path, e)),
    }
}

/// Replaces whatever is at `path` with a fresh, empty directory.
pub fn replace_dir(path: &Path) -> Result<()> {
    remove_path(path)?;
    std::fs::create_dir_all(path).map_err(|e| map_io(path, e))
}

/// Replaces whatever is at `path` with a file holding `contents`.
pub fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Err(e) = remove_path(path) {
        debug!("Could not remove {}: {e}", path.display());
    }
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    std::fs::write(path, contents).map_err(|e| map_io(path, e))
}

/// Renames `from` to `to`. If the rename fails, whatever occupies `to` is
/// removed and the rename is attempted once more.
pub fn move_replacing(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = std::fs::rename(from, to) {
        debug!(
            "Moving {} to {} failed ({e}), removing stale destination and retrying",
            from.display(),
            to.display()
        );
        remove_path(to)?;
        std::fs::rename(from, to).map_err(|e| map_io(to, e))?;
    }
    Ok(())
}

pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir_exists(parent)?;
    }

    std::fs::copy(from, to).map_err(|e| map_io(from, e))?;
    Ok(())
}
