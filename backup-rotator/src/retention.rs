//! Count-based retention of timestamped backup folders.

use crate::utils::errors::PruneError;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamp format of backup folder names.
pub const FOLDER_FORMAT: &str = "%d-%m-%y_%H-%M-%S";

/// Delete the oldest backup folders under `root` until at most
/// `max_folders` remain. Returns the deleted paths, oldest first.
///
/// A missing root is an empty listing, not an error. Non-directory entries
/// are ignored. A deletion failure aborts the pass; folders already
/// deleted stay deleted.
pub fn prune(root: &Path, max_folders: usize) -> Result<Vec<PathBuf>, PruneError> {
    let mut folders = list_backup_folders(root)?;
    let mut deleted = Vec::new();

    while folders.len() > max_folders {
        let oldest = folders.remove(0);
        fs::remove_dir_all(&oldest).map_err(|e| PruneError::Delete {
            path: oldest.clone(),
            source: e,
        })?;
        info!(path = %oldest.display(), "Deleted old backup folder");
        deleted.push(oldest);
    }

    Ok(deleted)
}

/// Immediate subdirectories of `root`, sorted ascending by creation
/// timestamp.
fn list_backup_folders(root: &Path) -> Result<Vec<PathBuf>, PruneError> {
    let list_error = |source| PruneError::List {
        path: root.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(list_error(e)),
    };

    let mut folders = Vec::new();
    for entry in entries {
        let path = entry.map_err(list_error)?.path();
        if path.is_dir() {
            folders.push((creation_key(&path), path));
        }
    }

    // Stable sort keeps directory order for (unexpected) equal keys
    folders.sort_by_key(|(key, _)| *key);
    Ok(folders.into_iter().map(|(_, path)| path).collect())
}

/// Ordering key for a backup folder: the timestamp embedded in its name
/// when it conforms, otherwise filesystem creation (then modification)
/// time. Name parsing is primary because creation time is not reliably
/// available on all filesystems.
fn creation_key(path: &Path) -> NaiveDateTime {
    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        if let Ok(ts) = NaiveDateTime::parse_from_str(name, FOLDER_FORMAT) {
            return ts;
        }
    }

    fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .map(|time| DateTime::<Local>::from(time).naive_local())
        .unwrap_or_default()
}
