//! Recursive source-tree replication into a backup folder.
//!
//! Merge semantics: same-named destination entries are overwritten,
//! destination entries without a source counterpart are left alone.

use crate::utils::errors::CopyError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Totals for one completed copy pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyStats {
    /// Files copied
    pub files: usize,

    /// Bytes copied
    pub bytes: u64,
}

/// Replicate `source` into `dest`, creating `dest` (and parents) if absent.
///
/// Every file reachable from `source` ends up byte-identical at the same
/// relative path under `dest`, with its modification time carried over.
/// Partial results are left in place on error; the caller treats any
/// failure as a failed backup.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<CopyStats, CopyError> {
    if !source.is_dir() {
        return Err(CopyError::SourceMissing(source.to_path_buf()));
    }

    fs::create_dir_all(dest).map_err(|e| CopyError::Create {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(source).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|e| walk_error(source, e))?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| CopyError::Create {
                path: target.clone(),
                source: e,
            })?;
        } else {
            stats.bytes += copy_file(entry.path(), &target)?;
            stats.files += 1;
        }
    }

    debug!(files = stats.files, bytes = stats.bytes, "Copy pass complete");
    Ok(stats)
}

/// Copy one file, overwriting `target`, and carry the source mtime over.
fn copy_file(from: &Path, to: &Path) -> Result<u64, CopyError> {
    let file_error = |source: io::Error| CopyError::File {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let bytes = fs::copy(from, to).map_err(file_error)?;

    let modified = fs::metadata(from)
        .and_then(|m| m.modified())
        .map_err(|e| CopyError::Read {
            path: from.to_path_buf(),
            source: e,
        })?;
    fs::OpenOptions::new()
        .write(true)
        .open(to)
        .and_then(|f| f.set_modified(modified))
        .map_err(file_error)?;

    Ok(bytes)
}

fn walk_error(root: &Path, error: walkdir::Error) -> CopyError {
    let path = error.path().unwrap_or(root).to_path_buf();
    let source = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop detected"));
    CopyError::Read { path, source }
}
