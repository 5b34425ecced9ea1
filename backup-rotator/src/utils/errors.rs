//! Error types for the backup engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while replicating the source tree into a backup folder.
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    File {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Failure while appending to the backup history log.
///
/// Log-and-continue: the orchestrator reports this but never fails a
/// completed backup over it.
#[derive(Error, Debug)]
#[error("failed to append to backup log {}: {source}", .path.display())]
pub struct LogError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Failure while pruning old backup folders. Aborts the current prune
/// pass; already-deleted folders stay deleted.
#[derive(Error, Debug)]
pub enum PruneError {
    #[error("failed to list backup root {}: {source}", .path.display())]
    List { path: PathBuf, source: io::Error },

    #[error("failed to delete old backup {}: {source}", .path.display())]
    Delete { path: PathBuf, source: io::Error },
}

/// Overall outcome of a backup run, tagged by the stage that failed.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("copy failed: {0}")]
    Copy(#[from] CopyError),

    #[error("prune failed after a successful copy: {0}")]
    Prune(#[from] PruneError),
}

/// The stage a [`BackupError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Copy,
    Prune,
}

impl BackupError {
    pub fn stage(&self) -> Stage {
        match self {
            BackupError::Copy(_) => Stage::Copy,
            BackupError::Prune(_) => Stage::Prune,
        }
    }
}
