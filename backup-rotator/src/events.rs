//! Per-run outcome notices consumed by the shell.
//!
//! Exactly one notice is broadcast for every backup run, distinguishing
//! full success, copy failure, and degraded success (prune failure).

use crate::copier::CopyStats;
use chrono::NaiveDateTime;

/// Outcome of one backup run.
#[derive(Debug, Clone)]
pub enum BackupNotice {
    /// Copy, record, and prune all succeeded.
    Succeeded { at: NaiveDateTime, stats: CopyStats },

    /// Copy failed; nothing was recorded or pruned.
    CopyFailed { message: String },

    /// The backup itself stands, but pruning old folders failed.
    PruneFailed { at: NaiveDateTime, message: String },
}

impl BackupNotice {
    /// User-facing notification text.
    pub fn message(&self) -> String {
        match self {
            BackupNotice::Succeeded { stats, .. } => format!(
                "Backup completed successfully ({} files, {} bytes).",
                stats.files, stats.bytes
            ),
            BackupNotice::CopyFailed { message } => format!("Backup failed: {message}"),
            BackupNotice::PruneFailed { message, .. } => {
                format!("Backup completed, but pruning old backups failed: {message}")
            }
        }
    }
}
