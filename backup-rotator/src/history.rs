//! Append-only backup history log.
//!
//! One `%d-%m-%y %H:%M:%S` line per completed backup, newest last. The
//! final non-empty line is the last-success timestamp.

use crate::utils::errors::LogError;
use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp format of history lines.
pub const LINE_FORMAT: &str = "%d-%m-%y %H:%M:%S";

/// Handle on the history file. The orchestrator is the sole writer;
/// readers are safe concurrently because the file is append-only.
#[derive(Debug, Clone)]
pub struct BackupLog {
    path: PathBuf,
}

impl BackupLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one completion timestamp, creating the file if absent.
    /// Never truncates or rewrites prior lines.
    pub fn record_success(&self, at: NaiveDateTime) -> Result<(), LogError> {
        let log_error = |source| LogError {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(log_error)?;
        writeln!(file, "{}", at.format(LINE_FORMAT)).map_err(log_error)?;
        Ok(())
    }

    /// Timestamp of the most recent completed backup.
    ///
    /// A missing file, an empty file, or an unparseable final line all
    /// read as "never backed up".
    pub fn last_success(&self) -> Option<NaiveDateTime> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let line = content.lines().rev().find(|line| !line.trim().is_empty())?;
        NaiveDateTime::parse_from_str(line.trim(), LINE_FORMAT).ok()
    }
}
