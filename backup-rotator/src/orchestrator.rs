//! Backup run orchestration: copy, record, prune, notify.
//!
//! Runs are serialized through an internal lock so the daily timer and an
//! on-demand trigger can never interleave copy/record/prune across two
//! invocations. Status reads stay off that lock; they only touch the
//! append-only history file.

use crate::config::Config;
use crate::copier::{self, CopyStats};
use crate::events::BackupNotice;
use crate::history::{self, BackupLog};
use crate::retention;
use crate::utils::errors::BackupError;
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{info, warn};

pub struct BackupOrchestrator {
    source_dir: PathBuf,
    backup_root: PathBuf,
    max_folders: usize,
    log: BackupLog,
    run_lock: Mutex<()>,
    notices: broadcast::Sender<BackupNotice>,
}

impl BackupOrchestrator {
    pub fn new(config: &Config) -> Self {
        let (notices, _) = broadcast::channel(16);
        Self {
            source_dir: config.backup.source_dir.clone(),
            backup_root: config.backup.backup_root.clone(),
            max_folders: config.backup.max_folders,
            log: BackupLog::new(config.history_path()),
            run_lock: Mutex::new(()),
            notices,
        }
    }

    /// Subscribe to per-run outcome notices.
    pub fn subscribe(&self) -> broadcast::Receiver<BackupNotice> {
        self.notices.subscribe()
    }

    /// Run one backup now.
    pub fn run_backup(&self) -> Result<CopyStats, BackupError> {
        self.run_backup_at(Local::now().naive_local())
    }

    /// Run one backup stamped with `now`; the timestamp names the backup
    /// folder and the history line.
    pub fn run_backup_at(&self, now: NaiveDateTime) -> Result<CopyStats, BackupError> {
        let _guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dest = self
            .backup_root
            .join(now.format(retention::FOLDER_FORMAT).to_string());

        let stats = match copier::copy_tree(&self.source_dir, &dest) {
            Ok(stats) => stats,
            Err(e) => {
                self.notify(BackupNotice::CopyFailed {
                    message: e.to_string(),
                });
                return Err(BackupError::Copy(e));
            }
        };
        info!(
            source = %self.source_dir.display(),
            dest = %dest.display(),
            files = stats.files,
            bytes = stats.bytes,
            "Backup copy completed"
        );

        // A lost history line never fails a completed backup; it only
        // degrades catch-up accuracy.
        if let Err(e) = self.log.record_success(now) {
            warn!(error = %e, "Failed to record backup completion");
        }

        if let Err(e) = retention::prune(&self.backup_root, self.max_folders) {
            self.notify(BackupNotice::PruneFailed {
                at: now,
                message: e.to_string(),
            });
            return Err(BackupError::Prune(e));
        }

        self.notify(BackupNotice::Succeeded { at: now, stats });
        Ok(stats)
    }

    /// Most recent completed backup, read from the history log.
    pub fn last_success(&self) -> Option<NaiveDateTime> {
        self.log.last_success()
    }

    /// Status line for the shell.
    pub fn status_tooltip(&self) -> String {
        match self.log.last_success() {
            Some(at) => format!("Last backup: {}", at.format(history::LINE_FORMAT)),
            None => "No backup completed yet".to_string(),
        }
    }

    fn notify(&self, notice: BackupNotice) {
        // No subscribers is fine; the notice still has a log trail
        let _ = self.notices.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackupConfig, Config};
    use chrono::NaiveDate;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn ts(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn orchestrator(root: &Path, max_folders: usize) -> BackupOrchestrator {
        let config = Config {
            backup: BackupConfig {
                source_dir: root.join("source"),
                backup_root: root.join("backups"),
                max_folders,
                history_file: Some(root.join("backup_log.txt")),
            },
            schedule: Default::default(),
            log: Default::default(),
        };
        BackupOrchestrator::new(&config)
    }

    #[test]
    fn test_three_runs_rotate_to_two_folders() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(source.join("nested")).unwrap();
        fs::write(source.join("a.txt"), b"alpha").unwrap();
        fs::write(source.join("nested/b.txt"), b"beta").unwrap();

        let orch = orchestrator(temp.path(), 2);
        orch.run_backup_at(ts(1, 12, 0, 0)).unwrap();
        orch.run_backup_at(ts(2, 12, 0, 0)).unwrap();
        orch.run_backup_at(ts(3, 12, 0, 0)).unwrap();

        let backups = temp.path().join("backups");
        assert!(!backups.join("01-08-26_12-00-00").exists());
        for kept in ["02-08-26_12-00-00", "03-08-26_12-00-00"] {
            assert_eq!(fs::read(backups.join(kept).join("a.txt")).unwrap(), b"alpha");
            assert_eq!(
                fs::read(backups.join(kept).join("nested/b.txt")).unwrap(),
                b"beta"
            );
        }

        let history = fs::read_to_string(temp.path().join("backup_log.txt")).unwrap();
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(
            lines,
            vec!["01-08-26 12:00:00", "02-08-26 12:00:00", "03-08-26 12:00:00"]
        );

        assert_eq!(orch.last_success(), Some(ts(3, 12, 0, 0)));
    }

    #[test]
    fn test_missing_source_fails_at_copy_stage() {
        let temp = TempDir::new().unwrap();
        let orch = orchestrator(temp.path(), 2);

        let err = orch.run_backup_at(ts(1, 12, 0, 0)).unwrap_err();

        assert_eq!(err.stage(), crate::utils::errors::Stage::Copy);
        // No folder was created and no history line was written
        assert!(!temp.path().join("backups").exists());
        assert!(!temp.path().join("backup_log.txt").exists());
        assert_eq!(orch.status_tooltip(), "No backup completed yet");
    }

    #[test]
    fn test_exactly_one_notice_per_run() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), b"alpha").unwrap();

        let orch = orchestrator(temp.path(), 2);
        let mut notices = orch.subscribe();

        orch.run_backup_at(ts(1, 12, 0, 0)).unwrap();
        assert!(matches!(
            notices.try_recv().unwrap(),
            BackupNotice::Succeeded { .. }
        ));
        assert!(notices.try_recv().is_err());

        fs::remove_dir_all(&source).unwrap();
        orch.run_backup_at(ts(2, 12, 0, 0)).unwrap_err();
        let notice = notices.try_recv().unwrap();
        assert!(matches!(notice, BackupNotice::CopyFailed { .. }));
        assert!(notice.message().starts_with("Backup failed:"));
        assert!(notices.try_recv().is_err());
    }

    #[test]
    fn test_status_tooltip_formats_last_success() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(&source).unwrap();

        let orch = orchestrator(temp.path(), 2);
        orch.run_backup_at(ts(6, 14, 30, 5)).unwrap();

        assert_eq!(orch.status_tooltip(), "Last backup: 06-08-26 14:30:05");
    }
}
