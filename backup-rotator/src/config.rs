//! Configuration for the backup engine and daemon.
//!
//! Loaded from a TOML file; optional fields fall back to defaults.

use anyhow::Context;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backup: BackupConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Directory tree to back up
    pub source_dir: PathBuf,

    /// Directory under which timestamped backup folders are created
    pub backup_root: PathBuf,

    /// Number of backup folders to retain
    #[serde(default = "default_max_folders")]
    pub max_folders: usize,

    /// Backup history file (default: backup_log.txt beside the executable)
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Daily backup time, HH:MM
    #[serde(default = "default_daily_time")]
    pub daily_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_time: default_daily_time(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_max_folders() -> usize {
    15
}

fn default_daily_time() -> String {
    "12:00".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        config.schedule.time_of_day()?;
        Ok(config)
    }

    /// Resolved path of the backup history file.
    ///
    /// Falls back to a `backup_log.txt` beside the executable, then to the
    /// working directory when the executable path is unavailable.
    pub fn history_path(&self) -> PathBuf {
        match &self.backup.history_file {
            Some(path) => path.clone(),
            None => std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(|dir| dir.join("backup_log.txt")))
                .unwrap_or_else(|| PathBuf::from("backup_log.txt")),
        }
    }
}

impl ScheduleConfig {
    /// Parse the configured HH:MM daily backup time.
    pub fn time_of_day(&self) -> anyhow::Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.daily_time, "%H:%M")
            .with_context(|| format!("invalid daily_time {:?} (expected HH:MM)", self.daily_time))
    }
}
