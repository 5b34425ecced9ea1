//! rotatord - Main entry point
//!
//! Headless shell around the rotating backup engine: loads configuration,
//! runs the daily timer loop, and surfaces one notification per backup
//! run. `--once` and `--status` cover the on-demand trigger and the
//! status tooltip the tray shell would otherwise bind.

use anyhow::{Context, Result};
use backup_rotator::{config::Config, utils, BackupNotice, BackupOrchestrator};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod scheduler;
mod shutdown;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "rotatord.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Run a single backup and exit
    #[arg(long)]
    once: bool,

    /// Print the last-backup status line and exit
    #[arg(long)]
    status: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;
    let daily_time = config.schedule.time_of_day()?;

    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    let orchestrator = Arc::new(BackupOrchestrator::new(&config));

    if args.status {
        println!("{}", orchestrator.status_tooltip());
        return Ok(());
    }

    if args.once {
        let orch = orchestrator.clone();
        let result = tokio::task::spawn_blocking(move || orch.run_backup()).await?;
        return match result {
            Ok(stats) => {
                tracing::info!(
                    files = stats.files,
                    bytes = stats.bytes,
                    "Backup completed successfully"
                );
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("backup failed")),
        };
    }

    tracing::info!(
        "Starting rotatord v{} (source: {}, backup root: {})",
        env!("CARGO_PKG_VERSION"),
        config.backup.source_dir.display(),
        config.backup.backup_root.display()
    );

    // One user-facing line per run: the notification signal the tray
    // shell would turn into a toast.
    let mut notices = orchestrator.subscribe();
    tokio::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            match &notice {
                BackupNotice::Succeeded { .. } => tracing::info!("{}", notice.message()),
                BackupNotice::PruneFailed { .. } => tracing::warn!("{}", notice.message()),
                BackupNotice::CopyFailed { .. } => tracing::error!("{}", notice.message()),
            }
        }
    });

    let token = CancellationToken::new();
    let scheduler_handle = tokio::spawn(scheduler::run(
        orchestrator,
        daily_time,
        token.clone(),
    ));

    shutdown::wait_for_signal().await;
    token.cancel();
    let _ = scheduler_handle.await;

    Ok(())
}
