//! Daily timer loop driving the orchestrator.
//!
//! On start, fires an immediate catch-up run if today's scheduled slot
//! already passed without a completed backup; then sleeps until each next
//! daily occurrence. Runs execute on the blocking pool; a failed run is
//! logged and the next occurrence is the retry.

use backup_rotator::{schedule, BackupOrchestrator};
use chrono::{Local, NaiveTime};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub async fn run(
    orchestrator: Arc<BackupOrchestrator>,
    daily_time: NaiveTime,
    shutdown: CancellationToken,
) {
    let now = Local::now().naive_local();
    if schedule::is_catch_up_due(now, orchestrator.last_success(), daily_time) {
        info!("Catch-up backup due, running immediately");
        run_once(orchestrator.clone()).await;
    }

    loop {
        let now = Local::now().naive_local();
        let next = schedule::next_occurrence(now, daily_time);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        info!(at = %next, "Next scheduled backup");

        tokio::select! {
            _ = tokio::time::sleep(wait) => run_once(orchestrator.clone()).await,
            _ = shutdown.cancelled() => {
                info!("Scheduler stopped");
                return;
            }
        }
    }
}

async fn run_once(orchestrator: Arc<BackupOrchestrator>) {
    let result = tokio::task::spawn_blocking(move || orchestrator.run_backup()).await;
    match result {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => error!(error = %e, "Scheduled backup failed"),
        Err(e) => error!(error = %e, "Backup task panicked"),
    }
}
