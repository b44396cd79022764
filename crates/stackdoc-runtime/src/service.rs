use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use stackdoc_gateway::HostConfig;
use tracing::{error, info};

use crate::orchestrator::{HostOrchestrator, RunSummary};
use crate::schedule::DailySchedule;

/// Runs one pass over every host on a blocking worker thread.
pub async fn run_pass(
    orchestrator: Arc<HostOrchestrator>,
    hosts: Arc<Vec<HostConfig>>,
) -> Result<RunSummary> {
    tokio::task::spawn_blocking(move || orchestrator.run_all_hosts(&hosts))
        .await
        .context("documentation pass worker failed")
}

/// Runs a pass now, then once per scheduled trigger until Ctrl-C.
///
/// Each pass completes before the next trigger is computed, so passes never overlap.
pub async fn run_service(
    orchestrator: Arc<HostOrchestrator>,
    hosts: Arc<Vec<HostConfig>>,
    schedule: DailySchedule,
) -> Result<()> {
    run_service_until(orchestrator, hosts, schedule, tokio::signal::ctrl_c()).await
}

/// Like [`run_service`], but stops as soon as `shutdown` resolves, including
/// while a pass is still running.
pub async fn run_service_until<F>(
    orchestrator: Arc<HostOrchestrator>,
    hosts: Arc<Vec<HostConfig>>,
    schedule: DailySchedule,
    shutdown: F,
) -> Result<()>
where
    F: Future,
{
    info!(
        schedule = %schedule.cron_expression(),
        timezone = %schedule.timezone(),
        "documentation service started"
    );
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("documentation service shutdown requested during pass");
                return Ok(());
            }
            outcome = run_pass(Arc::clone(&orchestrator), Arc::clone(&hosts)) => {
                if let Err(error) = outcome {
                    error!(error = ?error, "documentation pass aborted; waiting for next trigger");
                }
            }
        }

        let now = Utc::now();
        let next = schedule.next_after(now)?;
        let wait = (next.with_timezone(&Utc) - now)
            .to_std()
            .unwrap_or(Duration::ZERO);
        info!(next_run = %next, wait_secs = wait.as_secs(), "next documentation pass scheduled");

        tokio::select! {
            _ = &mut shutdown => {
                info!("documentation service shutdown requested");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {}
        }
    }
}
