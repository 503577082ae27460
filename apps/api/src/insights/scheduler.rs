//! Weekly insight refresh using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (INSIGHT_REFRESH_CRON, default Sunday 00:00)
//!     │
//!     └─► InsightService::refresh_all()
//!             └─► For each industry → generate → update (skip on failure)
//! ```

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::insights::service::InsightService;

/// Starts the refresh job. The returned scheduler must be kept alive.
pub async fn start_scheduler(service: Arc<InsightService>, cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let refresh_job = Job::new_async(cron, move |_uuid, _lock| {
        let service = service.clone();
        Box::pin(async move {
            run_scheduled_refresh(&service).await;
        })
    })?;

    scheduler.add(refresh_job).await?;
    scheduler.start().await?;

    info!("Scheduled insight refresh started (cron: {cron})");
    Ok(scheduler)
}

async fn run_scheduled_refresh(service: &InsightService) {
    info!("Running scheduled insight refresh");

    match service.refresh_all().await {
        Ok(report) => {
            for skipped in &report.skipped {
                warn!(
                    "Industry '{}' was not refreshed ({}): {}",
                    skipped.industry,
                    skipped.stage,
                    skipped.reason
                );
            }
            info!(
                "Scheduled insight refresh complete: {} refreshed, {} skipped",
                report.refreshed.len(),
                report.skipped.len()
            );
        }
        Err(e) => error!("Scheduled insight refresh failed: {}", e),
    }
}
