//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring availability refresh.

use std::sync::Arc;

use phonecat_scraper::Storefront;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    storefront: Arc<Storefront>,
    availability_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_availability_job(&scheduler, storefront, availability_cron).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the periodic availability refresh.
///
/// The cache serializes refreshes itself, so a tick that lands while a
/// manual or startup refresh is running simply waits for it.
async fn register_availability_job(
    scheduler: &JobScheduler,
    storefront: Arc<Storefront>,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let storefront = Arc::clone(&storefront);
        Box::pin(async move {
            tracing::info!("scheduler: starting availability refresh");
            run_availability_refresh(&storefront).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: availability refresh registered");
    Ok(())
}

/// Kicks off one refresh in the background so the first `/locales` request
/// usually finds a populated cache.
pub fn spawn_initial_refresh(storefront: Arc<Storefront>) {
    tokio::spawn(async move {
        tracing::info!("scheduler: initial availability refresh");
        run_availability_refresh(&storefront).await;
    });
}

async fn run_availability_refresh(storefront: &Storefront) {
    match storefront.refresh_availability().await {
        Ok(snapshot) => tracing::info!(
            locales = snapshot.locale_count,
            disabled = snapshot.disabled.len(),
            "scheduler: availability refresh complete"
        ),
        Err(e) => tracing::error!(
            kind = e.kind(),
            error = %e,
            "scheduler: availability refresh failed, keeping previous snapshot"
        ),
    }
}
