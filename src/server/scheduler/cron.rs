//! Cron scheduler startup.

use std::sync::Arc;

use apalis_redis::RedisStorage;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::Error,
    model::{app::SiteSettings, worker::WorkerJob},
    scheduler::{
        config::{reminder as reminder_config, stripe_event as stripe_event_config},
        reminder::schedule_expiry_reminders,
    },
    service::reminder::ReminderService,
};

/// Initialize and start the cron job scheduler
///
/// Registers the daily expiry reminder job, which queues worker jobs, and the daily purge
/// of processed webhook events, which runs inline.
pub async fn start_scheduler(
    db: &DatabaseConnection,
    settings: Arc<SiteSettings>,
    job_storage: &RedisStorage<WorkerJob>,
) -> Result<JobScheduler, Error> {
    let sched = JobScheduler::new().await?;

    let db_clone = db.clone();
    let settings_clone = settings.clone();
    let storage_clone = job_storage.clone();

    sched
        .add(Job::new_async(
            reminder_config::CRON_EXPRESSION,
            move |_, _| {
                let db = db_clone.clone();
                let settings = settings_clone.clone();
                let mut job_storage = storage_clone.clone();

                Box::pin(async move {
                    match schedule_expiry_reminders(&db, &settings, &mut job_storage).await {
                        Ok(count) => tracing::info!("Scheduled {} expiry reminder(s)", count),
                        Err(e) => tracing::error!("Error scheduling expiry reminders: {:?}", e),
                    }
                })
            },
        )?)
        .await?;

    let db_clone = db.clone();

    sched
        .add(Job::new_async(
            stripe_event_config::CRON_EXPRESSION,
            move |_, _| {
                let db = db_clone.clone();
                let settings = settings.clone();

                Box::pin(async move {
                    match ReminderService::new(&db, &settings)
                        .purge_stripe_events()
                        .await
                    {
                        Ok(count) => tracing::debug!("Purged {} webhook event record(s)", count),
                        Err(e) => tracing::error!("Error purging webhook event records: {:?}", e),
                    }
                })
            },
        )?)
        .await?;

    sched.start().await?;

    Ok(sched)
}
