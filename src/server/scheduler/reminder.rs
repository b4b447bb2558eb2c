//! Queues expiry reminder jobs.

use apalis_redis::RedisStorage;
use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error, model::app::SiteSettings, model::worker::WorkerJob,
    service::reminder::ReminderService,
};

/// Queues a reminder job for every listing whose visibility ends within the reminder window.
///
/// The worker checks eligibility again, so a listing queued twice is only reminded once.
///
/// # Returns
/// - `Ok(usize)` - Number of reminder jobs queued
/// - `Err(Error)` - Database query or queue push failed
pub async fn schedule_expiry_reminders(
    db: &DatabaseConnection,
    settings: &SiteSettings,
    job_storage: &mut RedisStorage<WorkerJob>,
) -> Result<usize, Error> {
    use apalis::prelude::Storage;

    let listing_ids = ReminderService::new(db, settings).due_listing_ids().await?;

    for listing_id in &listing_ids {
        job_storage
            .push(WorkerJob::SendExpiryReminder {
                listing_id: *listing_id,
            })
            .await?;
    }

    Ok(listing_ids.len())
}
