//! Background job processing.
//!
//! Jobs are pulled from the apalis Redis storage and dispatched to services. A handler error
//! is returned to apalis so the job can be retried.

use std::sync::Arc;

use apalis::prelude::Data;
use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    model::{app::SiteSettings, worker::WorkerJob},
    provider::email::Mailer,
    service::{notification::Notifier, reminder::ReminderService},
};

/// Runs a single queued job.
pub async fn handle_job(
    job: WorkerJob,
    db: Data<DatabaseConnection>,
    mailer: Data<Mailer>,
    settings: Data<Arc<SiteSettings>>,
) -> Result<(), Error> {
    match job {
        WorkerJob::SendExpiryReminder { listing_id } => {
            tracing::debug!("Processing expiry reminder for listing ID {}", listing_id);

            let notifier = Notifier::new(&mailer, &settings);

            let sent = ReminderService::new(&db, &settings)
                .send_reminder(listing_id, &notifier)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to send expiry reminder for listing ID {}: {:?}",
                        listing_id,
                        e
                    );
                    e
                })?;

            if !sent {
                tracing::debug!("No expiry reminder needed for listing ID {}", listing_id);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apalis::prelude::Data;
    use chrono::{Duration, Utc};
    use entity::sea_orm_active_enums::ListingStatus;
    use linkdex_test_utils::prelude::*;
    use sea_orm::ActiveValue;

    use crate::server::{
        data::listing::ListingRepository, model::worker::WorkerJob, util::test::TestContextExt,
        worker::handle_job,
    };

    /// Expect the reminder job to email the owner and record the reminder
    #[tokio::test]
    async fn handles_expiry_reminder() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_tables().build().await?;
        let owner = test.user().insert_profile("owner@example.org").await?;
        let mut listing = listing_factory::mock_listing(owner.id, "Soon");
        listing.status = ActiveValue::Set(ListingStatus::Approved);
        listing.visible_until = ActiveValue::Set(Some(Utc::now().naive_utc() + Duration::days(1)));
        let listing = test.listing().insert_listing_model(listing).await?;
        let mock = test.mail().create_email_endpoint(1);
        let state = test.app_state();

        handle_job(
            WorkerJob::SendExpiryReminder {
                listing_id: listing.id,
            },
            Data::new(test.db.clone()),
            Data::new(state.mailer.clone()),
            Data::new(Arc::clone(&state.settings)),
        )
        .await
        .unwrap();

        mock.assert();
        let listing = ListingRepository::new(&test.db)
            .find_by_id(listing.id)
            .await?
            .unwrap();
        assert!(listing.reminder_sent_at.is_some());

        Ok(())
    }
}
