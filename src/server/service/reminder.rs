//! Expiry reminders and webhook event retention.

use chrono::{Duration, NaiveDateTime, Utc};
use entity::sea_orm_active_enums::ListingStatus;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        listing::ListingRepository, profile::ProfileRepository,
        stripe_event::StripeEventRepository,
    },
    error::Error,
    model::{app::SiteSettings, db::ListingModel},
    service::notification::{expiry_reminder, Notifier},
    util::time::reminder_window_end,
};

/// Days a processed webhook event is kept for duplicate detection.
pub const STRIPE_EVENT_RETENTION_DAYS: i64 = 30;

/// Finds listings nearing expiry and sends reminders.
pub struct ReminderService<'a> {
    db: &'a DatabaseConnection,
    settings: &'a SiteSettings,
}

impl<'a> ReminderService<'a> {
    /// Creates a new instance of [`ReminderService`]
    pub fn new(db: &'a DatabaseConnection, settings: &'a SiteSettings) -> Self {
        Self { db, settings }
    }

    fn window_end(&self, now: NaiveDateTime) -> NaiveDateTime {
        reminder_window_end(now, self.settings.reminder_days)
    }

    fn is_due(&self, listing: &ListingModel, now: NaiveDateTime) -> bool {
        listing.status == ListingStatus::Approved
            && listing.reminder_sent_at.is_none()
            && listing
                .visible_until
                .is_some_and(|until| until > now && until <= self.window_end(now))
    }

    /// IDs of approved listings whose visibility ends within the reminder window and
    /// whose owner has not been reminded.
    pub async fn due_listing_ids(&self) -> Result<Vec<i32>, Error> {
        let now = Utc::now().naive_utc();
        let listings = ListingRepository::new(self.db)
            .list_due_reminders(now, self.window_end(now))
            .await?;

        Ok(listings.into_iter().map(|listing| listing.id).collect())
    }

    /// Emails the owner of a listing about its upcoming expiry.
    ///
    /// Eligibility is checked again since the listing may have been renewed, deleted or
    /// reminded since the job was queued.
    ///
    /// # Returns
    /// - `Ok(true)` - Reminder sent and recorded
    /// - `Ok(false)` - Listing no longer needs a reminder
    /// - `Err(Error)` - Delivery or database failure, the job should be retried
    pub async fn send_reminder(
        &self,
        listing_id: i32,
        notifier: &Notifier<'_>,
    ) -> Result<bool, Error> {
        let now = Utc::now().naive_utc();
        let listing_repo = ListingRepository::new(self.db);

        let Some(listing) = listing_repo.find_by_id(listing_id).await? else {
            tracing::debug!(listing_id = %listing_id, "Skipping reminder for deleted listing");
            return Ok(false);
        };

        if !self.is_due(&listing, now) {
            tracing::debug!(listing_id = %listing_id, "Listing no longer due a reminder");
            return Ok(false);
        }

        let Some(owner) = ProfileRepository::new(self.db)
            .find_by_id(listing.owner_id)
            .await?
        else {
            tracing::warn!(listing_id = %listing_id, "Listing owner missing, skipping reminder");
            return Ok(false);
        };

        notifier
            .send(expiry_reminder(self.settings, &owner, &listing))
            .await?;

        listing_repo.mark_reminder_sent(listing, now).await?;

        tracing::info!(listing_id = %listing_id, "Sent expiry reminder");

        Ok(true)
    }

    /// Deletes webhook events older than the retention window.
    pub async fn purge_stripe_events(&self) -> Result<u64, Error> {
        let cutoff = Utc::now().naive_utc() - Duration::days(STRIPE_EVENT_RETENTION_DAYS);
        let removed = StripeEventRepository::new(self.db)
            .delete_processed_before(cutoff)
            .await?;

        if removed > 0 {
            tracing::info!("Purged {} processed webhook events", removed);
        }

        Ok(removed)
    }
}
