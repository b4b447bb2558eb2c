//! Approval and rejection of submitted listings.

use chrono::Utc;
use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::{PageDto, PageParams},
        listing::ManagedListingDto,
    },
    server::{
        data::{listing::ListingRepository, profile::ProfileRepository},
        error::{listing::ListingError, Error},
        model::{app::SiteSettings, db::ListingModel},
        service::{
            listing::{category_slugs, to_managed_listing_dto},
            notification::Notifier,
        },
        util::time::free_visible_until,
    },
};

/// Maximum rejection reason length in characters.
pub const REJECTION_REASON_MAX_CHARS: usize = 500;

fn status_name(status: ListingStatus) -> &'static str {
    match status {
        ListingStatus::Pending => "pending",
        ListingStatus::Approved => "approved",
        ListingStatus::Rejected => "rejected",
    }
}

/// Admin review of submitted listings.
pub struct ModerationService<'a> {
    db: &'a DatabaseConnection,
    settings: &'a SiteSettings,
}

impl<'a> ModerationService<'a> {
    /// Creates a new instance of [`ModerationService`]
    pub fn new(db: &'a DatabaseConnection, settings: &'a SiteSettings) -> Self {
        Self { db, settings }
    }

    /// Page of listings in `status`, oldest first.
    pub async fn list_by_status(
        &self,
        status: ListingStatus,
        params: &PageParams,
    ) -> Result<PageDto<ManagedListingDto>, Error> {
        let page_index = params.page_index();
        let per_page = params.per_page();

        let (listings, total) = ListingRepository::new(self.db)
            .list_by_status(status, page_index, per_page)
            .await?;
        let slugs = category_slugs(self.db).await?;

        Ok(
            PageDto::new(listings, page_index, per_page, total).map(|listing| {
                let category = listing.category_id.and_then(|id| slugs.get(&id).cloned());
                to_managed_listing_dto(listing, category)
            }),
        )
    }

    /// Approves a pending or rejected listing and emails its owner.
    ///
    /// Free listings are visible for the configured number of free days, or indefinitely
    /// when none is configured. Paid listings keep the visibility set by billing.
    ///
    /// # Returns
    /// - `Ok(ManagedListingDto)` - Approved listing
    /// - `Err(Error::ListingError(ListingError::NotFound))` - Listing does not exist
    /// - `Err(Error::ListingError(ListingError::InvalidTransition))` - Listing already approved
    pub async fn approve(
        &self,
        listing_id: i32,
        notifier: &Notifier<'_>,
    ) -> Result<ManagedListingDto, Error> {
        let listing = self.find(listing_id).await?;

        if listing.status == ListingStatus::Approved {
            return Err(ListingError::InvalidTransition {
                action: "approve",
                status: status_name(listing.status),
            }
            .into());
        }

        let now = Utc::now();
        let visible_until = match listing.plan {
            ListingPlan::Free => free_visible_until(now, self.settings.free_listing_days),
            ListingPlan::Pro | ListingPlan::Sponsor => listing.visible_until,
        };

        let listing = ListingRepository::new(self.db)
            .approve(listing, now.naive_utc(), visible_until)
            .await?;

        tracing::info!(listing_id = %listing.id, "Approved listing");

        match ProfileRepository::new(self.db)
            .find_by_id(listing.owner_id)
            .await?
        {
            Some(owner) => notifier.listing_approved(&owner, &listing).await,
            None => tracing::warn!(listing_id = %listing.id, "Approved listing has no owner"),
        }

        self.to_dto(listing).await
    }

    /// Rejects a pending or approved listing with a reason shown to its owner.
    ///
    /// # Returns
    /// - `Ok(ManagedListingDto)` - Rejected listing
    /// - `Err(Error::ListingError(ListingError::Validation))` - Reason empty or too long
    /// - `Err(Error::ListingError(ListingError::NotFound))` - Listing does not exist
    /// - `Err(Error::ListingError(ListingError::InvalidTransition))` - Listing already rejected
    pub async fn reject(
        &self,
        listing_id: i32,
        reason: &str,
        notifier: &Notifier<'_>,
    ) -> Result<ManagedListingDto, Error> {
        let reason = reason.trim();
        let reason_chars = reason.chars().count();
        if reason_chars == 0 || reason_chars > REJECTION_REASON_MAX_CHARS {
            return Err(ListingError::Validation(format!(
                "Rejection reason must be between 1 and {} characters",
                REJECTION_REASON_MAX_CHARS
            ))
            .into());
        }

        let listing = self.find(listing_id).await?;

        if listing.status == ListingStatus::Rejected {
            return Err(ListingError::InvalidTransition {
                action: "reject",
                status: status_name(listing.status),
            }
            .into());
        }

        let listing = ListingRepository::new(self.db)
            .reject(listing, reason)
            .await?;

        tracing::info!(listing_id = %listing.id, "Rejected listing");

        if let Some(owner) = ProfileRepository::new(self.db)
            .find_by_id(listing.owner_id)
            .await?
        {
            notifier.listing_rejected(&owner, &listing).await;
        }

        self.to_dto(listing).await
    }

    async fn find(&self, listing_id: i32) -> Result<ListingModel, Error> {
        Ok(ListingRepository::new(self.db)
            .find_by_id(listing_id)
            .await?
            .ok_or(ListingError::NotFound)?)
    }

    async fn to_dto(&self, listing: ListingModel) -> Result<ManagedListingDto, Error> {
        let slugs = category_slugs(self.db).await?;
        let category = listing.category_id.and_then(|id| slugs.get(&id).cloned());

        Ok(to_managed_listing_dto(listing, category))
    }
}

#[cfg(test)]
mod tests {
    mod list_by_status {
        use entity::sea_orm_active_enums::ListingStatus;
        use linkdex_test_utils::prelude::*;

        use crate::{
            model::api::PageParams,
            server::{service::moderation::ModerationService, util::test::TestContextExt},
        };

        /// Expect only listings in the requested status, oldest first
        #[tokio::test]
        async fn lists_pending_oldest_first() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let first = test
                .listing()
                .insert_listing(owner.id, "First", ListingStatus::Pending)
                .await?;
            test.listing()
                .insert_listing(owner.id, "Second", ListingStatus::Pending)
                .await?;
            test.listing().insert_approved_listing(owner.id, "Live").await?;
            let state = test.app_state();

            let page = ModerationService::new(&test.db, &state.settings)
                .list_by_status(
                    ListingStatus::Pending,
                    &PageParams {
                        page: None,
                        per_page: None,
                    },
                )
                .await
                .unwrap();

            assert_eq!(page.total, 2);
            assert_eq!(page.items[0].id, first.id);

            Ok(())
        }
    }

    mod approve {
        use chrono::{DateTime, Duration, Utc};
        use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};
        use linkdex_test_utils::prelude::*;
        use sea_orm::ActiveValue;

        use crate::{
            model::listing::ListingStatusDto,
            server::{
                config::MAX_FREE_LISTING_DAYS,
                error::{listing::ListingError, Error},
                service::{moderation::ModerationService, notification::Notifier},
                util::test::TestContextExt,
            },
        };

        /// Expect an approved listing with no expiry when free days are unset
        #[tokio::test]
        async fn approves_pending_listing() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_tables()
                .with_email_endpoint(1)
                .build()
                .await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test
                .listing()
                .insert_listing(owner.id, "Fresh", ListingStatus::Pending)
                .await?;
            let state = test.app_state();
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let approved = ModerationService::new(&test.db, &state.settings)
                .approve(listing.id, &notifier)
                .await
                .unwrap();

            assert_eq!(approved.status, ListingStatusDto::Approved);
            assert!(approved.approved_at.is_some());
            assert_eq!(approved.visible_until, None);
            test.assert_mocks();

            Ok(())
        }

        /// Expect free listings to expire after the configured free days
        #[tokio::test]
        async fn sets_free_visibility_window() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_tables()
                .with_email_endpoint(1)
                .build()
                .await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test
                .listing()
                .insert_listing(owner.id, "Rejected", ListingStatus::Rejected)
                .await?;
            let state = test.app_state_with(|config| config.free_listing_days = Some(30));
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let approved = ModerationService::new(&test.db, &state.settings)
                .approve(listing.id, &notifier)
                .await
                .unwrap();

            let visible_until = approved.visible_until.unwrap();
            let expected = (Utc::now() + Duration::days(30)).naive_utc();
            assert!((expected - visible_until).num_seconds().abs() < 60);
            assert_eq!(approved.rejection_reason, None);

            Ok(())
        }

        /// Expect an oversized free day count to be capped instead of overflowing
        #[tokio::test]
        async fn caps_oversized_free_days() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_tables()
                .with_email_endpoint(1)
                .build()
                .await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test
                .listing()
                .insert_listing(owner.id, "Forever", ListingStatus::Pending)
                .await?;
            let state = test.app_state_with(|config| config.free_listing_days = Some(200_000_000));
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let approved = ModerationService::new(&test.db, &state.settings)
                .approve(listing.id, &notifier)
                .await
                .unwrap();

            let visible_until = approved.visible_until.unwrap();
            let expected = (Utc::now() + Duration::days(MAX_FREE_LISTING_DAYS)).naive_utc();
            assert!((expected - visible_until).num_seconds().abs() < 60);

            Ok(())
        }

        /// Expect paid listings to keep their billing-derived visibility
        #[tokio::test]
        async fn keeps_paid_visibility() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_tables()
                .with_email_endpoint(1)
                .build()
                .await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let period_end =
                DateTime::from_timestamp((Utc::now() + Duration::days(12)).timestamp(), 0)
                    .unwrap()
                    .naive_utc();
            let mut paid = listing_factory::mock_listing(owner.id, "Paid");
            paid.plan = ActiveValue::Set(ListingPlan::Pro);
            paid.visible_until = ActiveValue::Set(Some(period_end));
            let listing = test.listing().insert_listing_model(paid).await?;
            let state = test.app_state_with(|config| config.free_listing_days = Some(30));
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let approved = ModerationService::new(&test.db, &state.settings)
                .approve(listing.id, &notifier)
                .await
                .unwrap();

            assert_eq!(approved.visible_until, Some(period_end));

            Ok(())
        }

        /// Expect InvalidTransition for an already approved listing
        #[tokio::test]
        async fn rejects_approved_listing() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test.listing().insert_approved_listing(owner.id, "Live").await?;
            let state = test.app_state();
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let result = ModerationService::new(&test.db, &state.settings)
                .approve(listing.id, &notifier)
                .await;

            assert!(matches!(
                result,
                Err(Error::ListingError(ListingError::InvalidTransition { .. }))
            ));

            Ok(())
        }

        /// Expect NotFound for a missing listing
        #[tokio::test]
        async fn fails_for_missing_listing() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let state = test.app_state();
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let result = ModerationService::new(&test.db, &state.settings)
                .approve(99, &notifier)
                .await;

            assert!(matches!(
                result,
                Err(Error::ListingError(ListingError::NotFound))
            ));

            Ok(())
        }
    }

    mod reject {
        use entity::sea_orm_active_enums::ListingStatus;
        use linkdex_test_utils::prelude::*;

        use crate::{
            model::listing::ListingStatusDto,
            server::{
                error::{listing::ListingError, Error},
                service::{moderation::ModerationService, notification::Notifier},
                util::test::TestContextExt,
            },
        };

        /// Expect a rejected listing carrying the reason and an email to the owner
        #[tokio::test]
        async fn rejects_approved_listing() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test.listing().insert_approved_listing(owner.id, "Live").await?;
            let email_endpoint = test.mail().create_email_endpoint_to("owner@example.org", 1);
            let state = test.app_state();
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let rejected = ModerationService::new(&test.db, &state.settings)
                .reject(listing.id, "  Broken link  ", &notifier)
                .await
                .unwrap();

            assert_eq!(rejected.status, ListingStatusDto::Rejected);
            assert_eq!(rejected.rejection_reason.as_deref(), Some("Broken link"));
            email_endpoint.assert();

            Ok(())
        }

        /// Expect Validation for an empty or overlong reason
        #[tokio::test]
        async fn validates_reason() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test
                .listing()
                .insert_listing(owner.id, "Fresh", ListingStatus::Pending)
                .await?;
            let state = test.app_state();
            let notifier = Notifier::new(&state.mailer, &state.settings);
            let service = ModerationService::new(&test.db, &state.settings);

            for reason in ["   ".to_string(), "x".repeat(501)] {
                let result = service.reject(listing.id, &reason, &notifier).await;

                assert!(matches!(
                    result,
                    Err(Error::ListingError(ListingError::Validation(_)))
                ));
            }

            Ok(())
        }

        /// Expect InvalidTransition for an already rejected listing
        #[tokio::test]
        async fn fails_for_rejected_listing() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test
                .listing()
                .insert_listing(owner.id, "Gone", ListingStatus::Rejected)
                .await?;
            let state = test.app_state();
            let notifier = Notifier::new(&state.mailer, &state.settings);

            let result = ModerationService::new(&test.db, &state.settings)
                .reject(listing.id, "Spam", &notifier)
                .await;

            assert!(matches!(
                result,
                Err(Error::ListingError(ListingError::InvalidTransition { .. }))
            ));

            Ok(())
        }
    }
}
