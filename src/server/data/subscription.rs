//! Local mirror of payment subscriptions.

use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::ListingPlan;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

/// Local state of a vendor subscription.
pub struct SubscriptionRecord {
    /// Subscription ID at the payment provider
    pub stripe_subscription_id: String,
    /// Customer ID at the payment provider
    pub stripe_customer_id: String,
    /// Paying profile
    pub profile_id: i32,
    /// Upgraded listing
    pub listing_id: Option<i32>,
    /// Subscribed price
    pub price_id: String,
    /// Plan the price maps to
    pub plan: ListingPlan,
    /// Status reported by the payment provider
    pub status: String,
    /// End of the current billing period
    pub current_period_end: NaiveDateTime,
    /// Whether the subscription ends with the current period
    pub cancel_at_period_end: bool,
}

/// Persistence for subscriptions.
pub struct SubscriptionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SubscriptionRepository<'a, C> {
    /// Creates a new instance of [`SubscriptionRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Subscription by payment provider ID.
    pub async fn find_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<entity::subscription::Model>, DbErr> {
        entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::StripeSubscriptionId.eq(stripe_subscription_id))
            .one(self.db)
            .await
    }

    /// Inserts the subscription or updates the existing row with the same vendor ID.
    pub async fn upsert(
        &self,
        record: SubscriptionRecord,
    ) -> Result<entity::subscription::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let existing = self
            .find_by_stripe_id(&record.stripe_subscription_id)
            .await?;

        let mut subscription_am = entity::subscription::ActiveModel {
            stripe_subscription_id: ActiveValue::Set(record.stripe_subscription_id),
            stripe_customer_id: ActiveValue::Set(record.stripe_customer_id),
            profile_id: ActiveValue::Set(record.profile_id),
            listing_id: ActiveValue::Set(record.listing_id),
            price_id: ActiveValue::Set(record.price_id),
            plan: ActiveValue::Set(record.plan),
            status: ActiveValue::Set(record.status),
            current_period_end: ActiveValue::Set(record.current_period_end),
            cancel_at_period_end: ActiveValue::Set(record.cancel_at_period_end),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        match existing {
            Some(existing) => {
                subscription_am.id = ActiveValue::Unchanged(existing.id);
                subscription_am.created_at = ActiveValue::Unchanged(existing.created_at);

                subscription_am.update(self.db).await
            }
            None => {
                subscription_am.created_at = ActiveValue::Set(now);

                subscription_am.insert(self.db).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use entity::sea_orm_active_enums::ListingPlan;
    use linkdex_test_utils::prelude::*;

    use crate::server::data::subscription::{SubscriptionRecord, SubscriptionRepository};

    fn record(profile_id: i32, status: &str) -> SubscriptionRecord {
        SubscriptionRecord {
            stripe_subscription_id: "sub_1".to_string(),
            stripe_customer_id: "cus_1".to_string(),
            profile_id,
            listing_id: None,
            price_id: TEST_PRICE_PRO.to_string(),
            plan: ListingPlan::Pro,
            status: status.to_string(),
            current_period_end: Utc::now().naive_utc() + Duration::days(30),
            cancel_at_period_end: false,
        }
    }

    /// Expect a new row on first sync
    #[tokio::test]
    async fn inserts_new_subscription() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_tables().build().await?;
        let profile = test.user().insert_profile("user@example.com").await?;
        let repo = SubscriptionRepository::new(&test.db);

        let subscription = repo.upsert(record(profile.id, "active")).await?;

        assert_eq!(subscription.status, "active");
        assert!(repo.find_by_stripe_id("sub_1").await?.is_some());

        Ok(())
    }

    /// Expect the existing row to be updated in place
    #[tokio::test]
    async fn updates_existing_subscription() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_tables().build().await?;
        let profile = test.user().insert_profile("user@example.com").await?;
        let repo = SubscriptionRepository::new(&test.db);

        let first = repo.upsert(record(profile.id, "active")).await?;
        let second = repo.upsert(record(profile.id, "past_due")).await?;

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, "past_due");
        assert_eq!(first.created_at, second.created_at);

        Ok(())
    }

    /// Expect Error when the profile does not exist
    #[tokio::test]
    async fn fails_for_nonexistent_profile() -> Result<(), TestError> {
        let test = TestBuilder::new().with_tables().build().await?;
        let repo = SubscriptionRepository::new(&test.db);

        let result = repo.upsert(record(42, "active")).await;

        assert!(result.is_err());

        Ok(())
    }
}
