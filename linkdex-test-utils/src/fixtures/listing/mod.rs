//! Category, listing and subscription record fixtures.

pub mod factory;

use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};
use sea_orm::{ActiveModelTrait, ActiveValue};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn listing<'a>(&'a mut self) -> ListingFixtures<'a> {
        ListingFixtures { setup: self }
    }
}

pub struct ListingFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> ListingFixtures<'a> {
    /// Insert a category with a name derived from `slug`.
    pub async fn insert_category(
        &mut self,
        slug: &str,
    ) -> Result<entity::category::Model, TestError> {
        Ok(factory::mock_category(slug).insert(&self.setup.db).await?)
    }

    /// Insert a free listing named `name` in the given status.
    pub async fn insert_listing(
        &mut self,
        owner_id: i32,
        name: &str,
        status: ListingStatus,
    ) -> Result<entity::listing::Model, TestError> {
        let mut listing = factory::mock_listing(owner_id, name);
        listing.status = ActiveValue::Set(status);

        if status == ListingStatus::Approved {
            listing.approved_at = ActiveValue::Set(Some(chrono::Utc::now().naive_utc()));
        }

        Ok(listing.insert(&self.setup.db).await?)
    }

    /// Insert an approved listing which never expires.
    pub async fn insert_approved_listing(
        &mut self,
        owner_id: i32,
        name: &str,
    ) -> Result<entity::listing::Model, TestError> {
        self.insert_listing(owner_id, name, ListingStatus::Approved)
            .await
    }

    /// Insert an arbitrary listing active model.
    ///
    /// Start from [`factory::mock_listing`] and override the fields under test.
    pub async fn insert_listing_model(
        &mut self,
        listing: entity::listing::ActiveModel,
    ) -> Result<entity::listing::Model, TestError> {
        Ok(listing.insert(&self.setup.db).await?)
    }

    /// Insert a subscription record mirroring a vendor subscription.
    pub async fn insert_subscription(
        &mut self,
        profile_id: i32,
        listing_id: Option<i32>,
        stripe_subscription_id: &str,
        status: &str,
        current_period_end: NaiveDateTime,
    ) -> Result<entity::subscription::Model, TestError> {
        let now = chrono::Utc::now().naive_utc();

        let subscription = entity::subscription::ActiveModel {
            stripe_subscription_id: ActiveValue::Set(stripe_subscription_id.to_string()),
            stripe_customer_id: ActiveValue::Set(format!("cus_{}", profile_id)),
            profile_id: ActiveValue::Set(profile_id),
            listing_id: ActiveValue::Set(listing_id),
            price_id: ActiveValue::Set(crate::constant::TEST_PRICE_PRO.to_string()),
            plan: ActiveValue::Set(ListingPlan::Pro),
            status: ActiveValue::Set(status.to_string()),
            current_period_end: ActiveValue::Set(current_period_end),
            cancel_at_period_end: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(subscription.insert(&self.setup.db).await?)
    }
}
