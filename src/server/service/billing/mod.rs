//! Subscription billing: checkout, customer portal and webhook handling.

pub mod sync;
pub mod webhook;

use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};
use sea_orm::DatabaseConnection;

use crate::{
    model::billing::{CheckoutRequestDto, RedirectUrlDto},
    server::{
        data::{listing::ListingRepository, profile::ProfileRepository},
        error::{billing::BillingError, listing::ListingError, Error},
        model::{app::SiteSettings, db::ProfileModel},
        provider::stripe::{CheckoutSessionParams, StripeClient},
    },
};

/// Paid plan named in a checkout request.
fn purchasable_plan(plan: &str) -> Option<ListingPlan> {
    match plan.trim().to_lowercase().as_str() {
        "pro" => Some(ListingPlan::Pro),
        "sponsor" => Some(ListingPlan::Sponsor),
        _ => None,
    }
}

/// Checkout, billing portal and webhook processing.
pub struct BillingService<'a> {
    db: &'a DatabaseConnection,
    stripe: &'a StripeClient,
    settings: &'a SiteSettings,
}

impl<'a> BillingService<'a> {
    /// Creates a new instance of [`BillingService`]
    pub fn new(
        db: &'a DatabaseConnection,
        stripe: &'a StripeClient,
        settings: &'a SiteSettings,
    ) -> Self {
        Self {
            db,
            stripe,
            settings,
        }
    }

    /// Starts a subscription checkout for one of the user's listings.
    ///
    /// Creates the user's payment customer on first checkout.
    ///
    /// # Returns
    /// - `Ok(RedirectUrlDto)` - Hosted checkout page URL
    /// - `Err(Error::BillingError(BillingError::PlanNotPurchasable))` - Plan is not pro or sponsor
    /// - `Err(Error::BillingError(BillingError::ListingNotEligible))` - Listing was rejected
    /// - `Err(Error::ListingError(_))` - Listing missing or owned by another user
    /// - `Err(Error::ProviderError(_))` - Payment API request failed
    pub async fn checkout(
        &self,
        user: &ProfileModel,
        request: CheckoutRequestDto,
    ) -> Result<RedirectUrlDto, Error> {
        let plan = purchasable_plan(&request.plan)
            .ok_or_else(|| BillingError::PlanNotPurchasable(request.plan.clone()))?;
        let price_id = self
            .stripe
            .price_for_plan(plan)
            .ok_or_else(|| BillingError::PlanNotPurchasable(request.plan.clone()))?;

        let listing = ListingRepository::new(self.db)
            .find_by_id(request.listing_id)
            .await?
            .ok_or(ListingError::NotFound)?;

        if listing.owner_id != user.id {
            return Err(ListingError::NotOwner {
                user_id: user.id,
                listing_id: listing.id,
            }
            .into());
        }
        if listing.status == ListingStatus::Rejected {
            return Err(BillingError::ListingNotEligible(listing.id).into());
        }

        let customer_id = self.ensure_customer(user).await?;

        let url = self
            .stripe
            .create_checkout_session(CheckoutSessionParams {
                customer_id: &customer_id,
                price_id,
                profile_id: user.id,
                listing_id: listing.id,
                success_url: self.settings.url("/dashboard?checkout=success"),
                cancel_url: self.settings.url("/pricing?checkout=cancelled"),
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            listing_id = %listing.id,
            "Started checkout for {:?} plan",
            plan
        );

        Ok(RedirectUrlDto { url })
    }

    /// Opens the vendor's billing portal for the user's customer.
    ///
    /// # Returns
    /// - `Ok(RedirectUrlDto)` - Hosted portal page URL
    /// - `Err(Error::BillingError(BillingError::NoCustomer))` - User never checked out
    pub async fn portal(&self, user: &ProfileModel) -> Result<RedirectUrlDto, Error> {
        let customer_id = user
            .stripe_customer_id
            .as_deref()
            .ok_or(BillingError::NoCustomer)?;

        let url = self
            .stripe
            .create_portal_session(customer_id, &self.settings.url("/dashboard"))
            .await?;

        Ok(RedirectUrlDto { url })
    }

    async fn ensure_customer(&self, user: &ProfileModel) -> Result<String, Error> {
        if let Some(customer_id) = &user.stripe_customer_id {
            return Ok(customer_id.clone());
        }

        let customer_id = self.stripe.create_customer(&user.email, user.id).await?;

        ProfileRepository::new(self.db)
            .set_stripe_customer_id(user.id, &customer_id)
            .await?;

        tracing::info!(user_id = %user.id, "Created payment customer");

        Ok(customer_id)
    }
}
