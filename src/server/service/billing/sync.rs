//! Mirrors vendor subscriptions into local rows and listing plans.

use chrono::Utc;
use entity::sea_orm_active_enums::ListingPlan;
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        listing::{ListingRepository, PlanUpdate},
        profile::ProfileRepository,
        subscription::{SubscriptionRecord, SubscriptionRepository},
    },
    error::{provider::ProviderError, Error},
    model::{
        app::SiteSettings,
        db::{ListingModel, ProfileModel, SubscriptionModel},
    },
    provider::stripe::{model::StripeSubscription, StripeClient},
    util::time::{free_visible_until, from_unix},
};

/// Subscription statuses under which the listing keeps its paid plan.
pub fn grants_access(status: &str) -> bool {
    matches!(status, "active" | "trialing")
}

/// Subscription statuses after which the listing falls back to the free plan.
pub fn is_ended(status: &str) -> bool {
    matches!(status, "canceled" | "unpaid" | "incomplete_expired")
}

/// Result of syncing a subscription.
pub enum SyncOutcome {
    /// No local profile could be linked to the subscription
    Ignored,
    /// Subscription stored and the listing plan updated
    Synced {
        /// Stored subscription row
        subscription: SubscriptionModel,
        /// Paying profile
        profile: ProfileModel,
        /// Linked listing after the plan change, if any
        listing: Option<ListingModel>,
    },
}

fn unexpected(reason: String) -> Error {
    ProviderError::UnexpectedResponse {
        provider: "payment",
        reason,
    }
    .into()
}

/// Upserts `subscription` and applies its plan to the linked listing.
///
/// The profile and listing are resolved from the subscription metadata, then from the
/// existing local row, and the profile finally from the customer ID.
///
/// Runs entirely on `db` so it can be part of the webhook transaction.
pub async fn sync_subscription<C: ConnectionTrait>(
    db: &C,
    stripe: &StripeClient,
    settings: &SiteSettings,
    subscription: &StripeSubscription,
) -> Result<SyncOutcome, Error> {
    let subscription_repo = SubscriptionRepository::new(db);
    let profile_repo = ProfileRepository::new(db);
    let listing_repo = ListingRepository::new(db);

    let existing = subscription_repo.find_by_stripe_id(&subscription.id).await?;

    let profile_id = subscription
        .metadata_id("profile_id")
        .or(existing.as_ref().map(|row| row.profile_id));
    let profile = match profile_id {
        Some(profile_id) => profile_repo.find_by_id(profile_id).await?,
        None => profile_repo.find_by_customer_id(&subscription.customer).await?,
    };
    let Some(profile) = profile else {
        tracing::warn!(
            subscription_id = %subscription.id,
            "No profile found for subscription, ignoring"
        );
        return Ok(SyncOutcome::Ignored);
    };

    let listing_id = subscription
        .metadata_id("listing_id")
        .or(existing.as_ref().and_then(|row| row.listing_id));
    let listing = match listing_id {
        Some(listing_id) => listing_repo.find_by_id(listing_id).await?,
        None => None,
    };

    let price_id = subscription
        .price_id()
        .ok_or_else(|| unexpected(format!("subscription {} has no items", subscription.id)))?;
    let Some(plan) = stripe.plan_for_price(price_id) else {
        tracing::warn!(
            subscription_id = %subscription.id,
            "Subscription uses unknown price {}, ignoring",
            price_id
        );
        return Ok(SyncOutcome::Ignored);
    };
    let period_end = subscription.period_end().ok_or_else(|| {
        unexpected(format!(
            "subscription {} has no current period end",
            subscription.id
        ))
    })?;
    let period_end = from_unix(period_end)?;

    let previous_period_end = existing.as_ref().map(|row| row.current_period_end);

    let row = subscription_repo
        .upsert(SubscriptionRecord {
            stripe_subscription_id: subscription.id.clone(),
            stripe_customer_id: subscription.customer.clone(),
            profile_id: profile.id,
            listing_id: listing.as_ref().map(|listing| listing.id),
            price_id: price_id.to_string(),
            plan,
            status: subscription.status.clone(),
            current_period_end: period_end,
            cancel_at_period_end: subscription.cancel_at_period_end,
        })
        .await?;

    let listing = match listing {
        Some(listing) if grants_access(&subscription.status) => {
            listing_repo
                .apply_plan(
                    listing.id,
                    PlanUpdate {
                        plan,
                        featured: plan == ListingPlan::Sponsor,
                        visible_until: Some(period_end),
                        clear_reminder: previous_period_end != Some(period_end),
                    },
                )
                .await?
        }
        Some(listing) if is_ended(&subscription.status) && listing.plan != ListingPlan::Free => {
            tracing::info!(
                listing_id = %listing.id,
                subscription_id = %subscription.id,
                "Subscription ended, downgrading listing to free"
            );

            listing_repo
                .apply_plan(
                    listing.id,
                    PlanUpdate {
                        plan: ListingPlan::Free,
                        featured: false,
                        visible_until: free_visible_until(Utc::now(), settings.free_listing_days),
                        clear_reminder: true,
                    },
                )
                .await?
        }
        listing => listing,
    };

    Ok(SyncOutcome::Synced {
        subscription: row,
        profile,
        listing,
    })
}
