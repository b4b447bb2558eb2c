//! Database model type aliases.
//!
//! Shorthand for the `entity` crate models used throughout the server.

/// Registered user, keyed by the auth provider subject.
pub type ProfileModel = entity::profile::Model;

/// Listing category.
pub type CategoryModel = entity::category::Model;

/// Submitted website listing.
///
/// A listing is publicly visible when approved and `visible_until` is unset or in the
/// future.
pub type ListingModel = entity::listing::Model;

/// Local mirror of a payment vendor subscription.
pub type SubscriptionModel = entity::subscription::Model;

/// Webhook event already handled, used for idempotency.
pub type StripeEventModel = entity::stripe_event::Model;
