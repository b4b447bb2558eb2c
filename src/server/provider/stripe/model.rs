//! Payment API objects, limited to the fields Linkdex reads.

use std::collections::HashMap;

use serde::Deserialize;

/// Webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    /// Event ID, used to discard redeliveries
    pub id: String,
    /// Event type such as `customer.subscription.updated`
    #[serde(rename = "type")]
    pub event_type: String,
    /// Object the event is about
    pub data: StripeEventData,
}

/// Payload of a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    /// Left untyped since its shape depends on `event_type`
    pub object: serde_json::Value,
}

/// Subscription object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscription {
    /// Subscription ID
    pub id: String,
    /// Customer ID
    pub customer: String,
    /// Status such as `active`, `past_due` or `canceled`
    pub status: String,
    /// Absent on newer API versions, which report it per item
    #[serde(default)]
    pub current_period_end: Option<i64>,
    /// Whether the subscription ends with the current period
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Metadata set at checkout, including `profile_id` and `listing_id`
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Subscribed prices
    pub items: StripeList<StripeSubscriptionItem>,
}

impl StripeSubscription {
    /// Price of the first subscription item.
    pub fn price_id(&self) -> Option<&str> {
        self.items.data.first().map(|item| item.price.id.as_str())
    }

    /// End of the current billing period, falling back to the first item's period.
    pub fn period_end(&self) -> Option<i64> {
        self.current_period_end.or_else(|| {
            self.items
                .data
                .first()
                .and_then(|item| item.current_period_end)
        })
    }

    /// Integer metadata value, ignoring absent or malformed entries.
    pub fn metadata_id(&self, key: &str) -> Option<i32> {
        self.metadata.get(key).and_then(|value| value.parse().ok())
    }
}

/// List wrapper of the payment API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Items on this page
    pub data: Vec<T>,
}

/// Price line of a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscriptionItem {
    /// Subscribed price
    pub price: StripePrice,
    /// End of the current billing period of this item
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

/// Price reference.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePrice {
    /// Price ID
    pub id: String,
}

/// Completed checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    /// Checkout session ID
    pub id: String,
    /// Customer that paid
    #[serde(default)]
    pub customer: Option<String>,
    /// Subscription created by the checkout
    #[serde(default)]
    pub subscription: Option<String>,
    /// Profile ID passed when the session was created
    #[serde(default)]
    pub client_reference_id: Option<String>,
    /// Metadata passed when the session was created
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeCheckoutSession {
    /// Profile that started the checkout, from metadata or the client reference.
    pub fn profile_id(&self) -> Option<i32> {
        self.metadata
            .get("profile_id")
            .or(self.client_reference_id.as_ref())
            .and_then(|value| value.parse().ok())
    }
}

/// Invoice object, read for failed payments.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeInvoice {
    /// Invoice ID
    pub id: String,
    /// Customer billed
    #[serde(default)]
    pub customer: Option<String>,
    /// Subscription billed
    #[serde(default)]
    pub subscription: Option<String>,
    /// Billing email on the invoice
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// Object returned when creating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    /// Customer ID
    pub id: String,
}

/// Checkout or billing portal session; only the redirect URL is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeRedirectSession {
    /// URL to redirect the user to
    pub url: String,
}

#[cfg(test)]
mod tests {
    use linkdex_test_utils::prelude::*;

    use super::*;

    #[test]
    fn reads_period_end_from_top_level() {
        let value = billing_factory::mock_subscription(
            "sub_1", "cus_1", "price_pro", "active", 1_900_000_000, Some(3), Some(4),
        );

        let sub: StripeSubscription = serde_json::from_value(value).unwrap();

        assert_eq!(sub.period_end(), Some(1_900_000_000));
        assert_eq!(sub.price_id(), Some("price_pro"));
        assert_eq!(sub.metadata_id("listing_id"), Some(3));
        assert_eq!(sub.metadata_id("profile_id"), Some(4));
    }

    #[test]
    fn falls_back_to_item_period_end() {
        let mut value = billing_factory::mock_subscription(
            "sub_1", "cus_1", "price_pro", "active", 1_900_000_000, None, None,
        );
        value
            .as_object_mut()
            .unwrap()
            .remove("current_period_end");

        let sub: StripeSubscription = serde_json::from_value(value).unwrap();

        assert_eq!(sub.period_end(), Some(1_900_000_000));
        assert_eq!(sub.metadata_id("listing_id"), None);
    }

    #[test]
    fn checkout_session_profile_falls_back_to_client_reference() {
        let mut value = billing_factory::mock_checkout_session("cus_1", "sub_1", 3, 9);
        value["metadata"] = serde_json::json!({});

        let session: StripeCheckoutSession = serde_json::from_value(value).unwrap();

        assert_eq!(session.profile_id(), Some(9));
    }
}
