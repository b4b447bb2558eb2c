//! Payment API object factories.
//!
//! Objects only carry the fields the application reads.

use serde_json::{json, Value};

/// Subscription object with metadata linking it to a listing and profile.
///
/// `current_period_end` is a unix timestamp placed at the top level of the object.
pub fn mock_subscription(
    id: &str,
    customer: &str,
    price_id: &str,
    status: &str,
    current_period_end: i64,
    listing_id: Option<i32>,
    profile_id: Option<i32>,
) -> Value {
    let mut metadata = serde_json::Map::new();
    if let Some(listing_id) = listing_id {
        metadata.insert("listing_id".to_string(), json!(listing_id.to_string()));
    }
    if let Some(profile_id) = profile_id {
        metadata.insert("profile_id".to_string(), json!(profile_id.to_string()));
    }

    json!({
        "id": id,
        "object": "subscription",
        "customer": customer,
        "status": status,
        "cancel_at_period_end": false,
        "current_period_end": current_period_end,
        "metadata": metadata,
        "items": {
            "object": "list",
            "data": [{
                "id": format!("si_{}", id),
                "price": { "id": price_id },
                "current_period_end": current_period_end
            }]
        }
    })
}

/// Completed checkout session for a subscription purchase.
pub fn mock_checkout_session(
    customer: &str,
    subscription: &str,
    listing_id: i32,
    profile_id: i32,
) -> Value {
    json!({
        "id": "cs_test_1",
        "object": "checkout.session",
        "mode": "subscription",
        "customer": customer,
        "subscription": subscription,
        "client_reference_id": profile_id.to_string(),
        "metadata": {
            "listing_id": listing_id.to_string(),
            "profile_id": profile_id.to_string()
        }
    })
}

/// Invoice for `customer`.
pub fn mock_invoice(customer: &str, subscription: Option<&str>) -> Value {
    json!({
        "id": "in_test_1",
        "object": "invoice",
        "customer": customer,
        "subscription": subscription,
        "customer_email": null
    })
}

/// Webhook event envelope wrapping `object`, serialized as the raw payload.
pub fn mock_event(id: &str, event_type: &str, object: Value) -> String {
    json!({
        "id": id,
        "object": "event",
        "type": event_type,
        "created": chrono::Utc::now().timestamp(),
        "data": { "object": object }
    })
    .to_string()
}
