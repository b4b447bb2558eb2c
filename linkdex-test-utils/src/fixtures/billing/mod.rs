//! Payment API fixtures: REST endpoints and signed webhook payloads.

pub mod factory;

use chrono::Utc;
use hmac::{Hmac, Mac};
use mockito::{Matcher, Mock};
use sha2::Sha256;

use crate::{
    constant::{TEST_STRIPE_SECRET_KEY, TEST_STRIPE_WEBHOOK_SECRET},
    TestContext,
};

impl TestContext {
    pub fn billing<'a>(&'a mut self) -> BillingFixtures<'a> {
        BillingFixtures { setup: self }
    }
}

pub struct BillingFixtures<'a> {
    setup: &'a mut TestContext,
}

/// Build a `Stripe-Signature` header for `payload` signed at `timestamp`.
pub fn sign_webhook_payload(payload: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_STRIPE_WEBHOOK_SECRET.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    format!("t={},v1={}", timestamp, signature)
}

/// Build a `Stripe-Signature` header for `payload` signed now.
pub fn signed_webhook_header(payload: &str) -> String {
    sign_webhook_payload(payload, Utc::now().timestamp())
}

impl<'a> BillingFixtures<'a> {
    fn authorized_mock(&mut self, method: &str, path: &str) -> mockito::Mock {
        self.setup.server.mock(method, path).match_header(
            "authorization",
            format!("Bearer {}", TEST_STRIPE_SECRET_KEY).as_str(),
        )
    }

    /// Mock `POST /v1/customers` returning `customer_id`.
    pub fn create_customer_endpoint(&mut self, customer_id: &str, expected_requests: usize) -> Mock {
        let body = serde_json::json!({ "id": customer_id, "object": "customer" });

        self.authorized_mock("POST", "/v1/customers")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock `POST /v1/checkout/sessions` returning a session redirecting to `url`.
    ///
    /// The request must reference `price_id`.
    pub fn create_checkout_session_endpoint(
        &mut self,
        price_id: &str,
        url: &str,
        expected_requests: usize,
    ) -> Mock {
        let body = serde_json::json!({
            "id": "cs_test_1",
            "object": "checkout.session",
            "url": url,
        });

        self.authorized_mock("POST", "/v1/checkout/sessions")
            .match_body(Matcher::UrlEncoded(
                "line_items[0][price]".to_string(),
                price_id.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock `POST /v1/billing_portal/sessions` returning a session redirecting to `url`.
    pub fn create_portal_session_endpoint(&mut self, url: &str, expected_requests: usize) -> Mock {
        let body = serde_json::json!({
            "id": "bps_test_1",
            "object": "billing_portal.session",
            "url": url,
        });

        self.authorized_mock("POST", "/v1/billing_portal/sessions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /v1/subscriptions/{id}` returning `subscription`.
    ///
    /// The subscription ID is read from the object's `id` field.
    pub fn create_subscription_endpoint(
        &mut self,
        subscription: &serde_json::Value,
        expected_requests: usize,
    ) -> Mock {
        let id = subscription["id"].as_str().unwrap_or_default().to_string();

        self.authorized_mock("GET", &format!("/v1/subscriptions/{}", id))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(subscription.to_string())
            .expect(expected_requests)
            .create()
    }
}
