//! Payment API client.
//!
//! Requests are form-encoded with bracketed keys (`metadata[listing_id]`) and
//! authenticated with the secret key as a bearer token.

pub mod model;
pub mod webhook;

use entity::sea_orm_active_enums::ListingPlan;

use crate::server::{
    config::Config,
    error::Error,
    provider::{
        ensure_success,
        stripe::model::{StripeCustomer, StripeRedirectSession, StripeSubscription},
    },
};

const PROVIDER: &str = "payment";

/// Parameters of a subscription checkout session.
pub struct CheckoutSessionParams<'a> {
    /// Customer the subscription is created for
    pub customer_id: &'a str,
    /// Price of the purchased plan
    pub price_id: &'a str,
    /// Profile stored in the subscription metadata
    pub profile_id: i32,
    /// Listing stored in the subscription metadata
    pub listing_id: i32,
    /// Redirect after a successful payment
    pub success_url: String,
    /// Redirect after an abandoned checkout
    pub cancel_url: String,
}

/// Payment API client covering customers, checkout, billing portal and webhook signatures.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
    webhook_secret: String,
    price_pro: String,
    price_sponsor: String,
}

impl StripeClient {
    /// Creates a client for the payment API at `config.stripe_api_url`.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.stripe_api_url.clone(),
            secret_key: config.stripe_secret_key.clone(),
            webhook_secret: config.stripe_webhook_secret.clone(),
            price_pro: config.stripe_price_pro.clone(),
            price_sponsor: config.stripe_price_sponsor.clone(),
        }
    }

    /// Price ID for a purchasable plan; the free plan has none.
    pub fn price_for_plan(&self, plan: ListingPlan) -> Option<&str> {
        match plan {
            ListingPlan::Pro => Some(&self.price_pro),
            ListingPlan::Sponsor => Some(&self.price_sponsor),
            ListingPlan::Free => None,
        }
    }

    /// Plan purchased through `price_id`, if it is one of the configured prices.
    pub fn plan_for_price(&self, price_id: &str) -> Option<ListingPlan> {
        if price_id == self.price_sponsor {
            Some(ListingPlan::Sponsor)
        } else if price_id == self.price_pro {
            Some(ListingPlan::Pro)
        } else {
            None
        }
    }

    /// Verifies a webhook payload signature against the configured endpoint secret.
    pub fn verify_webhook(&self, payload: &str, header: Option<&str>, now: i64) -> Result<(), Error> {
        webhook::verify_signature(payload, header, &self.webhook_secret, now)
    }

    async fn post_form<T>(&self, path: &str, form: &[(String, String)]) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;

        Ok(ensure_success(PROVIDER, response).await?.json().await?)
    }

    /// Creates a customer for a profile and returns its ID.
    pub async fn create_customer(&self, email: &str, profile_id: i32) -> Result<String, Error> {
        let form = vec![
            ("email".to_string(), email.to_string()),
            ("metadata[profile_id]".to_string(), profile_id.to_string()),
        ];

        let customer: StripeCustomer = self.post_form("/v1/customers", &form).await?;

        Ok(customer.id)
    }

    /// Creates a subscription-mode checkout session and returns its URL.
    ///
    /// `listing_id` and `profile_id` are attached as metadata to both the session and the
    /// resulting subscription so webhooks can link them back.
    pub async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams<'_>,
    ) -> Result<String, Error> {
        let listing_id = params.listing_id.to_string();
        let profile_id = params.profile_id.to_string();

        let form = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("customer".to_string(), params.customer_id.to_string()),
            ("client_reference_id".to_string(), profile_id.clone()),
            ("line_items[0][price]".to_string(), params.price_id.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("success_url".to_string(), params.success_url),
            ("cancel_url".to_string(), params.cancel_url),
            ("metadata[listing_id]".to_string(), listing_id.clone()),
            ("metadata[profile_id]".to_string(), profile_id.clone()),
            (
                "subscription_data[metadata][listing_id]".to_string(),
                listing_id,
            ),
            (
                "subscription_data[metadata][profile_id]".to_string(),
                profile_id,
            ),
        ];

        let session: StripeRedirectSession = self.post_form("/v1/checkout/sessions", &form).await?;

        Ok(session.url)
    }

    /// Creates a billing portal session and returns its URL.
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, Error> {
        let form = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("return_url".to_string(), return_url.to_string()),
        ];

        let session: StripeRedirectSession =
            self.post_form("/v1/billing_portal/sessions", &form).await?;

        Ok(session.url)
    }

    /// Fetches the current state of a subscription.
    pub async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<StripeSubscription, Error> {
        let response = self
            .http
            .get(format!("{}/v1/subscriptions/{}", self.api_url, subscription_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Ok(ensure_success(PROVIDER, response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::ListingPlan;
    use linkdex_test_utils::prelude::*;

    use super::CheckoutSessionParams;
    use crate::server::{
        error::{provider::ProviderError, Error},
        util::test::TestContextExt,
    };

    #[tokio::test]
    /// Expect plans and prices to map both ways
    async fn maps_plans_to_prices() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let stripe = test.app_state().stripe;

        assert_eq!(stripe.price_for_plan(ListingPlan::Pro), Some(TEST_PRICE_PRO));
        assert_eq!(stripe.price_for_plan(ListingPlan::Free), None);
        assert_eq!(stripe.plan_for_price(TEST_PRICE_SPONSOR), Some(ListingPlan::Sponsor));
        assert_eq!(stripe.plan_for_price("price_unknown"), None);

        Ok(())
    }

    #[tokio::test]
    /// Expect the created customer's ID
    async fn creates_customer() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let mock = test.billing().create_customer_endpoint("cus_123", 1);
        let stripe = test.app_state().stripe;

        let customer_id = stripe.create_customer("user@example.com", 1).await.unwrap();

        assert_eq!(customer_id, "cus_123");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    /// Expect the checkout session URL for the requested price
    async fn creates_checkout_session() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let mock = test.billing().create_checkout_session_endpoint(
            TEST_PRICE_SPONSOR,
            "https://checkout.example/cs_test_1",
            1,
        );
        let stripe = test.app_state().stripe;

        let url = stripe
            .create_checkout_session(CheckoutSessionParams {
                customer_id: "cus_123",
                price_id: TEST_PRICE_SPONSOR,
                profile_id: 1,
                listing_id: 2,
                success_url: format!("{}/dashboard", TEST_SITE_URL),
                cancel_url: format!("{}/pricing", TEST_SITE_URL),
            })
            .await
            .unwrap();

        assert_eq!(url, "https://checkout.example/cs_test_1");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    /// Expect the subscription to be decoded from the API
    async fn retrieves_subscription() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let subscription = billing_factory::mock_subscription(
            "sub_1", "cus_1", TEST_PRICE_PRO, "active", 1_900_000_000, Some(1), Some(1),
        );
        let mock = test.billing().create_subscription_endpoint(&subscription, 1);
        let stripe = test.app_state().stripe;

        let result = stripe.retrieve_subscription("sub_1").await.unwrap();

        assert_eq!(result.id, "sub_1");
        assert_eq!(result.status, "active");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    /// Expect ProviderError carrying the status when the API fails
    async fn returns_provider_error_on_failure() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let stripe = test.app_state().stripe;

        // No mock registered, the mock server answers 501
        let result = stripe.retrieve_subscription("sub_missing").await;

        assert!(matches!(
            result,
            Err(Error::ProviderError(ProviderError::Api { status: 501, .. }))
        ));

        Ok(())
    }
}
