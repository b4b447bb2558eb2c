//! Checkout and webhook failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Checkout and webhook failures.
#[derive(Error, Debug)]
pub enum BillingError {
    /// Webhook request has no signature header
    #[error("Missing Stripe-Signature header")]
    MissingSignature,
    /// Signature header cannot be parsed
    #[error("Malformed Stripe-Signature header")]
    MalformedSignature,
    /// No signature matches the payload
    #[error("Webhook signature does not match payload")]
    SignatureMismatch,
    /// Signature timestamp is too old or too far ahead
    #[error("Webhook timestamp {timestamp} is outside the {tolerance_secs}s tolerance")]
    StaleSignature {
        /// Signed UNIX timestamp
        timestamp: i64,
        /// Accepted clock difference
        tolerance_secs: i64,
    },
    /// Signed payload is not an event
    #[error("Webhook payload is not a valid event: {0}")]
    MalformedEvent(String),
    /// Requested plan has no price
    #[error("Plan {0:?} cannot be purchased")]
    PlanNotPurchasable(String),
    /// User has no customer at the payment provider yet
    #[error("No billing account exists for this user")]
    NoCustomer,
    /// Listing is rejected and cannot be upgraded
    #[error("Listing ID {0} was rejected and cannot be upgraded")]
    ListingNotEligible(i32),
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingSignature
            | Self::MalformedSignature
            | Self::SignatureMismatch
            | Self::StaleSignature { .. } => {
                tracing::warn!("Rejected payment webhook: {}", self);

                error_response(StatusCode::BAD_REQUEST, "Invalid webhook signature")
            }
            Self::MalformedEvent(_) => {
                tracing::warn!("Rejected payment webhook: {}", self);

                error_response(StatusCode::BAD_REQUEST, "Malformed webhook event")
            }
            Self::PlanNotPurchasable(_) => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            Self::NoCustomer => error_response(StatusCode::NOT_FOUND, self.to_string()),
            Self::ListingNotEligible(_) => error_response(StatusCode::CONFLICT, self.to_string()),
        }
    }
}
