//! Bodies of the billing endpoints.

use serde::{Deserialize, Serialize};

/// Body for starting a subscription checkout
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckoutRequestDto {
    /// Listing to upgrade
    pub listing_id: i32,
    /// `pro` or `sponsor`
    pub plan: String,
}

/// A vendor-hosted page the client should redirect to
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RedirectUrlDto {
    /// URL to redirect to
    pub url: String,
}

/// Result of handling a payment webhook
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookAckDto {
    /// Always true once the signature is verified
    pub received: bool,
    /// True when the event had already been processed
    pub duplicate: bool,
}
