//! Checkout, billing portal and payment webhook endpoints.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        billing::{CheckoutRequestDto, RedirectUrlDto, WebhookAckDto},
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::Error,
        model::app::AppState,
        service::{billing::BillingService, notification::Notifier},
    },
};

/// OpenAPI tag for billing endpoints.
pub static BILLING_TAG: &str = "billing";

/// Header carrying the payment vendor's webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// Start a hosted checkout for a paid plan on one of the user's listings
#[utoipa::path(
    post,
    path = "/api/billing/checkout",
    tag = BILLING_TAG,
    request_body = CheckoutRequestDto,
    responses(
        (status = 200, description = "Hosted checkout page URL", body = RedirectUrlDto),
        (status = 400, description = "Plan cannot be purchased", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Listing owned by another user", body = ErrorDto),
        (status = 404, description = "Listing not found", body = ErrorDto),
        (status = 409, description = "Listing was rejected", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CheckoutRequestDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let redirect = BillingService::new(&state.db, &state.stripe, &state.settings)
        .checkout(&user, request)
        .await?;

    Ok((StatusCode::OK, Json(redirect)))
}

/// Open the hosted billing portal for the user's subscriptions
#[utoipa::path(
    post,
    path = "/api/billing/portal",
    tag = BILLING_TAG,
    responses(
        (status = 200, description = "Hosted billing portal URL", body = RedirectUrlDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "User has never checked out", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn portal(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let redirect = BillingService::new(&state.db, &state.stripe, &state.settings)
        .portal(&user)
        .await?;

    Ok((StatusCode::OK, Json(redirect)))
}

/// Payment vendor webhook
///
/// The raw body is verified against the signature header before the event is applied. Events
/// already processed are acknowledged without being applied again.
#[utoipa::path(
    post,
    path = "/api/webhooks/stripe",
    tag = BILLING_TAG,
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookAckDto),
        (status = 400, description = "Missing or invalid signature, or malformed event", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: String,
) -> Result<impl IntoResponse, Error> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let notifier = Notifier::new(&state.mailer, &state.settings);

    let ack = BillingService::new(&state.db, &state.stripe, &state.settings)
        .handle_webhook(&payload, signature, &notifier)
        .await?;

    Ok((StatusCode::OK, Json(ack)))
}
