//! Error types for the Linkdex server application.
//!
//! Domain-specific errors (authentication, configuration, listings, billing, vendor
//! providers, AI) are aggregated into [`Error`] together with the external library errors
//! that can surface from handlers. Every error converts into an HTTP response through
//! `IntoResponse`; anything without a dedicated mapping becomes a logged 500.

pub mod ai;
pub mod auth;
pub mod billing;
pub mod config;
pub mod listing;
pub mod provider;
pub mod retry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        ai::AiError, auth::AuthError, billing::BillingError, config::ConfigError,
        listing::ListingError, provider::ProviderError,
    },
};

/// Main error type for the Linkdex server application.
///
/// Uses `thiserror`'s `#[from]` so the `?` operator converts underlying errors
/// automatically. The `IntoResponse` implementation maps errors to HTTP responses.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Authentication errors (session, CSRF, tokens, permissions)
/// - Listing and category errors (validation, ownership, moderation state)
/// - Billing errors (webhook signatures, plans, customers)
/// - Vendor provider errors (unexpected API responses)
/// - AI errors (disabled provider, unparsable replies)
/// - External library errors (database, HTTP client, sessions, scheduler, queue)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization error.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Listing or category error.
    #[error(transparent)]
    ListingError(#[from] ListingError),
    /// Billing error.
    #[error(transparent)]
    BillingError(#[from] BillingError),
    /// Vendor API answered with an error status or an unexpected body.
    #[error(transparent)]
    ProviderError(#[from] ProviderError),
    /// AI helper error.
    #[error(transparent)]
    AiError(#[from] AiError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in Linkdex's code.
    #[error("Internal error, this indicates a bug: {0:?}")]
    InternalError(String),
    /// I/O error (binding the listener, serving connections).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// HTTP client error (network failures, error statuses, body decoding).
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// JSON serialization error.
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
    /// JWT decoding or validation error.
    #[error(transparent)]
    JwtError(#[from] jsonwebtoken::errors::Error),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Redis session store error (connection, command execution).
    #[error(transparent)]
    SessionRedisError(#[from] tower_sessions_redis_store::fred::prelude::Error),
    /// Worker queue storage error.
    #[error(transparent)]
    ApalisRedisError(#[from] apalis_redis::RedisError),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Converts application errors into HTTP responses.
///
/// Domain errors delegate to their own mappings; everything else is logged and
/// returned as a 500 with a generic message.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::ListingError(err) => err.into_response(),
            Self::BillingError(err) => err.into_response(),
            Self::AiError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Builds a JSON error response with the provided status and message.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic "Internal server error" message to the
/// client to avoid leaking implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}
