//! Failures of the AI helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Failures of the AI helpers.
#[derive(Error, Debug)]
pub enum AiError {
    /// No AI API key is configured
    #[error("AI features are not configured")]
    Disabled,
    /// Reply is not the JSON that was asked for
    #[error("AI reply could not be parsed: {0}")]
    UnparsableReply(String),
    /// Submitted page could not be fetched
    #[error("Failed to fetch {url}: {reason}")]
    PageFetchFailed {
        /// Page that was requested
        url: String,
        /// Transport error or HTTP status
        reason: String,
    },
    /// Translation target is not a supported locale
    #[error("Unsupported locale {0:?}")]
    UnsupportedLocale(String),
}

impl IntoResponse for AiError {
    fn into_response(self) -> Response {
        match self {
            Self::Disabled => error_response(StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Self::UnparsableReply(_) => {
                tracing::warn!("{}", self);

                error_response(
                    StatusCode::BAD_GATEWAY,
                    "The AI provider returned an unusable reply",
                )
            }
            Self::PageFetchFailed { .. } => {
                tracing::debug!("{}", self);

                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            Self::UnsupportedLocale(_) => error_response(StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}
