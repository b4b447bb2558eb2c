//! Authentication and authorization failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::{error_response, InternalServerError};

/// Authentication and authorization failures.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No user is logged in
    #[error("User ID is not present in session")]
    UserNotInSession,
    /// Session refers to a profile that no longer exists
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    /// Login callback state does not match the stored one
    #[error("Failed to login user due to CSRF state mismatch")]
    CsrfValidationFailed,
    /// Login callback arrived without a stored state
    #[error("Failed to login user due to CSRF state present in session store but without a value")]
    CsrfMissingValue,
    /// Auth provider rejected the authorization code
    #[error("Failed to exchange authorization code with the auth provider: {0}")]
    TokenExchangeFailed(String),
    /// Access token signature, audience or expiry is invalid
    #[error("Access token from the auth provider failed validation: {0}")]
    InvalidAccessToken(String),
    /// User lacks the admin level an endpoint requires
    #[error("User ID {user_id} lacks the {required} admin level")]
    InsufficientPermissions {
        /// Profile ID of the user
        user_id: i32,
        /// Name of the required admin level
        required: String,
    },
    /// Super admin tried to change their own admin level
    #[error("User ID {0} attempted to change their own admin level")]
    SelfAdminLevelChange(i32),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession => {
                tracing::debug!("{}", self);

                error_response(StatusCode::UNAUTHORIZED, "Not logged in")
            }
            Self::UserNotInDatabase(user_id) => {
                tracing::debug!(user_id = %user_id, "{}", self);

                error_response(StatusCode::NOT_FOUND, "User not found")
            }
            Self::CsrfValidationFailed
            | Self::TokenExchangeFailed(_)
            | Self::InvalidAccessToken(_) => {
                tracing::debug!("{}", self);

                error_response(
                    StatusCode::BAD_REQUEST,
                    "There was an issue logging you in, please try again.",
                )
            }
            Self::InsufficientPermissions { user_id, .. } => {
                tracing::debug!(user_id = %user_id, "{}", self);

                error_response(StatusCode::FORBIDDEN, "Insufficient permissions")
            }
            Self::SelfAdminLevelChange(_) => {
                error_response(StatusCode::CONFLICT, "You cannot change your own admin level")
            }
            Self::CsrfMissingValue => InternalServerError(self).into_response(),
        }
    }
}
