//! Listing and category failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Listing and category failures.
#[derive(Error, Debug)]
pub enum ListingError {
    /// No listing with the given ID or slug
    #[error("Listing not found")]
    NotFound,
    /// No category with the given ID or slug
    #[error("Category not found")]
    CategoryNotFound,
    /// Input failed validation, with a message naming the field
    #[error("{0}")]
    Validation(String),
    /// Another listing already uses the URL
    #[error("A listing for this URL already exists")]
    DuplicateUrl,
    /// Another category already uses the slug
    #[error("A category with slug {0:?} already exists")]
    DuplicateCategory(String),
    /// User is neither the owner nor a super admin
    #[error("User ID {user_id} does not own listing ID {listing_id}")]
    NotOwner {
        /// Profile ID of the user
        user_id: i32,
        /// Listing the user tried to change
        listing_id: i32,
    },
    /// Moderation action not allowed from the current status
    #[error("Cannot {action} a listing that is {status}")]
    InvalidTransition {
        /// Attempted action, such as `approve`
        action: &'static str,
        /// Current status of the listing
        status: &'static str,
    },
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound | Self::CategoryNotFound => {
                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            Self::Validation(_) => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            Self::DuplicateUrl | Self::DuplicateCategory(_) | Self::InvalidTransition { .. } => {
                error_response(StatusCode::CONFLICT, self.to_string())
            }
            Self::NotOwner { .. } => {
                tracing::debug!("{}", self);

                error_response(
                    StatusCode::FORBIDDEN,
                    "You do not have permission to manage this listing",
                )
            }
        }
    }
}
