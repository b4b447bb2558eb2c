//! Which errors are worth retrying.

use sea_orm::DbErr;

use super::{provider::ProviderError, Error};

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (server errors, network failures)
    Retry,
    /// Failed permanently (bad request, invalid data)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::ReqwestError(reqwest_error) => match reqwest_error.status() {
                Some(status) if status.is_server_error() => ErrorRetryStrategy::Retry,
                Some(status) if status.as_u16() == 429 => ErrorRetryStrategy::Retry,
                Some(_) => ErrorRetryStrategy::Fail,
                // Timeout, connection reset or DNS failure
                None => ErrorRetryStrategy::Retry,
            },

            Self::ProviderError(ProviderError::Api { status, .. }) => {
                if *status >= 500 || *status == 429 {
                    ErrorRetryStrategy::Retry
                } else {
                    ErrorRetryStrategy::Fail
                }
            }
            Self::ProviderError(ProviderError::UnexpectedResponse { .. }) => {
                ErrorRetryStrategy::Fail
            }

            Self::DbErr(db_err) => match db_err {
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,
                // Query, constraint and conversion errors won't resolve with retry
                _ => ErrorRetryStrategy::Fail,
            },

            // Redis connection issues are usually transient
            Self::SessionError(_) => ErrorRetryStrategy::Retry,
            Self::SessionRedisError(_) => ErrorRetryStrategy::Retry,
            Self::ApalisRedisError(_) => ErrorRetryStrategy::Retry,

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::AuthError(_) => ErrorRetryStrategy::Fail,
            Self::ListingError(_) => ErrorRetryStrategy::Fail,
            Self::BillingError(_) => ErrorRetryStrategy::Fail,
            Self::AiError(_) => ErrorRetryStrategy::Fail,
            Self::ParseError(_) => ErrorRetryStrategy::Fail,
            Self::InternalError(_) => ErrorRetryStrategy::Fail,
            Self::IoError(_) => ErrorRetryStrategy::Fail,
            Self::SerdeJsonError(_) => ErrorRetryStrategy::Fail,
            Self::JwtError(_) => ErrorRetryStrategy::Fail,
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
