//! Vendor API failures.

use thiserror::Error;

/// Error returned by a vendor API.
///
/// Converted into a 500 response; the retry strategy depends on `status`.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Vendor API answered with an error status
    #[error("{provider} API responded with status {status}: {message}")]
    Api {
        /// Vendor name for logs
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },
    /// Vendor API answered with a body that could not be read
    #[error("{provider} API returned an unexpected response: {reason}")]
    UnexpectedResponse {
        /// Vendor name for logs
        provider: &'static str,
        /// What was wrong with the body
        reason: String,
    },
}
