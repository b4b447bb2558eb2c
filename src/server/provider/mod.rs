//! Clients for the hosted vendors Linkdex delegates to.
//!
//! - [`auth`] - OAuth2 authorization code flow and access token validation
//! - [`stripe`] - Payment API (customers, checkout, portal, subscriptions) and webhook signatures
//! - [`email`] - Transactional email API
//! - [`ai`] - Chat completions API and page fetching for suggestions
//!
//! Every client is cheap to clone and shares one `reqwest::Client` connection pool.

pub mod ai;
pub mod auth;
pub mod email;
pub mod stripe;

use crate::server::error::{provider::ProviderError, Error};

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Returns `response` unchanged on success, otherwise a [`ProviderError::Api`] carrying the
/// status and a truncated body.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_MESSAGE_LEN {
        let mut end = MAX_ERROR_MESSAGE_LEN;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }

    Err(ProviderError::Api {
        provider,
        status: status.as_u16(),
        message,
    }
    .into())
}
