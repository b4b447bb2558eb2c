//! OAuth2 login redirect.

use crate::server::provider::auth::AuthProvider;

/// Authorize URL and CSRF state for a new login attempt.
pub struct LoginRedirect {
    /// Authorize URL to redirect the user to
    pub url: String,
    /// CSRF state to store in the session
    pub state: String,
}

/// Builds the authorize URL for a new login.
pub fn login_service(auth: &AuthProvider) -> LoginRedirect {
    let (url, state) = auth.authorize_url();

    LoginRedirect { url, state }
}
