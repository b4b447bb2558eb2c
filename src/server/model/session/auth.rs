//! CSRF state stored between login initiation and the OAuth callback.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

/// Session key for the CSRF state token.
pub const SESSION_AUTH_CSRF_KEY: &str = "linkdex:auth:csrf";

/// CSRF state of a login in progress.
#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionAuthCsrf(pub String);

impl SessionAuthCsrf {
    /// Stores the CSRF state token, replacing any previous one.
    pub async fn insert(session: &Session, state: &str) -> Result<(), Error> {
        session
            .insert(SESSION_AUTH_CSRF_KEY, SessionAuthCsrf(state.to_string()))
            .await?;

        Ok(())
    }

    /// Removes and returns the CSRF state token so it can only be used once.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Token was present
    /// - `Ok(None)` - No login is in progress for this session
    /// - `Err(Error)` - Session store failure
    pub async fn remove(session: &Session) -> Result<Option<String>, Error> {
        let csrf = session
            .remove::<SessionAuthCsrf>(SESSION_AUTH_CSRF_KEY)
            .await?
            .map(|SessionAuthCsrf(state)| state);

        Ok(csrf)
    }
}
