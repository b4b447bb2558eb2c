//! CSRF state handling for the OAuth2 login flow.

use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::session::auth::SessionAuthCsrf,
};

/// Validates that the session CSRF state exists and matches `csrf_state`.
///
/// The stored state is removed on read so a login attempt can only complete once.
pub async fn validate_csrf(session: &Session, csrf_state: &str) -> Result<(), Error> {
    let Some(stored_state) = SessionAuthCsrf::remove(session).await? else {
        return Err(Error::AuthError(AuthError::CsrfMissingValue));
    };

    if stored_state != csrf_state {
        return Err(Error::AuthError(AuthError::CsrfValidationFailed));
    }

    Ok(())
}

#[cfg(test)]
pub mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use linkdex_test_utils::prelude::*;

    use crate::server::{
        controller::util::csrf::validate_csrf, model::session::auth::SessionAuthCsrf,
    };

    #[tokio::test]
    /// Expect Ok when the stored state matches
    async fn validates_csrf_successfully() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;

        SessionAuthCsrf::insert(&test.session, "state").await.unwrap();
        let result = validate_csrf(&test.session, "state").await;

        assert!(result.is_ok());

        Ok(())
    }

    #[tokio::test]
    /// Expect 400 Bad Request for a mismatched state
    async fn fails_for_csrf_mismatch() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;

        SessionAuthCsrf::insert(&test.session, "different_state")
            .await
            .unwrap();
        let result = validate_csrf(&test.session, "state").await;

        assert!(result.is_err());
        let resp = result.unwrap_err().into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    /// Expect 500 Internal Server Error when no login was started
    async fn fails_when_csrf_not_in_session() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;

        let result = validate_csrf(&test.session, "state").await;

        assert!(result.is_err());
        let resp = result.unwrap_err().into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        Ok(())
    }

    #[tokio::test]
    /// Expect a state to be usable only once
    async fn rejects_replayed_state() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;

        SessionAuthCsrf::insert(&test.session, "state").await.unwrap();
        validate_csrf(&test.session, "state").await.unwrap();
        let result = validate_csrf(&test.session, "state").await;

        assert!(result.is_err());

        Ok(())
    }
}
