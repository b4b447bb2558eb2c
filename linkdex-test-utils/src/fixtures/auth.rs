//! Auth provider fixtures: signed access tokens and the token endpoint.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mockito::Mock;
use serde::Serialize;

use crate::{
    constant::{TEST_AUTH_TOKEN_PATH, TEST_JWT_AUDIENCE, TEST_JWT_SECRET},
    error::TestError,
    TestContext,
};

impl TestContext {
    pub fn auth<'a>(&'a mut self) -> AuthFixtures<'a> {
        AuthFixtures { setup: self }
    }
}

pub struct AuthFixtures<'a> {
    setup: &'a mut TestContext,
}

/// Claims carried by access tokens the mock auth provider issues.
#[derive(Serialize)]
pub struct MockAccessTokenClaims {
    pub sub: String,
    pub email: String,
    pub aud: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign an access token for `subject` with the test JWT secret.
///
/// `expires_in` may be negative to produce an already expired token.
pub fn mock_access_token(
    subject: &str,
    email: &str,
    expires_in: Duration,
) -> Result<String, TestError> {
    let now = Utc::now();
    let claims = MockAccessTokenClaims {
        sub: subject.to_string(),
        email: email.to_string(),
        aud: TEST_JWT_AUDIENCE.to_string(),
        role: "authenticated".to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )?)
}

impl<'a> AuthFixtures<'a> {
    /// Mock the token endpoint, returning a valid access token for `subject`.
    pub fn create_token_endpoint(
        &mut self,
        subject: &str,
        email: &str,
        expected_requests: usize,
    ) -> Result<Mock, TestError> {
        let access_token = mock_access_token(subject, email, Duration::minutes(15))?;

        Ok(self.create_token_endpoint_with_token(&access_token, expected_requests))
    }

    /// Mock the token endpoint, returning `access_token` verbatim.
    pub fn create_token_endpoint_with_token(
        &mut self,
        access_token: &str,
        expected_requests: usize,
    ) -> Mock {
        let body = serde_json::json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh_token",
        });

        self.setup
            .server
            .mock("POST", TEST_AUTH_TOKEN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }
}
