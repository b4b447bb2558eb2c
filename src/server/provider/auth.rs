//! OAuth2 login and access token validation against the hosted auth provider.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

use crate::server::{
    config::Config,
    error::{auth::AuthError, config::ConfigError, Error},
};

/// OAuth2 client with the authorization and token endpoints configured.
pub type AuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Claims Linkdex reads from the auth provider's access token.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    /// Auth provider user ID
    pub sub: String,
    /// Email of the user, if shared
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry as a UNIX timestamp
    pub exp: i64,
}

/// Hosted auth provider speaking OAuth2 with HS256-signed JWT access tokens.
#[derive(Clone)]
pub struct AuthProvider {
    client: AuthClient,
    http: oauth2::reqwest::Client,
    decoding_key: DecodingKey,
    audience: String,
}

impl AuthProvider {
    /// Builds the OAuth2 client and token decoding key from `config`.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = BasicClient::new(ClientId::new(config.auth_client_id.clone()))
            .set_client_secret(ClientSecret::new(config.auth_client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(config.auth_authorize_url.clone())
                    .map_err(|e| invalid_url("AUTH_AUTHORIZE_URL", e))?,
            )
            .set_token_uri(
                TokenUrl::new(config.auth_token_url.clone())
                    .map_err(|e| invalid_url("AUTH_TOKEN_URL", e))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.auth_callback_url.clone())
                    .map_err(|e| invalid_url("AUTH_CALLBACK_URL", e))?,
            );

        // Following redirects from the token endpoint would leak the authorization code
        let http = oauth2::reqwest::ClientBuilder::new()
            .redirect(oauth2::reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            http,
            decoding_key: DecodingKey::from_secret(config.auth_jwt_secret.as_bytes()),
            audience: config.auth_jwt_audience.clone(),
        })
    }

    /// Builds the provider's authorize URL with a fresh random CSRF state.
    ///
    /// # Returns
    /// - `(String, String)` - The authorize URL and the CSRF state to store in session
    pub fn authorize_url(&self) -> (String, String) {
        let (url, csrf) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("email".to_string()))
            .url();

        (url.to_string(), csrf.secret().clone())
    }

    /// Exchanges an authorization code for an access token and validates it.
    ///
    /// # Returns
    /// - `Ok(AccessTokenClaims)` - Claims of the validated access token
    /// - `Err(Error::AuthError(AuthError::TokenExchangeFailed))` - Token endpoint rejected the code
    /// - `Err(Error::AuthError(AuthError::InvalidAccessToken))` - Token signature, audience or expiry invalid
    pub async fn exchange_code(&self, code: &str) -> Result<AccessTokenClaims, Error> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        self.validate_token(token.access_token().secret())
    }

    /// Validates an HS256 access token's signature, audience and expiry.
    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims, Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience.as_str()]);

        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::InvalidAccessToken(e.to_string()))?;

        Ok(data.claims)
    }
}

fn invalid_url(var: &str, err: oauth2::url::ParseError) -> Error {
    ConfigError::InvalidEnvValue {
        var: var.to_string(),
        reason: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use linkdex_test_utils::{fixtures::auth::mock_access_token, prelude::*};

    use crate::server::{
        error::{auth::AuthError, Error},
        util::test::{test_config, TestContextExt},
    };

    use super::AuthProvider;

    #[tokio::test]
    /// Expect claims from a token signed with the configured secret
    async fn validates_token() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let provider = test.app_state().auth;
        let token = mock_access_token("subject-1", "user@example.com", Duration::minutes(5))?;

        let claims = provider.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "subject-1");
        assert_eq!(claims.email.as_deref(), Some("user@example.com"));

        Ok(())
    }

    #[tokio::test]
    /// Expect InvalidAccessToken for an expired token
    async fn rejects_expired_token() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let provider = test.app_state().auth;
        let token = mock_access_token("subject-1", "user@example.com", Duration::hours(-1))?;

        let result = provider.validate_token(&token);

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::InvalidAccessToken(_)))
        ));

        Ok(())
    }

    #[tokio::test]
    /// Expect InvalidAccessToken when the audience differs
    async fn rejects_wrong_audience() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let mut config = test_config(&test.server_url());
        config.auth_jwt_audience = "service_role".to_string();
        let provider = AuthProvider::from_config(&config).unwrap();
        let token = mock_access_token("subject-1", "user@example.com", Duration::minutes(5))?;

        let result = provider.validate_token(&token);

        assert!(result.is_err());

        Ok(())
    }

    #[tokio::test]
    /// Expect the authorize URL to carry client ID, scope and the returned state
    async fn builds_authorize_url() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let provider = test.app_state().auth;

        let (url, state) = provider.authorize_url();

        assert!(url.contains(&format!("client_id={}", TEST_AUTH_CLIENT_ID)));
        assert!(url.contains("scope=email"));
        assert!(url.contains(&format!("state={}", state)));

        Ok(())
    }

    #[tokio::test]
    /// Expect claims after exchanging a code with the token endpoint
    async fn exchanges_code() -> Result<(), TestError> {
        let mut test = TestBuilder::new().build().await?;
        let mock = test
            .auth()
            .create_token_endpoint("subject-1", "user@example.com", 1)?;
        let provider = test.app_state().auth;

        let claims = provider.exchange_code("code").await.unwrap();

        assert_eq!(claims.sub, "subject-1");
        mock.assert();

        Ok(())
    }
}
