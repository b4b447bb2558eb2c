//! Placeholder credentials and URLs used by every test configuration.
//!
//! None of these values are real secrets.

/// Public base URL of the site under test.
pub static TEST_SITE_URL: &str = "http://localhost:8080";

/// Site name shown in emails and feeds.
pub static TEST_SITE_NAME: &str = "Linkdex Test";

/// Address receiving new submission notifications.
pub static TEST_ADMIN_EMAIL: &str = "admin@example.com";

/// Sender address for transactional email.
pub static TEST_EMAIL_FROM: &str = "Linkdex <noreply@example.com>";

/// Auth provider OAuth2 client ID.
pub static TEST_AUTH_CLIENT_ID: &str = "auth_client_id";

/// Auth provider OAuth2 client secret.
pub static TEST_AUTH_CLIENT_SECRET: &str = "auth_client_secret";

/// OAuth2 redirect URL registered with the auth provider.
pub static TEST_CALLBACK_URL: &str = "http://localhost:8080/api/auth/callback";

/// HS256 secret the auth provider signs access tokens with.
pub static TEST_JWT_SECRET: &str = "test-jwt-secret-with-enough-length-for-hs256";

/// Audience claim expected on access tokens.
pub static TEST_JWT_AUDIENCE: &str = "authenticated";

/// Path of the auth provider token endpoint on the mock server.
pub static TEST_AUTH_TOKEN_PATH: &str = "/auth/v1/token";

/// Payment API secret key.
pub static TEST_STRIPE_SECRET_KEY: &str = "sk_test_linkdex";

/// Secret used to sign payment webhooks.
pub static TEST_STRIPE_WEBHOOK_SECRET: &str = "whsec_linkdex";

/// Price ID of the pro plan.
pub static TEST_PRICE_PRO: &str = "price_pro";

/// Price ID of the sponsor plan.
pub static TEST_PRICE_SPONSOR: &str = "price_sponsor";

/// Email API key.
pub static TEST_EMAIL_API_KEY: &str = "re_test_linkdex";

/// AI API key.
pub static TEST_AI_API_KEY: &str = "ai_test_linkdex";

/// Email addresses promoted to super admin on login.
pub static TEST_SUPER_ADMIN_EMAIL: &str = "owner@example.com";
