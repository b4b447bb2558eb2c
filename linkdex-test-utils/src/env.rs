//! Environment variables every test configuration is loaded from.

use crate::constant::*;

/// Value of the environment variable `key` in a test environment whose vendor APIs all live
/// at `server_url`.
///
/// Pass to `Config::from_lookup` in place of the process environment. Unknown keys yield
/// `None` so optional settings fall back to their defaults.
pub fn test_env_var(key: &str, server_url: &str) -> Option<String> {
    let value = match key {
        "DATABASE_URL" => "sqlite::memory:".to_string(),
        "VALKEY_URL" => "redis://127.0.0.1:6379".to_string(),
        "SITE_URL" => TEST_SITE_URL.to_string(),
        "SITE_NAME" => TEST_SITE_NAME.to_string(),
        "ADMIN_EMAIL" => TEST_ADMIN_EMAIL.to_string(),
        "AUTH_CLIENT_ID" => TEST_AUTH_CLIENT_ID.to_string(),
        "AUTH_CLIENT_SECRET" => TEST_AUTH_CLIENT_SECRET.to_string(),
        "AUTH_AUTHORIZE_URL" => format!("{}/auth/v1/authorize", server_url),
        "AUTH_TOKEN_URL" => format!("{}{}", server_url, TEST_AUTH_TOKEN_PATH),
        "AUTH_CALLBACK_URL" => TEST_CALLBACK_URL.to_string(),
        "AUTH_JWT_SECRET" => TEST_JWT_SECRET.to_string(),
        "AUTH_JWT_AUDIENCE" => TEST_JWT_AUDIENCE.to_string(),
        "SUPER_ADMIN_EMAILS" => TEST_SUPER_ADMIN_EMAIL.to_string(),
        "STRIPE_API_URL" | "EMAIL_API_URL" | "AI_API_URL" => server_url.to_string(),
        "STRIPE_SECRET_KEY" => TEST_STRIPE_SECRET_KEY.to_string(),
        "STRIPE_WEBHOOK_SECRET" => TEST_STRIPE_WEBHOOK_SECRET.to_string(),
        "STRIPE_PRICE_PRO" => TEST_PRICE_PRO.to_string(),
        "STRIPE_PRICE_SPONSOR" => TEST_PRICE_SPONSOR.to_string(),
        "EMAIL_API_KEY" => TEST_EMAIL_API_KEY.to_string(),
        "EMAIL_FROM" => TEST_EMAIL_FROM.to_string(),
        "AI_API_KEY" => TEST_AI_API_KEY.to_string(),
        _ => return None,
    };

    Some(value)
}
