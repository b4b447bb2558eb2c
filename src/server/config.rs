//! Environment configuration loaded at startup.

use std::str::FromStr;

use crate::server::error::config::ConfigError;

const DEFAULT_SITE_NAME: &str = "Linkdex";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_WORKERS: usize = 4;
const DEFAULT_JWT_AUDIENCE: &str = "authenticated";
const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";
const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_REMINDER_DAYS: i64 = 7;

/// Upper bound for `FREE_LISTING_DAYS`, ten years.
pub const MAX_FREE_LISTING_DAYS: i64 = 3650;
/// Upper bound for `REMINDER_DAYS`.
pub const MAX_REMINDER_DAYS: i64 = 365;

/// Application configuration read from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Database connection string
    pub database_url: String,
    /// Valkey connection string for sessions and the job queue
    pub valkey_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Number of job queue workers
    pub workers: usize,

    /// Public base URL of the site
    pub site_url: String,
    /// Site name used in emails and feeds
    pub site_name: String,
    /// Address receiving new submission notifications
    pub admin_email: String,

    /// OAuth2 client ID at the auth provider
    pub auth_client_id: String,
    /// OAuth2 client secret at the auth provider
    pub auth_client_secret: String,
    /// Authorize endpoint of the auth provider
    pub auth_authorize_url: String,
    /// Token endpoint of the auth provider
    pub auth_token_url: String,
    /// Redirect URL registered with the auth provider
    pub auth_callback_url: String,
    /// HS256 secret access tokens are signed with
    pub auth_jwt_secret: String,
    /// Audience claim required on access tokens
    pub auth_jwt_audience: String,
    /// Lowercased emails promoted to super admin on login
    pub super_admin_emails: Vec<String>,

    /// Base URL of the payment API
    pub stripe_api_url: String,
    /// Secret key of the payment API
    pub stripe_secret_key: String,
    /// Secret payment webhooks are signed with
    pub stripe_webhook_secret: String,
    /// Price ID of the pro plan
    pub stripe_price_pro: String,
    /// Price ID of the sponsor plan
    pub stripe_price_sponsor: String,

    /// Base URL of the email API
    pub email_api_url: String,
    /// Key of the email API
    pub email_api_key: String,
    /// Sender of transactional email
    pub email_from: String,

    /// Base URL of the AI chat completion API
    pub ai_api_url: String,
    /// AI features are disabled when no key is configured
    pub ai_api_key: Option<String>,
    /// Chat model name
    pub ai_model: String,

    /// Free listings never expire when unset
    pub free_listing_days: Option<i64>,
    /// Days before expiry at which the owner is reminded
    pub reminder_days: i64,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` to resolve variable names.
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            valkey_url: env.required("VALKEY_URL")?,
            bind_addr: env.or("BIND_ADDR", DEFAULT_BIND_ADDR),
            workers: env.parsed_or("WORKERS", DEFAULT_WORKERS)?,

            site_url: env.required("SITE_URL")?.trim_end_matches('/').to_string(),
            site_name: env.or("SITE_NAME", DEFAULT_SITE_NAME),
            admin_email: env.required("ADMIN_EMAIL")?,

            auth_client_id: env.required("AUTH_CLIENT_ID")?,
            auth_client_secret: env.required("AUTH_CLIENT_SECRET")?,
            auth_authorize_url: env.required("AUTH_AUTHORIZE_URL")?,
            auth_token_url: env.required("AUTH_TOKEN_URL")?,
            auth_callback_url: env.required("AUTH_CALLBACK_URL")?,
            auth_jwt_secret: env.required("AUTH_JWT_SECRET")?,
            auth_jwt_audience: env.or("AUTH_JWT_AUDIENCE", DEFAULT_JWT_AUDIENCE),
            super_admin_emails: env
                .optional("SUPER_ADMIN_EMAILS")
                .map(|value| {
                    value
                        .split(',')
                        .map(|email| email.trim().to_lowercase())
                        .filter(|email| !email.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            stripe_api_url: env.url_or("STRIPE_API_URL", DEFAULT_STRIPE_API_URL),
            stripe_secret_key: env.required("STRIPE_SECRET_KEY")?,
            stripe_webhook_secret: env.required("STRIPE_WEBHOOK_SECRET")?,
            stripe_price_pro: env.required("STRIPE_PRICE_PRO")?,
            stripe_price_sponsor: env.required("STRIPE_PRICE_SPONSOR")?,

            email_api_url: env.url_or("EMAIL_API_URL", DEFAULT_EMAIL_API_URL),
            email_api_key: env.required("EMAIL_API_KEY")?,
            email_from: env.required("EMAIL_FROM")?,

            ai_api_url: env.url_or("AI_API_URL", DEFAULT_AI_API_URL),
            ai_api_key: env.optional("AI_API_KEY"),
            ai_model: env.or("AI_MODEL", DEFAULT_AI_MODEL),

            free_listing_days: env
                .parsed_optional("FREE_LISTING_DAYS")?
                .map(|days| in_range("FREE_LISTING_DAYS", days, 1, MAX_FREE_LISTING_DAYS))
                .transpose()?,
            reminder_days: in_range(
                "REMINDER_DAYS",
                env.parsed_or("REMINDER_DAYS", DEFAULT_REMINDER_DAYS)?,
                1,
                MAX_REMINDER_DAYS,
            )?,
        })
    }
}

fn in_range(var: &str, value: i64, min: i64, max: i64) -> Result<i64, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!("{} is outside {}..={}", value, min, max),
        })
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, var: &str) -> Result<String, ConfigError> {
        self.optional(var)
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    }

    fn or(&self, var: &str, default: &str) -> String {
        self.optional(var).unwrap_or_else(|| default.to_string())
    }

    fn url_or(&self, var: &str, default: &str) -> String {
        self.or(var, default).trim_end_matches('/').to_string()
    }

    fn parsed_optional<T>(&self, var: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(var)
            .map(|value| {
                value.parse::<T>().map_err(|e| ConfigError::InvalidEnvValue {
                    var: var.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    fn parsed_or<T>(&self, var: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parsed_optional(var)?.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn required_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "postgres://localhost/linkdex"),
            ("VALKEY_URL", "redis://localhost:6379"),
            ("SITE_URL", "https://linkdex.example/"),
            ("ADMIN_EMAIL", "admin@linkdex.example"),
            ("AUTH_CLIENT_ID", "client"),
            ("AUTH_CLIENT_SECRET", "secret"),
            ("AUTH_AUTHORIZE_URL", "https://auth.example/authorize"),
            ("AUTH_TOKEN_URL", "https://auth.example/token"),
            ("AUTH_CALLBACK_URL", "https://linkdex.example/api/auth/callback"),
            ("AUTH_JWT_SECRET", "jwt-secret"),
            ("STRIPE_SECRET_KEY", "sk_test"),
            ("STRIPE_WEBHOOK_SECRET", "whsec"),
            ("STRIPE_PRICE_PRO", "price_pro"),
            ("STRIPE_PRICE_SPONSOR", "price_sponsor"),
            ("EMAIL_API_KEY", "re_key"),
            ("EMAIL_FROM", "Linkdex <hello@linkdex.example>"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| vars.get(key).map(|value| value.to_string()))
    }

    /// Expect defaults for every optional variable
    #[test]
    fn applies_defaults() {
        let config = load(&required_vars()).unwrap();

        assert_eq!(config.site_url, "https://linkdex.example");
        assert_eq!(config.site_name, "Linkdex");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.workers, 4);
        assert_eq!(config.auth_jwt_audience, "authenticated");
        assert_eq!(config.stripe_api_url, "https://api.stripe.com");
        assert_eq!(config.ai_api_key, None);
        assert_eq!(config.free_listing_days, None);
        assert_eq!(config.reminder_days, 7);
        assert!(config.super_admin_emails.is_empty());
    }

    /// Expect MissingEnvVar naming the absent variable
    #[test]
    fn fails_on_missing_required_var() {
        let mut vars = required_vars();
        vars.remove("STRIPE_WEBHOOK_SECRET");

        let result = load(&vars);

        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(var)) if var == "STRIPE_WEBHOOK_SECRET")
        );
    }

    /// Expect empty values to count as missing
    #[test]
    fn treats_empty_value_as_missing() {
        let mut vars = required_vars();
        vars.insert("EMAIL_API_KEY", "  ");

        assert!(matches!(load(&vars), Err(ConfigError::MissingEnvVar(_))));
    }

    /// Expect InvalidEnvValue for unparsable numbers
    #[test]
    fn fails_on_invalid_number() {
        let mut vars = required_vars();
        vars.insert("FREE_LISTING_DAYS", "thirty");

        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidEnvValue { var, .. }) if var == "FREE_LISTING_DAYS"
        ));
    }

    /// Expect day counts outside their allowed range to be rejected
    #[test]
    fn fails_on_out_of_range_days() {
        for (var, value) in [
            ("FREE_LISTING_DAYS", "200000000"),
            ("FREE_LISTING_DAYS", "0"),
            ("REMINDER_DAYS", "-3"),
            ("REMINDER_DAYS", "9223372036854775807"),
        ] {
            let mut vars = required_vars();
            vars.insert(var, value);

            assert!(matches!(
                load(&vars),
                Err(ConfigError::InvalidEnvValue { var: name, .. }) if name == var
            ));
        }
    }

    /// Expect super admin emails to be trimmed and lowercased
    #[test]
    fn parses_super_admin_emails() {
        let mut vars = required_vars();
        vars.insert("SUPER_ADMIN_EMAILS", " Owner@Example.com, ,ops@example.com");
        vars.insert("FREE_LISTING_DAYS", "30");
        vars.insert("AI_API_KEY", "sk-ai");

        let config = load(&vars).unwrap();

        assert_eq!(
            config.super_admin_emails,
            vec!["owner@example.com".to_string(), "ops@example.com".to_string()]
        );
        assert_eq!(config.free_listing_days, Some(30));
        assert_eq!(config.ai_api_key.as_deref(), Some("sk-ai"));
    }
}
