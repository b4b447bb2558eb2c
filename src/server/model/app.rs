//! Application state and site-wide settings.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    error::Error,
    provider::{ai::AiClient, auth::AuthProvider, email::Mailer, stripe::StripeClient},
};

/// Site-wide settings that services read but never change.
#[derive(Clone, Debug)]
pub struct SiteSettings {
    /// Public base URL without a trailing slash
    pub site_url: String,
    /// Site name used in emails and feeds
    pub site_name: String,
    /// Address receiving new submission notifications
    pub admin_email: String,
    /// Lowercased emails promoted to super admin on login
    pub super_admin_emails: Vec<String>,
    /// Days a newly approved free listing stays visible, forever when unset
    pub free_listing_days: Option<i64>,
    /// Days before expiry at which the owner is reminded
    pub reminder_days: i64,
}

impl SiteSettings {
    /// Copies the site-wide settings out of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            site_url: config.site_url.clone(),
            site_name: config.site_name.clone(),
            admin_email: config.admin_email.clone(),
            super_admin_emails: config.super_admin_emails.clone(),
            free_listing_days: config.free_listing_days,
            reminder_days: config.reminder_days,
        }
    }

    /// Absolute URL for a site-relative `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.site_url, path.trim_start_matches('/'))
    }

    /// Whether `email` belongs to a configured super admin, ignoring case.
    pub fn is_super_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.super_admin_emails.iter().any(|e| *e == email)
    }
}

/// State shared by every handler, job and scheduled task.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Auth provider client
    pub auth: AuthProvider,
    /// Payment API client
    pub stripe: StripeClient,
    /// Email API client
    pub mailer: Mailer,
    /// AI API client
    pub ai: AiClient,
    /// Site-wide settings
    pub settings: Arc<SiteSettings>,
}

impl AppState {
    /// Builds vendor clients from `config`.
    ///
    /// # Returns
    /// - `Ok(AppState)` - All clients constructed
    /// - `Err(Error::ConfigError)` - An auth provider URL is invalid
    /// - `Err(Error::ReqwestError)` - HTTP client failed to build
    pub fn from_config(db: DatabaseConnection, config: &Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("linkdex/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            db,
            auth: AuthProvider::from_config(config)?,
            stripe: StripeClient::new(http.clone(), config),
            mailer: Mailer::new(http.clone(), config),
            ai: AiClient::new(http, config),
            settings: Arc::new(SiteSettings::from_config(config)),
        })
    }
}
