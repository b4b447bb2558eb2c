//! Fixture helpers used during test execution.
//!
//! - `ai` - AI API and fetched page mock endpoints
//! - `auth` - Signed access tokens and the auth provider token endpoint
//! - `billing` - Payment API endpoints and signed webhook payloads
//! - `listing` - Category, listing and subscription records
//! - `mail` - Email API endpoints
//! - `user` - Profile records

pub mod ai;
pub mod auth;
pub mod billing;
pub mod listing;
pub mod mail;
pub mod user;
