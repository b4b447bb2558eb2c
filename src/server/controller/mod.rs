//! HTTP controller endpoints for the Linkdex web API.
//!
//! Axum handlers for authentication, listings, categories, moderation, billing, AI helpers,
//! message catalogs and feeds. Controllers resolve the session user, call into services and
//! return JSON responses; every handler is documented for OpenAPI with utoipa.

pub mod admin;
pub mod ai;
pub mod auth;
pub mod billing;
pub mod category;
pub mod feed;
pub mod health;
pub mod i18n;
pub mod listing;
pub mod user;
pub mod util;
