//! Locale and message catalog bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Supported locales and the locale negotiated for the request
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LocalesDto {
    /// Locale used when nothing else matches
    pub default_locale: String,
    /// Every supported locale
    pub locales: Vec<String>,
    /// Locale picked from `?locale=` or `Accept-Language`
    pub locale: String,
}

/// Message catalog for one locale, English entries filling any gaps
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessagesDto {
    /// Locale of the catalog
    pub locale: String,
    /// Messages keyed by message ID
    pub messages: BTreeMap<String, String>,
}

/// Locale preference of a request
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct LocaleQuery {
    /// Explicit locale preference, overriding `Accept-Language`
    pub locale: Option<String>,
}
