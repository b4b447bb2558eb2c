//! Utility functions shared by services, controllers and background jobs.
//!
//! Markup escaping, locale catalogs and negotiation, public page paths, slug generation, URL
//! normalization and listing visibility time calculations.

pub mod escape;
pub mod i18n;
pub mod path;
pub mod slug;
pub mod time;
pub mod url;
