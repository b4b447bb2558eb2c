//! Request and response bodies exchanged over the HTTP API.

pub mod ai;
pub mod api;
pub mod billing;
pub mod category;
pub mod i18n;
pub mod listing;
pub mod user;
