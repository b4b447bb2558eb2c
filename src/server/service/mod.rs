//! Service layer for business logic and orchestration.
//!
//! Services coordinate repositories and vendor providers: sign-in, listing submission
//! and moderation, billing and webhook reconciliation, AI helpers, feeds and scheduled
//! reminders.

pub mod ai;
pub mod auth;
pub mod billing;
pub mod category;
pub mod feed;
pub mod listing;
pub mod moderation;
pub mod notification;
pub mod reminder;
pub mod retry;
pub mod user;
