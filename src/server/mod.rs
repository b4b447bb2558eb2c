//! Server application core modules.
//!
//! This module contains all server-side functionality for Linkdex: HTTP routing, sessions
//! and authentication against the hosted auth provider, listing and category persistence,
//! moderation, subscription billing, transactional email, AI helpers, localized message
//! catalogs, feeds, background workers and cron scheduling.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod provider;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
pub mod worker;
