//! Cron scheduling for periodic background work.
//!
//! A daily job queues expiry reminder emails for listings about to stop being visible, and
//! a second daily job purges old processed webhook event records.

pub mod config;
pub mod cron;
pub mod reminder;
