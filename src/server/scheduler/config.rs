//! Cron schedules.

/// Expiry reminder scheduling
pub mod reminder {
    /// Cron expression for queueing expiry reminders
    /// Runs daily at 08:00 UTC
    pub const CRON_EXPRESSION: &str = "0 0 8 * * *";
}

/// Processed webhook event retention
pub mod stripe_event {
    /// Cron expression for purging old webhook event records
    /// Runs daily at 03:30 UTC
    pub const CRON_EXPRESSION: &str = "0 30 3 * * *";
}
