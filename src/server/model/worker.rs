//! Worker job definitions for background task processing.
//!
//! Jobs are serialized to JSON for Redis storage by apalis and deserialized by the worker
//! handler. Each variant carries only the IDs needed to reload state from the database.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Background job types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum WorkerJob {
    /// Email the owner of a listing whose visibility ends soon.
    ///
    /// The handler re-checks eligibility since the listing may have been renewed or the
    /// reminder already sent between enqueueing and processing.
    SendExpiryReminder {
        /// Listing ID to remind the owner about.
        listing_id: i32,
    },
}

impl fmt::Display for WorkerJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerJob::SendExpiryReminder { listing_id } => {
                write!(f, "expiry reminder for listing ID {}", listing_id)
            }
        }
    }
}
