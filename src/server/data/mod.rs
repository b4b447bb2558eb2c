//! Data access layer repositories.
//!
//! Repositories are generic over `ConnectionTrait` so the same queries run against a
//! plain connection or inside a transaction.

pub mod category;
pub mod listing;
pub mod profile;
pub mod stripe_event;
pub mod subscription;
