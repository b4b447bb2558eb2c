//! Session data models.
//!
//! Type-safe wrappers around tower-sessions keys. Each submodule owns one piece of session
//! state with methods for inserting, retrieving and removing it.

pub mod auth;
pub mod user;
