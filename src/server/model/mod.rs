//! Server application models and type definitions.
//!
//! Application state shared by handlers, database model aliases, session wrappers and
//! worker job definitions.

pub mod app;
pub mod db;
pub mod session;
pub mod worker;
