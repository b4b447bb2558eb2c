//! Utility functions for controller request handling.
//!
//! Reusable helpers used across controllers: CSRF state validation for the login flow
//! and session user retrieval with admin level checks for protected endpoints.

pub mod csrf;
pub mod get_user;
