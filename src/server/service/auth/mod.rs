//! Authentication service layer.
//!
//! Login URL generation and callback processing for the hosted auth provider's OAuth2
//! authorization code flow.

pub mod callback;
pub mod login;
