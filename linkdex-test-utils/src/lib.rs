//! Shared test harness for the Linkdex workspace.
//!
//! Tests configure an environment with [`TestBuilder`] (tables, fixtures, mock vendor
//! endpoints) and then work against the returned [`TestContext`], which owns an
//! in-memory SQLite database, an in-memory session and a `mockito` server that stands
//! in for the auth provider, payment API, email API and AI API.

pub mod builder;
pub mod constant;
pub mod context;
pub mod env;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::*,
        env::test_env_var,
        fixtures::{billing::factory as billing_factory, listing::factory as listing_factory},
        TestBuilder, TestContext, TestError,
    };
}
