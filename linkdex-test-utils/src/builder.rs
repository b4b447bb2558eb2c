//! Declarative test setup.
//!
//! Configuration methods queue work which is executed by [`TestBuilder::build`]:
//! tables first, then database fixtures, then mock endpoints.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

/// Builder for a [`TestContext`].
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_app_tables: bool,

    categories: Vec<String>,

    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
    email_endpoints: Vec<usize>,
}

impl TestBuilder {
    /// Create a builder with no tables, fixtures or endpoints.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_app_tables: false,
            categories: Vec::new(),
            mock_builders: Vec::new(),
            email_endpoints: Vec::new(),
        }
    }

    /// Create every application table: profile, category, listing, subscription and
    /// stripe_event, in foreign key order.
    pub fn with_tables(mut self) -> Self {
        self.include_app_tables = true;
        self
    }

    /// Create a single table for `entity`.
    ///
    /// Useful for tests that need a schema missing its dependents, for example
    /// `with_table(Profile)` without listings.
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert a category whose name is derived from `slug`.
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.categories.push(slug.into());
        self
    }

    /// Mock the email API send endpoint, expecting `expected_requests` calls.
    pub fn with_email_endpoint(mut self, expected_requests: usize) -> Self {
        self.email_endpoints.push(expected_requests);
        self
    }

    /// Add a custom mock endpoint.
    ///
    /// Custom endpoints are created before the shortcut endpoints so tests can queue
    /// an error response ahead of a success response on the same path.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Environment ready for use
    /// - `Err(TestError::DbErr)` - Table creation or fixture insertion failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        let mut all_tables = Vec::new();

        if self.include_app_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::Profile),
                schema.create_table_from_entity(entity::prelude::Category),
                schema.create_table_from_entity(entity::prelude::Listing),
                schema.create_table_from_entity(entity::prelude::Subscription),
                schema.create_table_from_entity(entity::prelude::StripeEvent),
            ]);
        }

        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        for slug in self.categories {
            setup.listing().insert_category(&slug).await?;
        }

        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for expected in self.email_endpoints {
            mocks.push(setup.mail().create_email_endpoint(expected));
        }

        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
