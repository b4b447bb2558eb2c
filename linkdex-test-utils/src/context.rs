//! Test context returned by [`TestBuilder::build`](crate::TestBuilder::build).

use std::sync::Arc;

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tower_sessions::{MemoryStore, Session};

use crate::error::TestError;

/// Environment a single test runs against.
///
/// Holds an in-memory SQLite database, a session backed by an in-memory store and a
/// mock HTTP server shared by every vendor API. Application state is built from
/// [`TestContext::server_url`] so that all outbound requests land on the mock server.
///
/// ```ignore
/// let mut test = TestBuilder::new().with_tables().build().await?;
/// let profile = test.user().insert_profile("user@example.com").await?;
/// test.mail().create_email_endpoint(1);
/// ```
pub struct TestContext {
    /// Connection to the in-memory SQLite database
    pub db: DatabaseConnection,
    /// Session for authentication flows
    pub session: Session,

    /// Mock server for every vendor endpoint
    pub(crate) server: ServerGuard,
    /// Mocks created by the builder, kept alive for the test's duration
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Create a context with an empty database and no mock endpoints.
    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            session,
            server,
            mocks: Vec::new(),
        })
    }

    /// Base URL of the mock server, used as the base URL of every vendor API.
    pub fn server_url(&self) -> String {
        self.server.url()
    }

    /// Execute CREATE TABLE statements in order.
    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Assert every mock created by the builder was called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
