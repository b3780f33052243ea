use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::GuildCommandPolicy;
///
/// let test = TestBuilder::new()
///     .with_table(GuildCommandPolicy)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
    /// Pool size of a file-backed database; `None` uses in-memory SQLite.
    file_connections: Option<u32>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            file_connections: None,
        }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables should be added in dependency order (tables with foreign
    /// keys after the tables they reference).
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity implementing `EntityTrait` to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds both command policy tables in dependency order.
    ///
    /// - GuildCommandPolicy
    /// - ChannelCommandRule
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_policy_tables(self) -> Self {
        self.with_table(GuildCommandPolicy)
            .with_table(ChannelCommandRule)
    }

    /// Uses a temporary SQLite file shared by a pool of `connections` connections.
    ///
    /// In-memory SQLite is a single connection, so transactions issued concurrently
    /// run one after another. A file-backed pool lets them overlap the way they do
    /// against the production database. The file is removed with the test context.
    ///
    /// # Arguments
    /// - `connections` - Number of pooled connections kept open
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_file_database(mut self, connections: u32) -> Self {
        self.file_connections = Some(connections);
        self
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized test context with database and tables ready
    /// - `Err(TestError::Database)` - Failed to connect to database or create tables
    /// - `Err(TestError::Io)` - Failed to create the temporary database directory
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        if let Some(connections) = self.file_connections {
            setup.file_database(connections).await?;
        }

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}
