//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds the shared resources needed by
//! the read-only policy API. The state is initialized once during startup and then
//! cloned for each request handler through Axum's state extraction.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::server::service::catalog::CommandCatalog;

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `Arc<CommandCatalog>` is a reference-counted pointer
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Command catalog shared with the Discord bot.
    pub catalog: Arc<CommandCatalog>,

    /// Upper bound for a single policy store call.
    pub store_timeout: Duration,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `catalog` - Command catalog built at startup
    /// - `store_timeout` - Timeout for policy store calls
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(db: DatabaseConnection, catalog: Arc<CommandCatalog>, store_timeout: Duration) -> Self {
        Self {
            db,
            catalog,
            store_timeout,
        }
    }
}
