//! Shared store handle injected into request handlers.
//!
//! # Responsibility
//! - Own the single SQLite connection opened at startup.
//! - Run service calls on the blocking pool and hand results back to async code.
//!
//! # Invariants
//! - One statement sequence at a time per connection (mutex-guarded).
//! - Cloning the handle shares the same connection.

use crate::error::ApiError;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;
use taskboard_core::db::{open_database, StoreResult};
use taskboard_core::{DatabaseLocation, RepoResult, SqliteTaskRepository, TaskService};

/// Cheap-to-clone handle over the task database.
#[derive(Clone)]
pub struct TaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl TaskStore {
    /// Opens (and migrates) the database at `location`.
    pub fn open(location: &DatabaseLocation) -> StoreResult<Self> {
        open_database(location).map(Self::from_connection)
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` against a `TaskService` on the blocking pool.
    ///
    /// # Errors
    /// - Service errors are mapped through `ApiError::from`.
    /// - A panicked or cancelled blocking task becomes `ApiError::Internal`.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let joined = tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let service = TaskService::new(SqliteTaskRepository::new(&guard));
            op(&service)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => Err(ApiError::Internal(format!("store task failed: {err}"))),
        }
    }
}
