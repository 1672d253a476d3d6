//! Core domain logic for Taskboard.
//! This crate is the single source of truth for task invariants and storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DatabaseLocation, ServerConfig};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogSink,
};
pub use model::task::{parse_task_id, NewTask, Task, TaskId, TaskPatch, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
