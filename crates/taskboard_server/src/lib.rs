//! HTTP surface of the task store.
//!
//! # Responsibility
//! - Map the `/api/tasks` JSON contract onto `TaskService` operations.
//! - Translate core errors into 400/404/500 responses with a `{message}` body.
//!
//! # Invariants
//! - Handlers receive the store through router state, never through globals.
//! - SQLite work runs on the blocking pool, never on async worker threads.

pub mod error;
pub mod handlers;
pub mod server;
pub mod store;

pub use error::{ApiError, MessageBody};
pub use server::{router, TaskServer};
pub use store::TaskStore;
