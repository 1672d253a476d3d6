//! Client side of the task board.
//!
//! # Responsibility
//! - `TaskApi`: typed async calls for every `/api/tasks` operation.
//! - `TaskBoard`: the single view state (task list, form draft, load phase)
//!   driven by user actions.
//!
//! # Invariants
//! - Local state changes only after a successful response.
//! - Failures are logged and returned as values, never panics.

pub mod api;
pub mod board;

pub use api::{ClientError, ClientResult, TaskApi, TaskBackend, API_URL_VAR, DEFAULT_API_URL};
pub use board::{Draft, LoadPhase, TaskBoard};
