//! Domain model for task records.
//!
//! # Responsibility
//! - Define the canonical task record shared by service, HTTP and client layers.
//! - Own field-level validation so every layer enforces the same rules.
//!
//! # Invariants
//! - Every task is identified by a stable, non-nil `TaskId`.
//! - A task title is never empty after trimming.

pub mod task;
