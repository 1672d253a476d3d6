//! Task store persistence: connection bootstrap and schema steps.
//!
//! # Invariants
//! - Schema state lives in `PRAGMA user_version`.
//! - No task row is touched through a connection that has not been migrated.

mod error;
pub mod migrations;
mod open;

pub use error::{StoreError, StoreResult};
pub use open::{open_database, open_db, open_db_in_memory};
