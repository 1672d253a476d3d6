//! Ordered schema steps for the `tasks` table.
//!
//! Each step commits in its own transaction together with its
//! `user_version` bump, so a failing step leaves the previous schema intact.

use crate::db::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

// Versions strictly increase.
const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "create_tasks",
    sql: include_str!("0001_init.sql"),
}];

/// Highest schema version this build knows how to produce.
pub fn latest_schema_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

/// Brings `conn` up to [`latest_schema_version`] and returns the resulting version.
pub fn apply_migrations(conn: &mut Connection) -> StoreResult<u32> {
    let found = schema_version(conn)?;
    let supported = latest_schema_version();
    if found > supported {
        return Err(StoreError::SchemaTooNew { found, supported });
    }

    for step in STEPS.iter().filter(|step| step.version > found) {
        if let Err(err) = run_step(conn, step) {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                step.version, step.name, err
            );
            return Err(err);
        }
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }

    Ok(supported)
}

fn run_step(conn: &mut Connection, step: &SchemaStep) -> StoreResult<()> {
    let failed = |source: rusqlite::Error| StoreError::Migration {
        version: step.version,
        name: step.name,
        source,
    };

    let tx = conn.transaction().map_err(failed)?;
    tx.execute_batch(step.sql).map_err(failed)?;
    tx.pragma_update(None, "user_version", step.version)
        .map_err(failed)?;
    tx.commit().map_err(failed)
}
