//! Schema registry and idempotent initializer for the roster database.
//!
//! # Responsibility
//! - Register schema steps in strictly increasing order.
//! - Apply pending steps atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Every step is written with `IF NOT EXISTS`, so databases created
//!   before versioning existed (version 0 with a `people` table) upgrade
//!   cleanly.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_people_name_index.sql"),
    },
];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Ensures the `people` table (and its supporting index) exists.
///
/// Safe to call on every startup: a database already at the latest
/// version is left untouched.
///
/// # Errors
/// - `DbError::SchemaTooNew` when the file was written by a
///   newer binary.
/// - `DbError::Engine` on engine failures.
pub fn initialize(conn: &mut Connection) -> DbResult<()> {
    if current_user_version(conn)? == latest_version() {
        debug!("event=db_initialize module=db status=skipped reason=up_to_date");
        return Ok(());
    }

    // Immediate lock so two handles racing on a fresh file cannot both
    // read version 0 and then deadlock on the write upgrade.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current_version = current_user_version(&tx)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::SchemaTooNew {
            found: current_version,
            supported: latest,
        });
    }

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_initialize module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
