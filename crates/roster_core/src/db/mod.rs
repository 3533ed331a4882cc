//! Roster database: connection lifecycle and schema setup.
//!
//! # Invariants
//! - A connection handed out by this module already has the `people` table.
//! - Schema version lives in `PRAGMA user_version`; files newer than this
//!   binary are refused rather than guessed at.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::initialize;
pub use open::{close_db, open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, initializing or closing the roster database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite engine or I/O fault.
    Engine(rusqlite::Error),
    /// File was written by a newer build (`found > supported`).
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "roster database is at schema v{found}, this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Engine(value)
    }
}
