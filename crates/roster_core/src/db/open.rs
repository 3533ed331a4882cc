//! Open/close for roster connections.
//!
//! Both entry points share `open_at`: connect, set pragmas, run
//! `initialize`, and log one `db_open` event with the outcome.

use super::migrations::initialize;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Opens (creating if needed) the roster file and makes it ready for use.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_at(Target::File(path.as_ref()))
}

/// Opens a throwaway in-memory roster; contents vanish on drop.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_at(Target::Memory)
}

/// Closes a connection, surfacing errors that `Drop` would swallow.
pub fn close_db(conn: Connection) -> DbResult<()> {
    conn.close().map_err(|(_, err)| {
        error!("event=db_close module=db status=error error={err}");
        err
    })?;
    info!("event=db_close module=db status=ok");
    Ok(())
}

fn open_at(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.label();

    let outcome = connect(&target).and_then(|mut conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        initialize(&mut conn)?;
        Ok(conn)
    });

    let elapsed_ms = started_at.elapsed().as_millis();
    match &outcome {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed_ms} error={err}"
        ),
    }
    outcome
}

fn connect(target: &Target<'_>) -> DbResult<Connection> {
    let conn = match target {
        Target::File(path) => Connection::open(path)?,
        Target::Memory => Connection::open_in_memory()?,
    };
    Ok(conn)
}
