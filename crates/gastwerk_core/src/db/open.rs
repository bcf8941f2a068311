//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by engine behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have a busy timeout so concurrent booking writers
//!   queue instead of failing immediately.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            log_open_error("file", started_at, "db_open_failed", &err);
            return Err(err.into());
        }
    };

    finish_open("file", started_at, conn)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// Used by tests and short-lived tooling; every call yields an independent
/// empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            log_open_error("memory", started_at, "db_open_failed", &err);
            return Err(err.into());
        }
    };

    finish_open("memory", started_at, conn)
}

fn finish_open(mode: &str, started_at: Instant, mut conn: Connection) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn log_open_error(mode: &str, started_at: Instant, code: &str, err: &rusqlite::Error) {
    error!(
        "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
        mode,
        started_at.elapsed().as_millis(),
        code,
        err
    );
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    // Concurrent admission requests from separate connections serialize on
    // the write lock; give losers time to queue instead of erroring.
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
