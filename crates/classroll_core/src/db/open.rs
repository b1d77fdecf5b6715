//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by registry invariants.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, which backs the
//!   class delete gate with `ON DELETE RESTRICT`.
//! - Returned connections have migrations fully applied.
//! - Returned connections hold no student rows pointing at missing classes.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Creates the file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    verify_foreign_keys(conn)
}

/// Fails unless FK enforcement is active and no stored row violates it.
fn verify_foreign_keys(conn: &Connection) -> DbResult<()> {
    let enabled: bool = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if !enabled {
        return Err(DbError::ForeignKeysDisabled);
    }

    let mut stmt = conn.prepare("PRAGMA foreign_key_check;")?;
    let mut rows = stmt.query([])?;
    let mut count = 0_u64;
    while rows.next()?.is_some() {
        count += 1;
    }
    if count > 0 {
        return Err(DbError::DanglingReferences { count });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::verify_foreign_keys;
    use crate::db::migrations::apply_migrations;
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn rejects_connection_without_foreign_keys() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
        apply_migrations(&mut conn).unwrap();

        assert!(matches!(
            verify_foreign_keys(&conn),
            Err(DbError::ForeignKeysDisabled)
        ));
    }

    #[test]
    fn rejects_students_of_missing_classes() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO students (id, name, roll_no, mobile_no, class_id, created_at, updated_at)
             VALUES ('s1', 'Ann Lee', 'R001', '9876543210', 'gone', 1, 1);",
            [],
        )
        .unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();

        assert!(matches!(
            verify_foreign_keys(&conn),
            Err(DbError::DanglingReferences { count: 1 })
        ));
    }

    #[test]
    fn accepts_consistent_store() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        apply_migrations(&mut conn).unwrap();

        verify_foreign_keys(&conn).unwrap();
    }
}
