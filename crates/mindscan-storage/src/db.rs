use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::StorageError;

const MIGRATIONS: [(i64, &str); 2] = [
    (1, include_str!("../migrations/001_initial.sql")),
    (2, include_str!("../migrations/002_crisis_records.sql")),
];

pub fn open_database(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

pub fn open_memory_database() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = current_version(conn);
    for (version, sql) in MIGRATIONS {
        if version > current {
            info!(version, "running storage migration");
            conn.execute_batch(sql).map_err(|e| StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }
    Ok(())
}

/// 0 when the schema has never been created.
pub fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_at_latest_version() {
        let conn = open_memory_database().unwrap();
        assert_eq!(current_version(&conn), 2);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = open_memory_database().unwrap();
        run_migrations(&conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(fk, 1);
    }
}
