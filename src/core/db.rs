use crate::core::error::SoulError;
use crate::core::schemas;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub fn db_connect(db_path: &Path, busy_timeout: Duration) -> Result<Connection, SoulError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(busy_timeout)
        .map_err(SoulError::StorageError)?;
    Ok(conn)
}

/// Switch the database file to WAL. The mode is persistent, so this runs once per open.
pub fn enable_wal(conn: &Connection) -> Result<(), SoulError> {
    let mode: String = conn.query_row("PRAGMA journal_mode=WAL;", [], |row| row.get(0))?;
    if !mode.eq_ignore_ascii_case("wal") {
        return Err(SoulError::DatabaseInitializationError(format!(
            "journal_mode is '{}', expected 'wal'",
            mode
        )));
    }
    Ok(())
}

pub fn initialize_soul_db(conn: &Connection) -> Result<(), SoulError> {
    conn.execute(schemas::SOUL_DB_SCHEMA_RECORDS, [])
        .map_err(|e| SoulError::DatabaseInitializationError(format!("records table: {}", e)))?;

    for (name, ddl) in schemas::SOUL_DB_INDEXES {
        conn.execute(ddl, [])
            .map_err(|e| SoulError::DatabaseInitializationError(format!("index {}: {}", name, e)))?;
    }

    Ok(())
}

/// Names of the secondary indexes present on the `records` table.
pub fn declared_indexes(conn: &Connection) -> Result<Vec<String>, SoulError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'records' AND sql IS NOT NULL ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut names = Vec::new();
    for r in rows {
        names.push(r?);
    }
    Ok(names)
}
