//! Store handle and the namespaced record layer.
//!
//! A [`Store`] is an explicitly owned handle to one soul database. It holds no
//! open connection: each operation borrows a fresh one through the
//! [`DbBroker`], so a `Store` can be cloned or shared behind an `Arc` across
//! threads and all coordination happens in SQLite transactions.
//!
//! The free functions below operate on a `&Connection` that is already inside
//! a broker transaction. Subsystems compose them to build their operations.

use crate::core::broker::DbBroker;
use crate::core::config::StoreConfig;
use crate::core::db;
use crate::core::error::SoulError;
use crate::core::schemas;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Params, Row, params};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Entity namespaces in the `records` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Artifact,
    Principle,
    Axiom,
    GovernorSet,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Artifact,
        RecordKind::Principle,
        RecordKind::Axiom,
        RecordKind::GovernorSet,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Artifact => "artifact",
            RecordKind::Principle => "principle",
            RecordKind::Axiom => "axiom",
            RecordKind::GovernorSet => "governor",
        }
    }

    /// `<type>:<id>`
    pub fn key(self, id: &str) -> String {
        format!("{}:{}", self.prefix(), id)
    }

    /// Half-open key range covering every record of this kind.
    fn range(self) -> (String, String) {
        (format!("{}:", self.prefix()), format!("{};", self.prefix()))
    }
}

/// Point-in-time record counts per entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub artifacts: usize,
    pub principles: usize,
    pub axioms: usize,
    pub governor_sets: usize,
}

#[derive(Debug, Clone)]
pub struct Store {
    /// Directory holding the database file.
    pub root: PathBuf,
    config: StoreConfig,
    broker: DbBroker,
}

impl Store {
    /// Open (creating if needed) the database described by `config`, switch it to WAL,
    /// and declare the table and secondary indexes.
    pub fn open(config: &StoreConfig) -> Result<Self, SoulError> {
        fs::create_dir_all(&config.data_dir).map_err(SoulError::IoError)?;

        let db_path = config.db_path();
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let conn = db::db_connect(&db_path, busy_timeout)?;
        db::enable_wal(&conn)?;
        db::initialize_soul_db(&conn)?;

        tracing::info!(
            target: "soulstore::store",
            db = %db_path.display(),
            "soul store opened"
        );

        Ok(Self {
            root: config.data_dir.clone(),
            config: config.clone(),
            broker: DbBroker::new(&db_path, busy_timeout),
        })
    }

    /// Open a store in `root` with default settings.
    pub fn open_at(root: &Path) -> Result<Self, SoulError> {
        Self::open(&StoreConfig::at(root))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn broker(&self) -> &DbBroker {
        &self.broker
    }

    pub fn db_path(&self) -> &Path {
        self.broker.db_path()
    }

    /// Counts of every entity type, taken from one snapshot.
    pub fn stats(&self) -> Result<StoreStats, SoulError> {
        self.broker.with_read("store.stats", |conn| {
            Ok(StoreStats {
                artifacts: count_records(conn, RecordKind::Artifact)?,
                principles: count_records(conn, RecordKind::Principle)?,
                axioms: count_records(conn, RecordKind::Axiom)?,
                governor_sets: count_records(conn, RecordKind::GovernorSet)?,
            })
        })
    }

    /// Release the store. Folds the WAL back into the main database file.
    pub fn close(self) -> Result<(), SoulError> {
        let conn = db::db_connect(self.db_path(), Duration::from_millis(self.config.busy_timeout_ms))?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE);", [], |_| Ok(()))?;
        tracing::info!(
            target: "soulstore::store",
            db = %self.db_path().display(),
            "soul store closed"
        );
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, SoulError> {
    serde_json::to_string(value).map_err(SoulError::SerializationError)
}

/// Stored payloads are expected to be TEXT; anything else decodes as an empty document.
fn payload(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    })
}

/// Upsert `value` under `<kind>:<id>`.
pub fn put_record<T: Serialize>(
    conn: &Connection,
    kind: RecordKind,
    id: &str,
    value: &T,
) -> Result<(), SoulError> {
    let data = encode(value)?;
    conn.execute(schemas::UPSERT_RECORD, params![kind.key(id), data])?;
    Ok(())
}

/// Insert `value` under `<kind>:<id>`, refusing to replace an existing record.
pub fn insert_record<T: Serialize>(
    conn: &Connection,
    kind: RecordKind,
    id: &str,
    value: &T,
) -> Result<(), SoulError> {
    if record_exists(conn, kind, id)? {
        return Err(SoulError::ValidationError(format!(
            "{} '{}' already exists",
            kind.prefix(),
            id
        )));
    }
    let data = encode(value)?;
    conn.execute(schemas::INSERT_RECORD, params![kind.key(id), data])?;
    Ok(())
}

/// Fetch and decode one record. `Ok(None)` when absent; `DecodeError` when the bytes are corrupt.
pub fn get_record<T: DeserializeOwned>(
    conn: &Connection,
    kind: RecordKind,
    id: &str,
) -> Result<Option<T>, SoulError> {
    let key = kind.key(id);
    let raw = conn
        .query_row(schemas::SELECT_RECORD, params![key], |row| payload(row, 0))
        .optional()?;

    match raw {
        None => Ok(None),
        Some(value) => serde_json::from_str(&value)
            .map(Some)
            .map_err(|source| SoulError::DecodeError { key, source }),
    }
}

/// Like [`get_record`], but absence is a `NotFound` error.
pub fn require_record<T: DeserializeOwned>(
    conn: &Connection,
    kind: RecordKind,
    id: &str,
) -> Result<T, SoulError> {
    get_record(conn, kind, id)?.ok_or_else(|| SoulError::NotFound(kind.key(id)))
}

pub fn record_exists(conn: &Connection, kind: RecordKind, id: &str) -> Result<bool, SoulError> {
    let exists: bool = conn.query_row(schemas::RECORD_EXISTS, params![kind.key(id)], |row| row.get(0))?;
    Ok(exists)
}

/// Every record of `kind`, ascending by key.
pub fn scan_records<T: DeserializeOwned>(
    conn: &Connection,
    kind: RecordKind,
) -> Result<Vec<T>, SoulError> {
    let (start, end) = kind.range();
    scan_query(conn, schemas::SCAN_RANGE, params![start, end])
}

/// Run a `SELECT key, value ...` query and decode each row.
///
/// Rows that fail to decode are skipped with a warning so one corrupt record
/// cannot hide the rest of the data set.
pub fn scan_query<T: DeserializeOwned, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>, SoulError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| Ok((row.get::<_, String>(0)?, payload(row, 1)?)))?;

    let mut results = Vec::new();
    for r in rows {
        let (key, value) = r?;
        match serde_json::from_str::<T>(&value) {
            Ok(record) => results.push(record),
            Err(e) => {
                tracing::warn!(
                    target: "soulstore::store",
                    key = %key,
                    error = %e,
                    "skipping undecodable record"
                );
            }
        }
    }
    Ok(results)
}

pub fn count_records(conn: &Connection, kind: RecordKind) -> Result<usize, SoulError> {
    let (start, end) = kind.range();
    let count: i64 = conn.query_row(schemas::COUNT_RANGE, params![start, end], |row| row.get(0))?;
    Ok(count as usize)
}
