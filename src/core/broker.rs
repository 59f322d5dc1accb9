use crate::core::db;
use crate::core::error::SoulError;
use rusqlite::{Connection, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// The DB Broker is the "Thin Waist" for state access.
///
/// Every operation gets its own connection and runs inside exactly one SQLite
/// transaction. Writes take the write lock up front (`BEGIN IMMEDIATE`), so two
/// writers never interleave their read-modify-write steps. Reads run in a
/// deferred transaction, which pins one WAL snapshot for the whole closure.
#[derive(Debug, Clone)]
pub struct DbBroker {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl DbBroker {
    pub fn new(db_path: &Path, busy_timeout: Duration) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            busy_timeout,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a closure against a consistent read snapshot.
    pub fn with_read<F, R>(&self, op_name: &str, f: F) -> Result<R, SoulError>
    where
        F: FnOnce(&Connection) -> Result<R, SoulError>,
    {
        let started = Instant::now();
        let mut conn = db::db_connect(&self.db_path, self.busy_timeout)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;

        let result = f(&*tx);
        // Nothing to persist; dropping the guard ends the snapshot.
        drop(tx);

        self.log_event(op_name, "read", started, result.is_ok());
        result
    }

    /// Execute a closure inside a write transaction. Commits only if the closure succeeds;
    /// an error or a panic rolls back every statement it issued.
    pub fn with_write<F, R>(&self, op_name: &str, f: F) -> Result<R, SoulError>
    where
        F: FnOnce(&Connection) -> Result<R, SoulError>,
    {
        let started = Instant::now();
        let mut conn = db::db_connect(&self.db_path, self.busy_timeout)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = match f(&*tx) {
            Ok(value) => tx.commit().map(|_| value).map_err(SoulError::StorageError),
            Err(e) => Err(e),
        };

        self.log_event(op_name, "write", started, result.is_ok());
        result
    }

    fn log_event(&self, op: &str, mode: &str, started: Instant, ok: bool) {
        let outcome = if ok { "success" } else { "error" };
        tracing::debug!(
            target: "soulstore::broker",
            op,
            mode,
            outcome,
            elapsed_us = started.elapsed().as_micros() as u64,
            "store operation finished"
        );
    }
}
