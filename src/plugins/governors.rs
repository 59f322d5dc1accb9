//! Governor sets: versioned snapshots of axioms and principles, moved through
//! `draft -> pending -> approved -> active` and finally `superseded`.
//!
//! Each workflow step is one write transaction. `activate` is the only step
//! touching two records; it supersedes the previous active set in the same
//! transaction, so readers see exactly one active set before and after.

use crate::core::error::SoulError;
use crate::core::schemas;
use crate::core::store::{self, RecordKind, Store};
use crate::core::time;
use crate::soul::lifecycle;
use crate::soul::model::{Axiom, GovernorSet, Principle, SetStatus};
use rusqlite::Connection;

fn next_version(conn: &Connection) -> Result<u32, SoulError> {
    let current: i64 = conn.query_row(schemas::MAX_GOVERNOR_VERSION, [], |row| row.get(0))?;
    u32::try_from(current + 1).map_err(|_| {
        SoulError::ValidationError(format!("governor version {} out of range", current + 1))
    })
}

pub(crate) fn insert_draft(
    conn: &Connection,
    axioms: Vec<Axiom>,
    principles: Vec<Principle>,
) -> Result<GovernorSet, SoulError> {
    let version = next_version(conn)?;
    let set = GovernorSet::draft(&time::new_id(), version, axioms, principles);
    store::insert_record(conn, RecordKind::GovernorSet, &set.id, &set)?;
    Ok(set)
}

/// Create a `draft` set with the next free version number.
pub fn create_governor_set(
    store: &Store,
    axioms: Vec<Axiom>,
    principles: Vec<Principle>,
) -> Result<GovernorSet, SoulError> {
    let set = store
        .broker()
        .with_write("governor.create", |conn| insert_draft(conn, axioms, principles))?;

    tracing::info!(
        target: "soulstore::governors",
        set = %set.id,
        version = set.version,
        axioms = set.axioms.len(),
        principles = set.principles.len(),
        "governor set drafted"
    );
    Ok(set)
}

/// Upsert a draft set. Sets past `draft` only change through the workflow operations.
///
/// A new id must carry the next free version, and a draft never carries
/// activation, supersession, or digest stamps; those are set by the workflow.
pub fn save_governor_set(store: &Store, set: &GovernorSet) -> Result<(), SoulError> {
    set.validate()?;
    if set.status != SetStatus::Draft {
        return Err(SoulError::ValidationError(format!(
            "governor set '{}' is {}; only draft sets can be saved directly",
            set.id, set.status
        )));
    }
    if set.activated_at.is_some() || set.superseded_at.is_some() || set.digest.is_some() {
        return Err(SoulError::ValidationError(format!(
            "governor set '{}' is a draft and cannot carry activation, supersession, or digest stamps",
            set.id
        )));
    }

    store.broker().with_write("governor.save", |conn| {
        let existing: Option<GovernorSet> = store::get_record(conn, RecordKind::GovernorSet, &set.id)?;
        match existing {
            Some(existing) if existing.status != SetStatus::Draft => {
                return Err(SoulError::InvalidTransition {
                    id: set.id.clone(),
                    from: existing.status,
                    to: SetStatus::Draft,
                });
            }
            Some(existing) if existing.version != set.version => {
                return Err(SoulError::ValidationError(format!(
                    "governor set '{}' cannot change version {} -> {}",
                    set.id, existing.version, set.version
                )));
            }
            Some(_) => {}
            None => {
                let expected = next_version(conn)?;
                if set.version != expected {
                    return Err(SoulError::ValidationError(format!(
                        "new governor set '{}' must take version {}, not {}",
                        set.id, expected, set.version
                    )));
                }
            }
        }
        store::put_record(conn, RecordKind::GovernorSet, &set.id, set)
    })
}

pub fn get_governor_set(store: &Store, id: &str) -> Result<Option<GovernorSet>, SoulError> {
    store
        .broker()
        .with_read("governor.get", |conn| store::get_record(conn, RecordKind::GovernorSet, id))
}

/// All sets in key order, history included.
pub fn list_governor_sets(store: &Store) -> Result<Vec<GovernorSet>, SoulError> {
    store
        .broker()
        .with_read("governor.list", |conn| store::scan_records(conn, RecordKind::GovernorSet))
}

pub fn list_governor_sets_by_status(
    store: &Store,
    status: &SetStatus,
) -> Result<Vec<GovernorSet>, SoulError> {
    let mut sets = list_governor_sets(store)?;
    sets.retain(|s| &s.status == status);
    Ok(sets)
}

/// The set currently in force, if any.
pub fn get_active_governor_set(store: &Store) -> Result<Option<GovernorSet>, SoulError> {
    let active = list_governor_sets_by_status(store, &SetStatus::Active)?;
    Ok(active.into_iter().max_by_key(|s| s.version))
}

/// Apply one lifecycle step to a stored set inside a write transaction.
fn transition<F>(store: &Store, op_name: &str, id: &str, f: F) -> Result<GovernorSet, SoulError>
where
    F: FnOnce(&mut GovernorSet) -> Result<(), SoulError>,
{
    let (set, from) = store.broker().with_write(op_name, |conn| {
        let mut set: GovernorSet = store::require_record(conn, RecordKind::GovernorSet, id)?;
        let from = set.status.clone();
        f(&mut set)?;
        store::put_record(conn, RecordKind::GovernorSet, &set.id, &set)?;
        Ok((set, from))
    })?;

    tracing::info!(
        target: "soulstore::governors",
        set = %set.id,
        version = set.version,
        from = %from,
        to = %set.status,
        "governor set transitioned"
    );
    Ok(set)
}

/// Replace the snapshot of a draft set.
pub fn recompose(
    store: &Store,
    id: &str,
    axioms: Vec<Axiom>,
    principles: Vec<Principle>,
) -> Result<GovernorSet, SoulError> {
    transition(store, "governor.recompose", id, |set| {
        lifecycle::recompose(set, axioms, principles)
    })
}

/// `draft -> pending`. The snapshot is frozen from here on.
pub fn submit_for_review(store: &Store, id: &str) -> Result<GovernorSet, SoulError> {
    transition(store, "governor.submit", id, lifecycle::submit)
}

/// `pending -> approved`.
pub fn approve(store: &Store, id: &str) -> Result<GovernorSet, SoulError> {
    transition(store, "governor.approve", id, lifecycle::approve)
}

/// `approved -> active`, superseding whichever set was active.
pub fn activate(store: &Store, id: &str) -> Result<GovernorSet, SoulError> {
    let (set, superseded) = store.broker().with_write("governor.activate", |conn| {
        let now = time::now();
        let mut set: GovernorSet = store::require_record(conn, RecordKind::GovernorSet, id)?;
        lifecycle::activate(&mut set, now)?;

        let mut superseded = Vec::new();
        let all: Vec<GovernorSet> = store::scan_records(conn, RecordKind::GovernorSet)?;
        for mut previous in all {
            if previous.id == set.id || previous.status != SetStatus::Active {
                continue;
            }
            lifecycle::supersede(&mut previous, now)?;
            store::put_record(conn, RecordKind::GovernorSet, &previous.id, &previous)?;
            superseded.push(previous.id);
        }

        store::put_record(conn, RecordKind::GovernorSet, &set.id, &set)?;
        Ok((set, superseded))
    })?;

    tracing::info!(
        target: "soulstore::governors",
        set = %set.id,
        version = set.version,
        superseded = ?superseded,
        "governor set activated"
    );
    Ok(set)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "governors",
        "version": "0.1.0",
        "description": "Versioned, approvable snapshots of axioms and principles",
        "fields": [
            "id", "version", "axioms", "principles", "status",
            "created_at", "activated_at", "superseded_at", "digest"
        ],
        "statuses": ["draft", "pending", "approved", "active", "superseded"],
        "commands": [
            { "name": "create", "parameters": ["axioms", "principles"] },
            { "name": "save", "parameters": ["set"] },
            { "name": "get", "parameters": ["id"] },
            { "name": "list", "parameters": [] },
            { "name": "list_by_status", "parameters": ["status"] },
            { "name": "get_active", "parameters": [] },
            { "name": "recompose", "parameters": ["id", "axioms", "principles"] },
            { "name": "submit", "parameters": ["id"] },
            { "name": "approve", "parameters": ["id"] },
            { "name": "activate", "parameters": ["id"] }
        ],
        "storage": ["records:governor:*"]
    })
}
