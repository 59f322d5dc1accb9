use crate::core::error::SoulError;
use crate::core::schemas;
use crate::core::store::{self, RecordKind, Store};
use crate::core::time;
use crate::soul::model::{Axiom, Principle, Status};
use rusqlite::{Connection, params};

/// Reclassify, stamp, and write. Every principle write goes through here so the
/// stored status always matches evidence and grounding.
pub(crate) fn persist(conn: &Connection, principle: &mut Principle, insert: bool) -> Result<(), SoulError> {
    principle.validate()?;
    principle.reclassify();
    principle.updated_at = time::now();
    if insert {
        store::insert_record(conn, RecordKind::Principle, &principle.id, &*principle)
    } else {
        store::put_record(conn, RecordKind::Principle, &principle.id, &*principle)
    }
}

/// Insert a new principle. Fails if the id is already taken.
pub fn create_principle(store: &Store, principle: &mut Principle) -> Result<(), SoulError> {
    let mut stored = principle.clone();
    store
        .broker()
        .with_write("principle.create", |conn| persist(conn, &mut stored, true))?;
    *principle = stored;
    Ok(())
}

/// Upsert a principle. `status` is recomputed and `updated_at` refreshed; the
/// caller's copy is updated to match what was stored, and left alone if the write fails.
pub fn save_principle(store: &Store, principle: &mut Principle) -> Result<(), SoulError> {
    let mut stored = principle.clone();
    store
        .broker()
        .with_write("principle.save", |conn| persist(conn, &mut stored, false))?;
    *principle = stored;
    Ok(())
}

pub fn get_principle(store: &Store, id: &str) -> Result<Option<Principle>, SoulError> {
    store
        .broker()
        .with_read("principle.get", |conn| store::get_record(conn, RecordKind::Principle, id))
}

/// Principles in key order, optionally filtered by status through the `principles_by_status` index.
pub fn list_principles(store: &Store, status: Option<&Status>) -> Result<Vec<Principle>, SoulError> {
    store.broker().with_read("principle.list", |conn| match status {
        None => store::scan_records(conn, RecordKind::Principle),
        Some(Status::Unknown(_)) => {
            store::scan_query(conn, schemas::SCAN_PRINCIPLES_UNKNOWN_STATUS, [])
        }
        Some(known) => {
            store::scan_query(conn, schemas::SCAN_PRINCIPLES_BY_STATUS, params![known.as_str()])
        }
    })
}

/// Load, mutate, reclassify, and store a principle in one write transaction.
fn mutate<F>(store: &Store, op_name: &str, id: &str, f: F) -> Result<Principle, SoulError>
where
    F: FnOnce(&Connection, &mut Principle) -> Result<(), SoulError>,
{
    store.broker().with_write(op_name, |conn| {
        let mut principle: Principle = store::require_record(conn, RecordKind::Principle, id)?;
        let before = principle.status.clone();
        f(conn, &mut principle)?;
        persist(conn, &mut principle, false)?;

        if principle.status != before {
            tracing::info!(
                target: "soulstore::principles",
                principle = %principle.id,
                from = %before,
                to = %principle.status,
                evidence = principle.confidence(),
                "principle reclassified"
            );
        }
        Ok(principle)
    })
}

/// Append an artifact to the evidence list. Duplicates are kept and counted.
pub fn add_evidence(store: &Store, id: &str, artifact_id: &str) -> Result<Principle, SoulError> {
    mutate(store, "principle.add_evidence", id, |conn, principle| {
        if !store::record_exists(conn, RecordKind::Artifact, artifact_id)? {
            return Err(SoulError::NotFound(RecordKind::Artifact.key(artifact_id)));
        }
        principle.evidence.push(artifact_id.to_string());
        Ok(())
    })
}

/// Ground the principle on an existing axiom.
pub fn set_axiom(store: &Store, id: &str, axiom_id: &str) -> Result<Principle, SoulError> {
    mutate(store, "principle.set_axiom", id, |conn, principle| {
        if !store::record_exists(conn, RecordKind::Axiom, axiom_id)? {
            return Err(SoulError::NotFound(RecordKind::Axiom.key(axiom_id)));
        }
        principle.axiom_id = Some(axiom_id.to_string());
        Ok(())
    })
}

pub fn clear_axiom(store: &Store, id: &str) -> Result<Principle, SoulError> {
    mutate(store, "principle.clear_axiom", id, |_, principle| {
        principle.axiom_id = None;
        Ok(())
    })
}

/// Follow the principle's axiom reference.
///
/// `Ok(None)` for an ungrounded principle; `NotFound` when the reference dangles.
pub fn resolve_axiom(store: &Store, principle: &Principle) -> Result<Option<Axiom>, SoulError> {
    let Some(axiom_id) = principle.axiom_id.as_deref() else {
        return Ok(None);
    };
    store.broker().with_read("principle.resolve_axiom", |conn| {
        store::require_record(conn, RecordKind::Axiom, axiom_id).map(Some)
    })
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "principles",
        "version": "0.1.0",
        "description": "Behavioral rules; status derives from evidence count and grounding",
        "fields": ["id", "text", "axiom_id", "evidence", "status", "created_at", "updated_at"],
        "statuses": ["candidate", "confirmed", "ungrounded"],
        "commands": [
            { "name": "create", "parameters": ["principle"] },
            { "name": "save", "parameters": ["principle"] },
            { "name": "get", "parameters": ["id"] },
            { "name": "list", "parameters": ["status?"] },
            { "name": "add_evidence", "parameters": ["id", "artifact_id"] },
            { "name": "set_axiom", "parameters": ["id", "axiom_id"] },
            { "name": "clear_axiom", "parameters": ["id"] }
        ],
        "storage": ["records:principle:*", "index:principles_by_status"]
    })
}
