use crate::core::error::SoulError;
use crate::core::schemas;
use crate::core::store::{self, RecordKind, Store};
use crate::core::time;
use crate::soul::model::{Artifact, Principle, Source};
use rusqlite::{Connection, params};

/// Insert a new artifact. Fails if the id is already taken.
pub fn create_artifact(store: &Store, artifact: &mut Artifact) -> Result<(), SoulError> {
    artifact.validate()?;
    let mut stamped = artifact.clone();
    stamped.updated_at = time::now();

    store.broker().with_write("artifact.create", |conn| {
        store::insert_record(conn, RecordKind::Artifact, &stamped.id, &stamped)
    })?;
    *artifact = stamped;
    Ok(())
}

/// Upsert an artifact and refresh its `updated_at`.
///
/// Once a principle cites the artifact as evidence, only the update timestamp
/// may change. The caller's copy is stamped only once the write commits.
pub fn save_artifact(store: &Store, artifact: &mut Artifact) -> Result<(), SoulError> {
    artifact.validate()?;
    let mut stamped = artifact.clone();
    stamped.updated_at = time::now();

    store.broker().with_write("artifact.save", |conn| {
        let existing: Option<Artifact> = store::get_record(conn, RecordKind::Artifact, &stamped.id)?;
        if let Some(existing) = existing {
            if !existing.same_substance(&stamped) && is_cited(conn, &stamped.id)? {
                return Err(SoulError::ValidationError(format!(
                    "artifact '{}' is cited as evidence and cannot be modified",
                    stamped.id
                )));
            }
        }
        store::put_record(conn, RecordKind::Artifact, &stamped.id, &stamped)
    })?;
    *artifact = stamped;
    Ok(())
}

pub fn get_artifact(store: &Store, id: &str) -> Result<Option<Artifact>, SoulError> {
    store
        .broker()
        .with_read("artifact.get", |conn| store::get_record(conn, RecordKind::Artifact, id))
}

/// Artifacts in key order, optionally filtered by source through the `artifacts_by_source` index.
///
/// Filtering by `Source::Unknown(_)` returns every artifact whose stored tag is
/// not one of the known sources.
pub fn list_artifacts(store: &Store, source: Option<&Source>) -> Result<Vec<Artifact>, SoulError> {
    store.broker().with_read("artifact.list", |conn| match source {
        None => store::scan_records(conn, RecordKind::Artifact),
        Some(Source::Unknown(_)) => {
            store::scan_query(conn, schemas::SCAN_ARTIFACTS_UNKNOWN_SOURCE, [])
        }
        Some(known) => {
            store::scan_query(conn, schemas::SCAN_ARTIFACTS_BY_SOURCE, params![known.as_str()])
        }
    })
}

/// Ids of principles citing `artifact_id`.
pub fn citing_principles(store: &Store, artifact_id: &str) -> Result<Vec<String>, SoulError> {
    store.broker().with_read("artifact.citations", |conn| {
        let principles: Vec<Principle> = store::scan_records(conn, RecordKind::Principle)?;
        Ok(principles
            .into_iter()
            .filter(|p| p.evidence.iter().any(|e| e == artifact_id))
            .map(|p| p.id)
            .collect())
    })
}

fn is_cited(conn: &Connection, artifact_id: &str) -> Result<bool, SoulError> {
    let principles: Vec<Principle> = store::scan_records(conn, RecordKind::Principle)?;
    Ok(principles
        .iter()
        .any(|p| p.evidence.iter().any(|e| e == artifact_id)))
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "artifacts",
        "version": "0.1.0",
        "description": "Raw source material, filterable by source",
        "fields": ["id", "title", "content", "source", "created_at", "updated_at"],
        "sources": ["heart", "brain", "shadow", "inbox"],
        "commands": [
            { "name": "create", "parameters": ["artifact"] },
            { "name": "save", "parameters": ["artifact"] },
            { "name": "get", "parameters": ["id"] },
            { "name": "list", "parameters": ["source?"] }
        ],
        "storage": ["records:artifact:*", "index:artifacts_by_source"]
    })
}
