use crate::core::error::SoulError;
use crate::core::store::{self, RecordKind, Store};
use crate::soul::model::Axiom;

/// Store a new axiom. Axioms are append-only: an existing id is rejected.
pub fn save_axiom(store: &Store, axiom: &Axiom) -> Result<(), SoulError> {
    axiom.validate()?;
    store.broker().with_write("axiom.save", |conn| {
        store::insert_record(conn, RecordKind::Axiom, &axiom.id, axiom)
    })?;

    tracing::info!(
        target: "soulstore::axioms",
        axiom = %axiom.id,
        origin = %axiom.origin,
        "axiom recorded"
    );
    Ok(())
}

pub fn get_axiom(store: &Store, id: &str) -> Result<Option<Axiom>, SoulError> {
    store
        .broker()
        .with_read("axiom.get", |conn| store::get_record(conn, RecordKind::Axiom, id))
}

pub fn list_axioms(store: &Store) -> Result<Vec<Axiom>, SoulError> {
    store
        .broker()
        .with_read("axiom.list", |conn| store::scan_records(conn, RecordKind::Axiom))
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "axioms",
        "version": "0.1.0",
        "description": "Foundational constraints (append-only)",
        "fields": ["id", "label", "name", "description", "origin", "created_at"],
        "origins": ["seed", "discovered"],
        "commands": [
            { "name": "save", "parameters": ["axiom"] },
            { "name": "get", "parameters": ["id"] },
            { "name": "list", "parameters": [] }
        ],
        "storage": ["records:axiom:*"]
    })
}
