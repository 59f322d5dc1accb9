//! Entity subsystems. Each module owns one slice of the `records` namespace
//! and exposes free functions over a `&Store`, plus a `schema()` descriptor
//! documenting its stable field names and operations.

use std::collections::BTreeMap;

pub mod artifacts;
pub mod axioms;
pub mod compile;
pub mod distill;
pub mod governors;
pub mod principles;

/// Descriptors of every subsystem keyed by name, for presentation layers and diagnostics.
pub fn schemas() -> BTreeMap<&'static str, serde_json::Value> {
    let mut schemas = BTreeMap::new();
    schemas.insert("artifacts", artifacts::schema());
    schemas.insert("principles", principles::schema());
    schemas.insert("axioms", axioms::schema());
    schemas.insert("governors", governors::schema());
    schemas.insert("distill", distill::schema());
    schemas.insert("compile", compile::schema());
    schemas
}
