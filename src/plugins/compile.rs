//! Compile the live axioms and confirmed principles into a draft governor set,
//! and render a set as markdown for review.

use crate::core::error::SoulError;
use crate::core::schemas;
use crate::core::store::{self, RecordKind, Store};
use crate::plugins::governors;
use crate::soul::model::{Axiom, GovernorSet, Principle, Status};
use rusqlite::params;

/// Snapshot every axiom and every confirmed principle into a new draft set.
///
/// Reading the sources and creating the draft share one transaction, so the
/// snapshot never mixes states from before and after a concurrent write.
pub fn compile_draft(store: &Store) -> Result<GovernorSet, SoulError> {
    let set = store.broker().with_write("compile.draft", |conn| {
        let axioms: Vec<Axiom> = store::scan_records(conn, RecordKind::Axiom)?;
        let confirmed: Vec<Principle> = store::scan_query(
            conn,
            schemas::SCAN_PRINCIPLES_BY_STATUS,
            params![Status::Confirmed.as_str()],
        )?;
        governors::insert_draft(conn, axioms, confirmed)
    })?;

    tracing::info!(
        target: "soulstore::compile",
        set = %set.id,
        version = set.version,
        axioms = set.axioms.len(),
        principles = set.principles.len(),
        "governor draft compiled"
    );
    Ok(set)
}

/// Render a governor set: axioms with label and description, then principles with confidence.
pub fn render_markdown(set: &GovernorSet) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Governor Set v{} ({})\n", set.version, set.status));
    if let Some(activated_at) = set.activated_at {
        md.push_str(&format!("\nActivated: {}\n", activated_at.to_rfc3339()));
    }

    md.push_str("\n## Axioms\n\n");
    for axiom in &set.axioms {
        md.push_str(&format!("### {}\n", axiom.name));
        if let Some(label) = axiom.label.as_deref().filter(|l| !l.is_empty()) {
            md.push_str(&format!("*{}*\n\n", label));
        }
        if !axiom.description.is_empty() {
            md.push_str(&format!("{}\n\n", axiom.description));
        }
    }

    md.push_str("## Principles\n\n");
    for principle in &set.principles {
        let grounding = principle
            .axiom_id
            .as_deref()
            .and_then(|id| set.axioms.iter().find(|a| a.id == id))
            .map(|a| format!(", {}", a.name))
            .unwrap_or_default();
        md.push_str(&format!(
            "- {} (N={}{})\n",
            principle.text,
            principle.confidence(),
            grounding
        ));
    }
    md
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "compile",
        "version": "0.1.0",
        "description": "Compile confirmed principles into governor drafts and render them",
        "commands": [
            { "name": "draft", "parameters": [] },
            { "name": "render", "parameters": ["set"] }
        ],
        "storage": ["records:governor:*"]
    })
}
