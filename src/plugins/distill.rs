//! Turns extraction output into principle candidates.
//!
//! Extraction itself happens elsewhere; this subsystem only accepts a
//! [`Distillation`] and folds its insights into the principle set. An insight
//! matching an existing principle's text reinforces it with new evidence
//! instead of creating a near-duplicate.

use crate::core::error::SoulError;
use crate::core::store::{self, RecordKind, Store};
use crate::core::time;
use crate::plugins::principles;
use crate::soul::model::{Distillation, Principle, validate_id};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub artifact_id: String,
    /// Principles created from this distillation.
    pub created: Vec<String>,
    /// Existing principles that gained this artifact as evidence.
    pub reinforced: Vec<String>,
}

/// Case-folded, whitespace-collapsed text used to match insights to principles.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Fold every insight of `distillation` into the principle set, atomically.
///
/// One invalid insight rejects the whole distillation. Each principle gains the
/// artifact at most once per call.
pub fn ingest_distillation(
    store: &Store,
    distillation: &Distillation,
) -> Result<IngestReport, SoulError> {
    let artifact_id = distillation.artifact_id.as_str();
    validate_id("artifact", artifact_id)?;
    for insight in &distillation.insights {
        insight.validate()?;
    }

    let report = store.broker().with_write("distill.ingest", |conn| {
        if !store::record_exists(conn, RecordKind::Artifact, artifact_id)? {
            return Err(SoulError::NotFound(RecordKind::Artifact.key(artifact_id)));
        }

        let mut known: Vec<Principle> = store::scan_records(conn, RecordKind::Principle)?;
        let mut touched: HashSet<String> = HashSet::new();
        let mut report = IngestReport {
            artifact_id: artifact_id.to_string(),
            ..IngestReport::default()
        };

        for insight in &distillation.insights {
            let key = normalize_text(&insight.text);

            if let Some(existing) = known.iter_mut().find(|p| normalize_text(&p.text) == key) {
                if touched.insert(existing.id.clone()) {
                    existing.evidence.push(artifact_id.to_string());
                    principles::persist(conn, existing, false)?;
                    report.reinforced.push(existing.id.clone());
                }
                continue;
            }

            let mut principle = Principle::new(&time::new_id(), insight.text.trim());
            principle.evidence.push(artifact_id.to_string());
            if let Some(hint) = insight.axiom_hint.as_deref() {
                if validate_id("axiom", hint).is_ok()
                    && store::record_exists(conn, RecordKind::Axiom, hint)?
                {
                    principle.axiom_id = Some(hint.to_string());
                } else {
                    tracing::debug!(
                        target: "soulstore::distill",
                        hint,
                        "axiom hint does not name a stored axiom; leaving principle ungrounded"
                    );
                }
            }
            principles::persist(conn, &mut principle, true)?;

            touched.insert(principle.id.clone());
            report.created.push(principle.id.clone());
            known.push(principle);
        }

        Ok(report)
    })?;

    tracing::info!(
        target: "soulstore::distill",
        artifact = %report.artifact_id,
        created = report.created.len(),
        reinforced = report.reinforced.len(),
        "distillation ingested"
    );
    Ok(report)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "distill",
        "version": "0.1.0",
        "description": "Fold extracted insights into principle candidates",
        "fields": {
            "distillation": ["artifact_id", "insights", "created_at"],
            "insight": ["text", "axiom_hint", "confidence"]
        },
        "commands": [
            { "name": "ingest", "parameters": ["distillation"] }
        ],
        "storage": ["records:principle:*"]
    })
}
