use chrono::Utc;
use soulstore::core::error::SoulError;
use soulstore::core::store::Store;
use soulstore::plugins::{artifacts, axioms, distill, principles};
use soulstore::{Artifact, Axiom, AxiomOrigin, Distillation, Insight, Source, Status};
use tempfile::tempdir;

fn setup() -> (tempfile::TempDir, Store) {
    let tmp = tempdir().unwrap();
    let store = Store::open_at(tmp.path()).unwrap();
    for id in ["a1", "a2", "a3"] {
        artifacts::create_artifact(&store, &mut Artifact::new(id, "session", "...", Source::Brain))
            .unwrap();
    }
    axioms::save_axiom(&store, &Axiom::new("care", "Care", "", AxiomOrigin::Seed)).unwrap();
    (tmp, store)
}

fn insight(text: &str, hint: Option<&str>) -> Insight {
    Insight {
        text: text.to_string(),
        axiom_hint: hint.map(String::from),
        confidence: 0.8,
    }
}

fn distillation(artifact_id: &str, insights: Vec<Insight>) -> Distillation {
    Distillation {
        artifact_id: artifact_id.to_string(),
        insights,
        created_at: Utc::now(),
    }
}

#[test]
fn test_repeated_insight_reinforces_to_confirmation() {
    let (_tmp, store) = setup();

    let first = distill::ingest_distillation(
        &store,
        &distillation("a1", vec![insight("Ask before deleting", Some("care"))]),
    )
    .unwrap();
    assert_eq!(first.created.len(), 1);
    assert!(first.reinforced.is_empty());
    let id = first.created[0].clone();

    for artifact_id in ["a2", "a3"] {
        let report = distill::ingest_distillation(
            &store,
            &distillation(artifact_id, vec![insight("  ask BEFORE   deleting ", None)]),
        )
        .unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.reinforced, vec![id.clone()]);
    }

    let principle = principles::get_principle(&store, &id).unwrap().unwrap();
    assert_eq!(principle.evidence, vec!["a1", "a2", "a3"]);
    assert_eq!(principle.axiom_id.as_deref(), Some("care"));
    assert_eq!(principle.status, Status::Confirmed);
    assert_eq!(principles::list_principles(&store, None).unwrap().len(), 1);
}

#[test]
fn test_ungrounded_insights_end_up_ungrounded() {
    let (_tmp, store) = setup();
    for artifact_id in ["a1", "a2", "a3"] {
        distill::ingest_distillation(
            &store,
            &distillation(artifact_id, vec![insight("Write things down", None)]),
        )
        .unwrap();
    }
    let ungrounded = principles::list_principles(&store, Some(&Status::Ungrounded)).unwrap();
    assert_eq!(ungrounded.len(), 1);
    assert_eq!(ungrounded[0].confidence(), 3);
}

#[test]
fn test_same_principle_gains_artifact_once_per_distillation() {
    let (_tmp, store) = setup();
    let report = distill::ingest_distillation(
        &store,
        &distillation(
            "a1",
            vec![
                insight("Keep it simple", None),
                insight("keep it simple", None),
                insight("Test first", None),
            ],
        ),
    )
    .unwrap();
    assert_eq!(report.created.len(), 2);
    assert!(report.reinforced.is_empty());

    for principle in principles::list_principles(&store, None).unwrap() {
        assert_eq!(principle.evidence, vec!["a1"]);
        assert_eq!(principle.status, Status::Candidate);
    }
}

#[test]
fn test_unknown_axiom_hint_is_ignored() {
    let (_tmp, store) = setup();
    let report = distill::ingest_distillation(
        &store,
        &distillation("a1", vec![insight("Sleep on it", Some("patience"))]),
    )
    .unwrap();
    let principle = principles::get_principle(&store, &report.created[0]).unwrap().unwrap();
    assert!(principle.axiom_id.is_none());
}

#[test]
fn test_invalid_insight_rejects_whole_distillation() {
    let (_tmp, store) = setup();
    let mut bad = insight("Overconfident", None);
    bad.confidence = 1.5;

    let err = distill::ingest_distillation(
        &store,
        &distillation("a1", vec![insight("Fine insight", None), bad]),
    )
    .unwrap_err();
    assert!(matches!(err, SoulError::ValidationError(_)));
    assert!(principles::list_principles(&store, None).unwrap().is_empty());
}

#[test]
fn test_missing_artifact_is_not_found() {
    let (_tmp, store) = setup();
    let err = distill::ingest_distillation(
        &store,
        &distillation("ghost", vec![insight("Anything", None)]),
    )
    .unwrap_err();
    assert!(err.is_not_found());
    assert!(principles::list_principles(&store, None).unwrap().is_empty());
}
