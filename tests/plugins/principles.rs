use soulstore::core::error::SoulError;
use soulstore::core::store::Store;
use soulstore::plugins::{artifacts, axioms, principles};
use soulstore::{Artifact, Axiom, AxiomOrigin, Principle, Source, Status};
use tempfile::tempdir;

fn setup() -> (tempfile::TempDir, Store) {
    let tmp = tempdir().unwrap();
    let store = Store::open_at(tmp.path()).unwrap();
    for id in ["a1", "a2", "a3"] {
        artifacts::create_artifact(&store, &mut Artifact::new(id, "note", "body", Source::Heart))
            .unwrap();
    }
    axioms::save_axiom(&store, &Axiom::new("care", "Care", "Do no harm", AxiomOrigin::Seed)).unwrap();
    (tmp, store)
}

fn stored_status(store: &Store, id: &str) -> Status {
    principles::get_principle(store, id).unwrap().unwrap().status
}

#[test]
fn test_confirmation_scenario() {
    let (_tmp, store) = setup();
    let mut principle = Principle::new("p1", "Ask before deleting");
    principles::create_principle(&store, &mut principle).unwrap();
    assert_eq!(stored_status(&store, "p1"), Status::Candidate);

    for (i, artifact_id) in ["a1", "a2", "a3"].iter().enumerate() {
        let updated = principles::add_evidence(&store, "p1", artifact_id).unwrap();
        assert_eq!(updated.confidence(), i + 1);
        assert_eq!(stored_status(&store, "p1"), updated.status);
    }
    assert_eq!(stored_status(&store, "p1"), Status::Ungrounded);

    let grounded = principles::set_axiom(&store, "p1", "care").unwrap();
    assert!(grounded.is_grounded());
    assert_eq!(stored_status(&store, "p1"), Status::Confirmed);

    let cleared = principles::clear_axiom(&store, "p1").unwrap();
    assert!(!cleared.is_grounded());
    assert_eq!(stored_status(&store, "p1"), Status::Ungrounded);
}

#[test]
fn test_grounded_principle_stays_candidate_below_threshold() {
    let (_tmp, store) = setup();
    principles::create_principle(&store, &mut Principle::new("p1", "Prefer small steps")).unwrap();
    principles::set_axiom(&store, "p1", "care").unwrap();
    principles::add_evidence(&store, "p1", "a1").unwrap();
    principles::add_evidence(&store, "p1", "a2").unwrap();
    assert_eq!(stored_status(&store, "p1"), Status::Candidate);

    principles::add_evidence(&store, "p1", "a3").unwrap();
    assert_eq!(stored_status(&store, "p1"), Status::Confirmed);
}

#[test]
fn test_duplicate_evidence_counts_toward_threshold() {
    let (_tmp, store) = setup();
    principles::create_principle(&store, &mut Principle::new("p1", "Repeat yourself")).unwrap();
    for _ in 0..3 {
        principles::add_evidence(&store, "p1", "a1").unwrap();
    }
    let stored = principles::get_principle(&store, "p1").unwrap().unwrap();
    assert_eq!(stored.confidence(), 3);
    assert_eq!(stored.status, Status::Ungrounded);
}

#[test]
fn test_save_overrides_stale_status_from_caller() {
    let (_tmp, store) = setup();
    let mut principle = Principle::new("p1", "Keep promises");
    principle.evidence = vec!["a1".into(), "a2".into(), "a3".into()];
    principle.axiom_id = Some("care".into());
    principle.status = Status::Candidate;

    principles::save_principle(&store, &mut principle).unwrap();
    assert_eq!(principle.status, Status::Confirmed);
    assert_eq!(stored_status(&store, "p1"), Status::Confirmed);
}

#[test]
fn test_list_by_status_uses_current_classification() {
    let (_tmp, store) = setup();
    principles::create_principle(&store, &mut Principle::new("p1", "one")).unwrap();
    principles::create_principle(&store, &mut Principle::new("p2", "two")).unwrap();
    for id in ["a1", "a2", "a3"] {
        principles::add_evidence(&store, "p2", id).unwrap();
    }

    let candidates = principles::list_principles(&store, Some(&Status::Candidate)).unwrap();
    assert_eq!(candidates.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["p1"]);

    let ungrounded = principles::list_principles(&store, Some(&Status::Ungrounded)).unwrap();
    assert_eq!(ungrounded.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["p2"]);

    assert!(principles::list_principles(&store, Some(&Status::Confirmed)).unwrap().is_empty());
    assert_eq!(principles::list_principles(&store, None).unwrap().len(), 2);
}

#[test]
fn test_mutations_require_existing_records() {
    let (_tmp, store) = setup();
    principles::create_principle(&store, &mut Principle::new("p1", "text")).unwrap();

    let err = principles::add_evidence(&store, "p1", "ghost").unwrap_err();
    assert!(err.is_not_found());
    let err = principles::set_axiom(&store, "p1", "ghost").unwrap_err();
    assert!(err.is_not_found());
    let err = principles::add_evidence(&store, "nope", "a1").unwrap_err();
    assert!(err.is_not_found());

    let stored = principles::get_principle(&store, "p1").unwrap().unwrap();
    assert!(stored.evidence.is_empty());
    assert!(stored.axiom_id.is_none());
}

#[test]
fn test_resolve_axiom_three_ways() {
    let (_tmp, store) = setup();

    let ungrounded = Principle::new("p1", "text");
    assert!(principles::resolve_axiom(&store, &ungrounded).unwrap().is_none());

    let mut grounded = Principle::new("p2", "text");
    grounded.axiom_id = Some("care".into());
    let axiom = principles::resolve_axiom(&store, &grounded).unwrap().unwrap();
    assert_eq!(axiom.name, "Care");

    let mut dangling = Principle::new("p3", "text");
    dangling.axiom_id = Some("vanished".into());
    let err = principles::resolve_axiom(&store, &dangling).unwrap_err();
    assert!(matches!(err, SoulError::NotFound(ref key) if key == "axiom:vanished"));
}

#[test]
fn test_create_rejects_duplicate_id() {
    let (_tmp, store) = setup();
    principles::create_principle(&store, &mut Principle::new("p1", "first")).unwrap();
    let err = principles::create_principle(&store, &mut Principle::new("p1", "second")).unwrap_err();
    assert!(matches!(err, SoulError::ValidationError(_)));
    assert_eq!(principles::get_principle(&store, "p1").unwrap().unwrap().text, "first");
}

#[test]
fn test_failed_create_leaves_caller_copy_untouched() {
    let (_tmp, store) = setup();
    principles::create_principle(&store, &mut Principle::new("p1", "first")).unwrap();

    let mut duplicate = Principle::new("p1", "second");
    duplicate.evidence = vec!["a1".into(), "a2".into(), "a3".into()];
    let before = duplicate.clone();
    std::thread::sleep(std::time::Duration::from_millis(5));

    assert!(principles::create_principle(&store, &mut duplicate).is_err());
    assert_eq!(duplicate, before);
    assert_eq!(duplicate.status, Status::Candidate);
}
