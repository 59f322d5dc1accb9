//! Lifecycle rules: principle confirmation and the governor set workflow.
//!
//! Everything here is a pure function of the entity values passed in. The
//! `governors` and `principles` subsystems call these inside write
//! transactions, so a rule either fully applies or leaves storage untouched.

use crate::core::error::SoulError;
use crate::soul::model::{Axiom, GovernorSet, Principle, SetStatus, Status};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Evidence needed before a principle leaves `candidate`.
pub const CONFIRMATION_THRESHOLD: usize = 3;

pub fn classify(evidence_count: usize, grounded: bool) -> Status {
    if evidence_count < CONFIRMATION_THRESHOLD {
        Status::Candidate
    } else if grounded {
        Status::Confirmed
    } else {
        Status::Ungrounded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetAction {
    Recompose,
    Submit,
    Approve,
    Activate,
    Supersede,
}

impl SetAction {
    /// The only status this action may start from.
    pub fn required(self) -> SetStatus {
        match self {
            SetAction::Recompose | SetAction::Submit => SetStatus::Draft,
            SetAction::Approve => SetStatus::Pending,
            SetAction::Activate => SetStatus::Approved,
            SetAction::Supersede => SetStatus::Active,
        }
    }

    pub fn target(self) -> SetStatus {
        match self {
            SetAction::Recompose => SetStatus::Draft,
            SetAction::Submit => SetStatus::Pending,
            SetAction::Approve => SetStatus::Approved,
            SetAction::Activate => SetStatus::Active,
            SetAction::Supersede => SetStatus::Superseded,
        }
    }
}

/// Check that `action` is legal from the set's current status and return the status it leads to.
pub fn check_transition(set: &GovernorSet, action: SetAction) -> Result<SetStatus, SoulError> {
    if set.status != action.required() {
        return Err(SoulError::InvalidTransition {
            id: set.id.clone(),
            from: set.status.clone(),
            to: action.target(),
        });
    }
    Ok(action.target())
}

#[derive(Serialize)]
struct Snapshot<'a> {
    axioms: &'a [Axiom],
    principles: &'a [Principle],
}

/// SHA-256 over the canonical JSON of the embedded axioms and principles.
pub fn snapshot_digest(axioms: &[Axiom], principles: &[Principle]) -> Result<String, SoulError> {
    let bytes = serde_json::to_vec(&Snapshot { axioms, principles })
        .map_err(SoulError::SerializationError)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn verify_digest(set: &GovernorSet) -> Result<(), SoulError> {
    let expected = set.digest.as_deref().ok_or_else(|| {
        SoulError::ValidationError(format!(
            "governor set '{}' has no snapshot digest",
            set.id
        ))
    })?;
    let actual = snapshot_digest(&set.axioms, &set.principles)?;
    if actual != expected {
        return Err(SoulError::ValidationError(format!(
            "governor set '{}' snapshot changed after submission",
            set.id
        )));
    }
    Ok(())
}

pub fn recompose(
    set: &mut GovernorSet,
    axioms: Vec<Axiom>,
    principles: Vec<Principle>,
) -> Result<(), SoulError> {
    check_transition(set, SetAction::Recompose)?;
    set.axioms = axioms;
    set.principles = principles;
    Ok(())
}

/// `draft -> pending`. Freezes the snapshot by recording its digest.
pub fn submit(set: &mut GovernorSet) -> Result<(), SoulError> {
    let next = check_transition(set, SetAction::Submit)?;
    set.digest = Some(snapshot_digest(&set.axioms, &set.principles)?);
    set.status = next;
    Ok(())
}

/// `pending -> approved`.
pub fn approve(set: &mut GovernorSet) -> Result<(), SoulError> {
    let next = check_transition(set, SetAction::Approve)?;
    verify_digest(set)?;
    set.status = next;
    Ok(())
}

/// `approved -> active`. The caller must supersede the previously active set in the same transaction.
pub fn activate(set: &mut GovernorSet, at: DateTime<Utc>) -> Result<(), SoulError> {
    let next = check_transition(set, SetAction::Activate)?;
    verify_digest(set)?;
    set.status = next;
    set.activated_at = Some(at);
    Ok(())
}

/// `active -> superseded`. `activated_at` is left as it was.
pub fn supersede(set: &mut GovernorSet, at: DateTime<Utc>) -> Result<(), SoulError> {
    let next = check_transition(set, SetAction::Supersede)?;
    set.status = next;
    set.superseded_at = Some(at);
    Ok(())
}
