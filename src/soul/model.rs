//! Entity model: artifacts, principles, axioms, and governor sets.
//!
//! Pure data plus derived values and field validation. Nothing here touches
//! storage; cross-entity links are plain identifiers, resolved by the
//! subsystems in `plugins`.
//!
//! JSON field names are part of the persisted format and stay stable. Unknown
//! fields are ignored on decode.

use crate::core::error::SoulError;
use crate::soul::lifecycle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed string tag with an `Unknown` fallback that keeps the raw value, so
/// records written by a newer schema still decode.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A persisted tag this build does not recognize.
            Unknown(String),
        }

        impl $name {
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $tag,)+
                    $name::Unknown(raw) => raw,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($tag => $name::$variant,)+
                    _ => $name::Unknown(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                $name::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                match value {
                    $name::Unknown(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Where an artifact came from.
    Source {
        /// Conversations, reflections, creative work.
        Heart => "heart",
        /// Guides, research, methodologies.
        Brain => "brain",
        /// Failures, contradictions, anti-patterns.
        Shadow => "shadow",
        /// Awaiting triage.
        Inbox => "inbox",
    }
}

string_enum! {
    /// Confirmation state of a principle. Always derived, see [`lifecycle::classify`].
    Status {
        Candidate => "candidate",
        Confirmed => "confirmed",
        Ungrounded => "ungrounded",
    }
}

string_enum! {
    /// Governor set workflow state. Progression is strictly forward.
    SetStatus {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Active => "active",
        /// A formerly active set, kept as history.
        Superseded => "superseded",
    }
}

string_enum! {
    AxiomOrigin {
        Seed => "seed",
        Discovered => "discovered",
    }
}

pub fn validate_id(kind: &str, id: &str) -> Result<(), SoulError> {
    if id.trim().is_empty() {
        return Err(SoulError::ValidationError(format!(
            "{} id must not be empty",
            kind
        )));
    }
    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SoulError::ValidationError(format!(
            "{} id '{}' must not contain whitespace or control characters",
            kind,
            id.escape_debug()
        )));
    }
    Ok(())
}

/// Raw source material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source: Source,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artifact {
    pub fn new(id: &str, title: &str, content: &str, source: Source) -> Self {
        let now = crate::core::time::now();
        Self {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            source,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), SoulError> {
        validate_id("artifact", &self.id)?;
        if !self.source.is_known() {
            return Err(SoulError::ValidationError(format!(
                "artifact '{}' has unknown source '{}'",
                self.id, self.source
            )));
        }
        Ok(())
    }

    /// True when everything but the update timestamp matches.
    pub fn same_substance(&self, other: &Artifact) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.content == other.content
            && self.source == other.source
            && self.created_at == other.created_at
    }
}

/// One candidate guideline extracted from an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    /// Identifier of the axiom the extractor believes this belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axiom_hint: Option<String>,
    /// Extractor confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl Insight {
    pub fn validate(&self) -> Result<(), SoulError> {
        if self.text.trim().is_empty() {
            return Err(SoulError::ValidationError(
                "insight text must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SoulError::ValidationError(format!(
                "insight confidence {} is outside [0.0, 1.0]",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// Extraction output for one artifact. Transient: never stored as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distillation {
    pub artifact_id: String,
    #[serde(default)]
    pub insights: Vec<Insight>,
    pub created_at: DateTime<Utc>,
}

/// A behavioral rule backed by artifact evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principle {
    pub id: String,
    pub text: String,
    /// `None` means ungrounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axiom_id: Option<String>,
    /// Artifact identifiers. Duplicates count toward confidence.
    #[serde(default)]
    pub evidence: Vec<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principle {
    pub fn new(id: &str, text: &str) -> Self {
        let now = crate::core::time::now();
        Self {
            id: id.to_string(),
            text: text.to_string(),
            axiom_id: None,
            evidence: Vec::new(),
            status: Status::Candidate,
            created_at: now,
            updated_at: now,
        }
    }

    /// Evidence count.
    pub fn confidence(&self) -> usize {
        self.evidence.len()
    }

    pub fn is_grounded(&self) -> bool {
        self.axiom_id.is_some()
    }

    /// Recompute `status` from evidence and grounding. Returns true if it changed.
    pub fn reclassify(&mut self) -> bool {
        let next = lifecycle::classify(self.confidence(), self.is_grounded());
        if next == self.status {
            return false;
        }
        self.status = next;
        true
    }

    pub fn validate(&self) -> Result<(), SoulError> {
        validate_id("principle", &self.id)?;
        if let Some(axiom_id) = &self.axiom_id {
            validate_id("axiom", axiom_id)?;
        }
        for artifact_id in &self.evidence {
            validate_id("artifact", artifact_id)?;
        }
        Ok(())
    }
}

/// A foundational constraint. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axiom {
    pub id: String,
    /// Short symbolic label, e.g. a two-glyph mnemonic.
    #[serde(default, alias = "cjk", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub origin: AxiomOrigin,
    pub created_at: DateTime<Utc>,
}

impl Axiom {
    pub fn new(id: &str, name: &str, description: &str, origin: AxiomOrigin) -> Self {
        Self {
            id: id.to_string(),
            label: None,
            name: name.to_string(),
            description: description.to_string(),
            origin,
            created_at: crate::core::time::now(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), SoulError> {
        validate_id("axiom", &self.id)?;
        if self.name.trim().is_empty() {
            return Err(SoulError::ValidationError(format!(
                "axiom '{}' must have a name",
                self.id
            )));
        }
        Ok(())
    }
}

/// A versioned snapshot of axioms and principles.
///
/// Axioms and principles are embedded copies, so later edits to the live
/// records never alter a historical set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernorSet {
    pub id: String,
    pub version: u32,
    #[serde(default)]
    pub axioms: Vec<Axiom>,
    #[serde(default)]
    pub principles: Vec<Principle>,
    pub status: SetStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_at: Option<DateTime<Utc>>,
    /// SHA-256 of the snapshot, fixed at submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl GovernorSet {
    pub fn draft(id: &str, version: u32, axioms: Vec<Axiom>, principles: Vec<Principle>) -> Self {
        Self {
            id: id.to_string(),
            version,
            axioms,
            principles,
            status: SetStatus::Draft,
            created_at: crate::core::time::now(),
            activated_at: None,
            superseded_at: None,
            digest: None,
        }
    }

    pub fn validate(&self) -> Result<(), SoulError> {
        validate_id("governor set", &self.id)?;
        if self.version == 0 {
            return Err(SoulError::ValidationError(format!(
                "governor set '{}' must have a version >= 1",
                self.id
            )));
        }
        Ok(())
    }
}
