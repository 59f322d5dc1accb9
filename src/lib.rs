//! soulstore: the persistent core of a soul compiler.
//!
//! Raw source material ("artifacts") is distilled into behavioral rules
//! ("principles"). Principles are grounded against foundational constraints
//! ("axioms"), and grounded, confirmed principles ship together with the axioms
//! as versioned, approvable "governor sets", the active rule-set of an agent.
//!
//! # Architecture
//!
//! ## One store, one table
//!
//! A [`Store`] wraps a single SQLite database in WAL mode. Every entity is a
//! JSON document in the `records` table under a `<type>:<id>` key. Two
//! secondary indexes are declared by the store itself:
//! - `artifacts_by_source` for triage by [`Source`],
//! - `principles_by_status` for review by [`Status`].
//!
//! ## The Thin Waist
//!
//! All access routes through [`core::broker::DbBroker`]:
//! - writes run in `BEGIN IMMEDIATE` transactions, one writer at a time;
//! - reads run in one deferred transaction, so every `get`, `list`, and `stats` sees a single snapshot;
//! - an error or panic inside an operation rolls the whole operation back.
//!
//! ## Lifecycle
//!
//! - Principle status is derived: fewer than three pieces of evidence is
//!   `candidate`; otherwise `confirmed` when grounded, `ungrounded` when not.
//! - Governor sets move `draft -> pending -> approved -> active`, and never
//!   backward. Activating a set supersedes the previous active set in the same
//!   transaction, so at most one set is active at any instant.
//!
//! # Example
//!
//! ```no_run
//! use soulstore::plugins::{artifacts, axioms, governors, principles};
//! use soulstore::{Artifact, Axiom, AxiomOrigin, Principle, Source, Store};
//!
//! # fn main() -> Result<(), soulstore::SoulError> {
//! let store = Store::open_at(std::path::Path::new("./data"))?;
//!
//! axioms::save_axiom(&store, &Axiom::new("care", "Care", "Do no harm", AxiomOrigin::Seed))?;
//! let mut principle = Principle::new("ask-first", "Ask before deleting");
//! principles::create_principle(&store, &mut principle)?;
//!
//! for id in ["a1", "a2", "a3"] {
//!     artifacts::create_artifact(&store, &mut Artifact::new(id, "note", "...", Source::Heart))?;
//!     principles::add_evidence(&store, "ask-first", id)?;
//! }
//! principles::set_axiom(&store, "ask-first", "care")?;
//!
//! let set = soulstore::plugins::compile::compile_draft(&store)?;
//! governors::submit_for_review(&store, &set.id)?;
//! governors::approve(&store, &set.id)?;
//! governors::activate(&store, &set.id)?;
//! store.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: store handle, broker, schema, configuration, errors
//! - [`soul`]: entity model and lifecycle rules (pure)
//! - [`plugins`]: per-entity subsystems (artifacts, principles, axioms, governors, distill, compile)

pub mod core;
pub mod plugins;
pub mod soul;

pub use crate::core::config::{StoreConfig, load_store_config};
pub use crate::core::error::SoulError;
pub use crate::core::store::{Store, StoreStats};
pub use crate::soul::model::{
    Artifact, Axiom, AxiomOrigin, Distillation, GovernorSet, Insight, Principle, SetStatus,
    Source, Status,
};
