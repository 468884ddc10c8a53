//! Occurrence materialization and reconciliation.
//!
//! ## Module Organization
//!
//! - `occurrence`: the persisted occurrence record and the create-or-update payload
//! - `schedulable`: the parent-entity seam the engine reads from
//! - `store`: persistence/query capability trait plus the in-memory implementation
//! - `project`: parent-field projection into occurrence payloads
//! - `horizon`: the (date, count) bound on how far a rebuild expands
//! - `expand`: rule-to-window expansion under a horizon
//! - `matching`: pairing expanded windows against existing records
//! - `rebuild`: the reconciler orchestrating expansion, upserts, and pruning
//! - `registry`: composition-root registry of schedulable entity types

pub mod error;
pub mod expand;
pub mod horizon;
pub mod matching;
pub mod occurrence;
pub mod project;
pub mod rebuild;
pub mod registry;
pub mod schedulable;
pub mod store;
