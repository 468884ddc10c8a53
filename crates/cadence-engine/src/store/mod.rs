//! Persistence/query capability for occurrence records.
//!
//! The engine only ever sees this trait; concrete backends live with the
//! embedding application. [`memory::MemoryStore`] is the reference
//! implementation used by the test suite.

pub mod memory;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::occurrence::{Occurrence, OccurrencePayload};

/// Unexpected persistence failure. Fatal to the rebuild in progress; changes
/// already committed by that rebuild stay committed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Occurrence not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a save or update attempt.
///
/// `Rejected` is a per-record validation failure: the write did not happen,
/// the record goes onto the caller's error accumulator, and processing
/// continues. Backend failures use `StoreError` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(Occurrence),
    Rejected(Occurrence),
}

pub trait OccurrenceStore {
    /// Occurrences with `start_time >= now`, ascending, ties broken by id.
    ///
    /// The tie-break makes the ordering total so that positional matching is
    /// deterministic.
    ///
    /// ## Errors
    /// `StoreError` on backend failure.
    fn remaining(
        &self,
        schedulable_id: uuid::Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Occurrence>>;

    /// Occurrences with `start_time < now`, descending, ties broken by id.
    ///
    /// ## Errors
    /// `StoreError` on backend failure.
    fn previous(
        &self,
        schedulable_id: uuid::Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Occurrence>>;

    /// Builds an unsaved record pre-populated from the payload.
    fn build(&self, schedulable_id: uuid::Uuid, payload: &OccurrencePayload) -> Occurrence;

    /// Persists a built record.
    ///
    /// ## Errors
    /// `StoreError` on backend failure; validation failure is `Ok(Rejected)`.
    fn save(&mut self, record: Occurrence) -> StoreResult<SaveOutcome>;

    /// Applies a payload to an existing record.
    ///
    /// `update_from_schedulable` marks the write as engine-driven so the
    /// record can distinguish it from a direct edit.
    ///
    /// ## Errors
    /// `NotFound` if the id is unknown, `StoreError` on backend failure;
    /// validation failure is `Ok(Rejected)` and leaves the stored record
    /// unchanged.
    fn update(
        &mut self,
        id: uuid::Uuid,
        payload: &OccurrencePayload,
        update_from_schedulable: bool,
    ) -> StoreResult<SaveOutcome>;

    /// Destroys a record. Unconditional once selected by the pruning pass.
    ///
    /// ## Errors
    /// `NotFound` if the id is unknown, `StoreError` on backend failure.
    fn destroy(&mut self, id: uuid::Uuid) -> StoreResult<()>;
}
