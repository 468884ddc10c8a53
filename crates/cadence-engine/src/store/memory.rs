//! In-memory `OccurrenceStore` used by the test suite and by embedders that
//! do not need durable storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{OccurrenceStore, SaveOutcome, StoreError, StoreResult};
use crate::occurrence::{Occurrence, OccurrencePayload};

/// Validation hook: `Err` rejects the candidate record without persisting it.
pub type ValidationHook = Box<dyn Fn(&Occurrence) -> Result<(), String>>;

#[derive(Default)]
pub struct MemoryStore {
    records: BTreeMap<uuid::Uuid, Occurrence>,
    validation: Option<ValidationHook>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a validation hook applied to every save and update.
    #[must_use]
    pub fn with_validation(mut self, hook: ValidationHook) -> Self {
        self.validation = Some(hook);
        self
    }

    /// All records for one schedulable, in total (start time, id) order.
    #[must_use]
    pub fn all(&self, schedulable_id: uuid::Uuid) -> Vec<Occurrence> {
        let mut records: Vec<Occurrence> = self
            .records
            .values()
            .filter(|record| record.schedulable_id == schedulable_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| (record.start_time, record.id));
        records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts a record directly, bypassing validation. Test seeding only.
    pub fn seed(&mut self, record: Occurrence) {
        self.records.insert(record.id, record);
    }

    fn validate(&self, record: &Occurrence) -> Result<(), String> {
        match &self.validation {
            Some(hook) => hook(record),
            None => Ok(()),
        }
    }
}

impl OccurrenceStore for MemoryStore {
    fn remaining(
        &self,
        schedulable_id: uuid::Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Occurrence>> {
        let mut records: Vec<Occurrence> = self
            .records
            .values()
            .filter(|record| record.schedulable_id == schedulable_id && record.start_time >= now)
            .cloned()
            .collect();
        records.sort_by_key(|record| (record.start_time, record.id));
        Ok(records)
    }

    fn previous(
        &self,
        schedulable_id: uuid::Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Occurrence>> {
        let mut records: Vec<Occurrence> = self
            .records
            .values()
            .filter(|record| record.schedulable_id == schedulable_id && record.start_time < now)
            .cloned()
            .collect();
        records.sort_by_key(|record| (std::cmp::Reverse(record.start_time), record.id));
        Ok(records)
    }

    fn build(&self, schedulable_id: uuid::Uuid, payload: &OccurrencePayload) -> Occurrence {
        Occurrence {
            id: uuid::Uuid::new_v4(),
            schedulable_id,
            start_time: payload.start_time,
            end_time: payload.end_time,
            fields: payload.fields.clone(),
            update_from_schedulable: false,
        }
    }

    fn save(&mut self, record: Occurrence) -> StoreResult<SaveOutcome> {
        if let Err(reason) = self.validate(&record) {
            tracing::trace!(occurrence_id = %record.id, %reason, "Occurrence rejected on save");
            return Ok(SaveOutcome::Rejected(record));
        }
        self.records.insert(record.id, record.clone());
        Ok(SaveOutcome::Saved(record))
    }

    fn update(
        &mut self,
        id: uuid::Uuid,
        payload: &OccurrencePayload,
        update_from_schedulable: bool,
    ) -> StoreResult<SaveOutcome> {
        let Some(existing) = self.records.get(&id) else {
            return Err(StoreError::NotFound(id));
        };

        let mut candidate = existing.clone();
        candidate.update_from_schedulable = update_from_schedulable;
        candidate.apply(payload);

        if let Err(reason) = self.validate(&candidate) {
            tracing::trace!(occurrence_id = %id, %reason, "Occurrence rejected on update");
            return Ok(SaveOutcome::Rejected(candidate));
        }
        // The engine-write marker is transient and never persisted.
        let mut stored = candidate.clone();
        stored.update_from_schedulable = false;
        self.records.insert(id, stored);
        Ok(SaveOutcome::Saved(candidate))
    }

    fn destroy(&mut self, id: uuid::Uuid) -> StoreResult<()> {
        if self.records.remove(&id).is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }
}
