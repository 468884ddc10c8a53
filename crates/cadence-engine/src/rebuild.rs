//! The reconciler: drives horizon computation, window expansion, matching,
//! create-or-update, and the pruning pass for one schedulable parent.

use cadence_core::clock::Clock;
use cadence_core::config::{EngineConfig, UpdateMode};
use cadence_rule::recurrence::{Recurrence, RuleRecurrence};
use cadence_rule::schedule::{RuleKind, Schedule};
use chrono::{DateTime, Utc};

use crate::error::EngineResult;
use crate::expand;
use crate::matching;
use crate::occurrence::Occurrence;
use crate::project;
use crate::registry::RegistryEntry;
use crate::schedulable::Schedulable;
use crate::store::{OccurrenceStore, SaveOutcome};

/// Outcome of one rebuild. `occurrences_with_errors` is the sole surfaced
/// signal for partial failure; a rebuild with per-record save failures still
/// returns `Ok`.
#[derive(Debug, Clone, Default)]
pub struct RebuildReport {
    pub created: usize,
    pub updated: usize,
    pub destroyed: usize,
    pub occurrences_with_errors: Vec<Occurrence>,
}

impl RebuildReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.occurrences_with_errors.is_empty()
    }
}

/// Reconciles the persisted occurrence set of a parent against its schedule.
///
/// Synchronous and single-threaded; callers must keep at most one rebuild in
/// flight per parent, because matching and pruning re-read the collection
/// they mutate within one pass.
pub struct Reconciler<S, C> {
    store: S,
    clock: C,
    config: EngineConfig,
}

impl<S: OccurrenceStore, C: Clock> Reconciler<S, C> {
    pub const fn new(store: S, clock: C, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// ## Summary
    /// Rebuilds the materialized occurrences of one parent: expands the rule
    /// up to the horizon, creates or updates a record per window, then prunes
    /// remaining records the rule no longer produces.
    ///
    /// Nothing before the parent's effective date is created, updated, or
    /// destroyed, and records already in progress or past are never deleted.
    ///
    /// ## Side Effects
    /// Creates, updates, and destroys occurrence records through the store.
    ///
    /// ## Errors
    /// Propagates rule-construction and backend store failures. Per-record
    /// validation failures are collected on the report instead.
    pub fn rebuild(
        &mut self,
        parent: &dyn Schedulable,
        entry: &RegistryEntry,
    ) -> EngineResult<RebuildReport> {
        let Some(schedule) = parent.schedule() else {
            tracing::trace!(schedulable_id = %parent.id(), "No schedule attached, nothing to rebuild");
            return Ok(RebuildReport::default());
        };
        let schedule = schedule.clone();

        let now = self.clock.now();
        let effective_date = parent.effective_date().unwrap_or(now);

        let singular = schedule.rule == RuleKind::Singular;
        let recurrence = if singular {
            None
        } else {
            Some(schedule.recurrence()?)
        };

        let remaining_count = self.store.remaining(parent.id(), now)?.len();
        let last_occurrence = recurrence
            .as_ref()
            .and_then(RuleRecurrence::last_occurrence);
        let mut horizon = crate::horizon::Horizon::compute(
            &self.config,
            &schedule,
            last_occurrence,
            remaining_count,
            now,
        );

        let windows = match &recurrence {
            Some(recurrence) => {
                expand::expand_windows(recurrence, &schedule, effective_date, &mut horizon)
            }
            None => vec![expand::singular_window(&schedule)],
        };

        // Positional matching is the only sound strategy for the single
        // window of a one-shot schedule.
        let mode = if singular {
            UpdateMode::Index
        } else {
            entry.update_mode.unwrap_or(self.config.update_mode)
        };

        let mut report = RebuildReport::default();
        for window in &windows {
            // Re-query so each window sees the effects of earlier ones.
            let remaining = self.store.remaining(parent.id(), now)?;
            let matched = matching::match_existing(mode, window, &remaining);
            let payload = project::build_payload(parent, &entry.schedulable_fields, window);

            if matched.is_empty() {
                let record = self.store.build(parent.id(), &payload);
                match self.store.save(record)? {
                    SaveOutcome::Saved(_) => report.created += 1,
                    SaveOutcome::Rejected(record) => {
                        report.occurrences_with_errors.push(record);
                    }
                }
            } else {
                for id in matched {
                    match self.store.update(id, &payload, true)? {
                        SaveOutcome::Saved(_) => report.updated += 1,
                        SaveOutcome::Rejected(record) => {
                            report.occurrences_with_errors.push(record);
                        }
                    }
                }
            }
        }

        report.destroyed = self.prune(
            parent.id(),
            recurrence.as_ref(),
            effective_date,
            horizon.max_date,
            now,
        )?;

        tracing::debug!(
            schedulable_id = %parent.id(),
            windows = windows.len(),
            created = report.created,
            updated = report.updated,
            destroyed = report.destroyed,
            errors = report.occurrences_with_errors.len(),
            "Rebuilt occurrences"
        );

        Ok(report)
    }

    /// Destroys remaining occurrences that no longer belong: for recurring
    /// rules, records from the effective date on that the rule no longer
    /// produces or that fell past the (possibly tightened) date horizon; for
    /// singular rules, every record after the first. Records at or before
    /// "now" are left untouched as an audit trail.
    fn prune(
        &mut self,
        schedulable_id: uuid::Uuid,
        recurrence: Option<&RuleRecurrence>,
        effective_date: DateTime<Utc>,
        max_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> EngineResult<usize> {
        let remaining = self.store.remaining(schedulable_id, now)?;

        let mut destruction_list: Vec<uuid::Uuid> = Vec::new();
        for (position, record) in remaining.iter().enumerate() {
            let event_time = record.start_time;

            let stale = match recurrence {
                None => position > 0,
                Some(recurrence) => {
                    event_time >= effective_date
                        && (!recurrence.occurs_on(event_time.date_naive())
                            || !recurrence.occurring_at(event_time)
                            || event_time.date_naive() > max_date.date_naive())
                }
            };

            if stale && event_time > now {
                destruction_list.push(record.id);
            }
        }

        for id in &destruction_list {
            tracing::trace!(occurrence_id = %id, "Destroying stale occurrence");
            self.store.destroy(*id)?;
        }
        Ok(destruction_list.len())
    }

    /// ## Summary
    /// Rebuilds only when the schedule actually changed from a previously
    /// captured snapshot. The trailing variant of the save trigger.
    ///
    /// ## Errors
    /// Same as [`Reconciler::rebuild`].
    pub fn rebuild_after_update(
        &mut self,
        parent: &dyn Schedulable,
        entry: &RegistryEntry,
        previous: Option<&Schedule>,
    ) -> EngineResult<RebuildReport> {
        let changed = match (parent.schedule(), previous) {
            (Some(current), Some(previous)) => current.changed_from(previous),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.rebuild(parent, entry)
        } else {
            tracing::trace!(schedulable_id = %parent.id(), "Schedule unchanged, skipping rebuild");
            Ok(RebuildReport::default())
        }
    }

    /// ## Summary
    /// Rebuilds every given parent independently. A fatal failure on one
    /// parent does not stop the batch; each parent's result is reported
    /// alongside its id.
    pub fn rebuild_all<'a>(
        &mut self,
        parents: impl IntoIterator<Item = &'a dyn Schedulable>,
        entry: &RegistryEntry,
    ) -> Vec<(uuid::Uuid, EngineResult<RebuildReport>)> {
        parents
            .into_iter()
            .map(|parent| (parent.id(), self.rebuild(parent, entry)))
            .collect()
    }
}
