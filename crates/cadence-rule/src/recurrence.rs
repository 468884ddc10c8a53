//! Rule expansion behind a trait so the engine never handles `rrule` types.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rrule::{Frequency, NWeekday, RRule, RRuleSet, Tz, Unvalidated};

use crate::error::{RuleError, RuleResult};
use crate::schedule::{RuleKind, Schedule};

/// The rule-expansion capability: ordered expansion over a closed interval,
/// two point queries, and the terminal instant of a terminating rule.
pub trait Recurrence {
    /// Occurrence start times within `[start, end]`, ascending.
    fn occurrences_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>>;

    /// Whether the rule fires at any instant on the given calendar day.
    fn occurs_on(&self, day: NaiveDate) -> bool;

    /// Whether the rule fires at exactly this instant.
    fn occurring_at(&self, instant: DateTime<Utc>) -> bool;

    /// The rule's final occurrence, `None` for non-terminating rules.
    fn last_occurrence(&self) -> Option<DateTime<Utc>>;
}

/// `Recurrence` implementation over a validated `rrule::RRuleSet`.
#[derive(Debug, Clone)]
pub struct RuleRecurrence {
    set: RRuleSet,
    terminating: bool,
}

impl Schedule {
    /// ## Summary
    /// Builds the expansion capability for this schedule's rule.
    ///
    /// Maps the rule kind to an RRULE frequency, applies interval, count,
    /// until, BYDAY and nth-weekday parameters, then anchors the set at
    /// `start_time` and punches exdates/rdates through it.
    ///
    /// ## Errors
    /// `UnsupportedRule` for singular schedules (they are materialized
    /// directly, without expansion); `InvalidRule` if the `rrule` crate
    /// rejects the parameter combination.
    pub fn recurrence(&self) -> RuleResult<RuleRecurrence> {
        let frequency = match self.rule {
            RuleKind::Singular => {
                return Err(RuleError::UnsupportedRule(
                    "singular schedules are not expandable",
                ));
            }
            RuleKind::Daily => Frequency::Daily,
            RuleKind::Weekly => Frequency::Weekly,
            RuleKind::Monthly => Frequency::Monthly,
            RuleKind::Yearly => Frequency::Yearly,
        };

        let mut rrule: RRule<Unvalidated> = RRule::new(frequency);

        if let Some(interval) = self.interval {
            rrule = rrule.interval(interval);
        }
        if let Some(count) = self.count {
            let count = u32::try_from(count)
                .map_err(|err| RuleError::InvalidRule(format!("count {count}: {err}")))?;
            rrule = rrule.count(count);
        }
        if let Some(until) = self.until {
            rrule = rrule.until(until.with_timezone(&Tz::UTC));
        }

        let by_weekday: Vec<NWeekday> = match self.rule {
            RuleKind::Weekly => self.days.iter().copied().map(NWeekday::Every).collect(),
            RuleKind::Monthly => self
                .day_of_week
                .iter()
                .map(|&(weekday, nth)| NWeekday::Nth(nth, weekday))
                .collect(),
            _ => Vec::new(),
        };
        if !by_weekday.is_empty() {
            rrule = rrule.by_weekday(by_weekday);
        }

        let dt_start = self.start_time.with_timezone(&Tz::UTC);
        let mut set = rrule
            .build(dt_start)
            .map_err(|err| RuleError::InvalidRule(err.to_string()))?;

        if !self.rdates.is_empty() {
            let rdates: Vec<DateTime<Tz>> = self
                .rdates
                .iter()
                .map(|dt| dt.with_timezone(&Tz::UTC))
                .collect();
            set = set.set_rdates(rdates);
        }
        if !self.exdates.is_empty() {
            let exdates: Vec<DateTime<Tz>> = self
                .exdates
                .iter()
                .map(|dt| dt.with_timezone(&Tz::UTC))
                .collect();
            set = set.set_exdates(exdates);
        }

        tracing::trace!(rule = %self.rule, rrule = %set, "Built recurrence set");

        Ok(RuleRecurrence {
            set,
            terminating: self.is_terminating(),
        })
    }
}

impl RuleRecurrence {
    /// Clamp the set to `[start, end]`. The lower bound is nudged back one
    /// second because `after` is exclusive at the boundary instant.
    fn clamped(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> RRuleSet {
        self.set
            .clone()
            .after((start - TimeDelta::seconds(1)).with_timezone(&Tz::UTC))
            .before(end.with_timezone(&Tz::UTC))
    }

    fn first_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.clamped(start, end)
            .all(1)
            .dates
            .first()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Recurrence for RuleRecurrence {
    fn occurrences_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let result = self.clamped(start, end).all(u16::MAX);
        if result.limited {
            tracing::warn!(%start, %end, "Expansion truncated at the iteration limit");
        }
        result
            .dates
            .into_iter()
            .map(|dt| dt.with_timezone(&Utc))
            .collect()
    }

    fn occurs_on(&self, day: NaiveDate) -> bool {
        let Some(start) = day.and_hms_opt(0, 0, 0) else {
            return false;
        };
        let Some(end) = day.and_hms_opt(23, 59, 59) else {
            return false;
        };
        self.first_between(start.and_utc(), end.and_utc()).is_some()
    }

    fn occurring_at(&self, instant: DateTime<Utc>) -> bool {
        self.first_between(instant, instant) == Some(instant)
    }

    fn last_occurrence(&self) -> Option<DateTime<Utc>> {
        if !self.terminating {
            return None;
        }

        // Terminating sets are finite but can exceed one iteration batch;
        // chase the tail until the iterator reports it ran to completion.
        let mut last: Option<DateTime<Utc>> = None;
        let mut set = self.set.clone();
        loop {
            let result = set.all(u16::MAX);
            if let Some(tail) = result.dates.last() {
                last = Some(tail.with_timezone(&Utc));
            }
            if !result.limited {
                return last;
            }
            let cursor = last?;
            set = self.set.clone().after(cursor.with_timezone(&Tz::UTC));
        }
    }
}
