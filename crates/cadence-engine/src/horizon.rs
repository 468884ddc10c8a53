//! The (date, count) pair bounding how far a rebuild expands.

use cadence_core::config::EngineConfig;
use cadence_rule::schedule::Schedule;
use chrono::{DateTime, Utc};

/// Effective upper bound for occurrence generation. Both axes are bounded
/// independently so a very frequent rule cannot blow the row count and an
/// infrequent one cannot reach arbitrarily far into the future.
///
/// `max_date` may be tightened downward during expansion when a candidate is
/// rejected; the pruning pass then sees the tightened value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub max_date: DateTime<Utc>,
    pub max_count: i64,
}

impl Horizon {
    /// ## Summary
    /// Derives the horizon from global defaults, the rule's own termination,
    /// and the currently persisted remaining occurrences.
    ///
    /// The date bound is `now + max_build_period`, tightened to a terminating
    /// rule's last occurrence. The count bound is `max_build_count`, tightened
    /// to the current remaining count when the rule terminates and at least
    /// one remaining occurrence exists.
    #[must_use]
    pub fn compute(
        config: &EngineConfig,
        schedule: &Schedule,
        last_occurrence: Option<DateTime<Utc>>,
        remaining_count: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let terminating = schedule.is_terminating();

        let mut max_date = now + config.max_build_period();
        if terminating {
            if let Some(last) = last_occurrence {
                max_date = max_date.min(last);
            }
        }

        let mut max_count = config.max_build_count;
        if terminating && remaining_count > 0 {
            max_count = max_count.min(i64::try_from(remaining_count).unwrap_or(i64::MAX));
        }

        Self {
            max_date,
            max_count,
        }
    }

    /// Whether a 1-based accepted-window ordinal is inside the count bound.
    /// A bound of zero or less disables the count axis.
    #[must_use]
    pub fn within_count(&self, position: usize) -> bool {
        self.max_count <= 0 || i64::try_from(position).unwrap_or(i64::MAX) <= self.max_count
    }

    /// Lowers `max_date` to the given instant if it is earlier.
    pub fn tighten(&mut self, date: DateTime<Utc>) {
        self.max_date = self.max_date.min(date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_rule::schedule::RuleKind;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn daily(until: Option<DateTime<Utc>>, count: Option<i64>) -> Schedule {
        let start = now() - TimeDelta::days(1);
        let mut schedule = Schedule::new(RuleKind::Daily, start, start + TimeDelta::hours(1));
        schedule.until = until;
        schedule.count = count;
        schedule
    }

    #[test]
    fn test_non_terminating_uses_global_defaults() {
        let config = EngineConfig::default();
        let horizon = Horizon::compute(&config, &daily(None, None), None, 5, now());

        assert_eq!(horizon.max_date, now() + TimeDelta::days(365));
        assert_eq!(horizon.max_count, 100);
    }

    #[test]
    fn test_terminating_rule_tightens_the_date() {
        let config = EngineConfig::default();
        let last = now() + TimeDelta::days(10);
        let horizon = Horizon::compute(&config, &daily(Some(last), None), Some(last), 0, now());

        assert_eq!(horizon.max_date, last);
        // no remaining occurrences, so the count bound stays global
        assert_eq!(horizon.max_count, 100);
    }

    #[test]
    fn test_terminating_rule_with_remaining_tightens_the_count() {
        let config = EngineConfig::default();
        let last = now() + TimeDelta::days(400);
        let horizon = Horizon::compute(&config, &daily(None, Some(500)), Some(last), 7, now());

        assert_eq!(horizon.max_date, now() + TimeDelta::days(365));
        assert_eq!(horizon.max_count, 7);
    }

    #[test]
    fn test_count_bound_disabled_at_zero() {
        let config = EngineConfig {
            max_build_count: 0,
            ..EngineConfig::default()
        };
        let horizon = Horizon::compute(&config, &daily(None, None), None, 0, now());
        assert!(horizon.within_count(1_000_000));
    }

    #[test]
    fn test_tighten_only_lowers() {
        let config = EngineConfig::default();
        let mut horizon = Horizon::compute(&config, &daily(None, None), None, 0, now());
        let ceiling = horizon.max_date;

        horizon.tighten(ceiling + TimeDelta::days(1));
        assert_eq!(horizon.max_date, ceiling);

        horizon.tighten(ceiling - TimeDelta::days(1));
        assert_eq!(horizon.max_date, ceiling - TimeDelta::days(1));
    }
}
