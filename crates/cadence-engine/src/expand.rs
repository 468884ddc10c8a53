//! Expansion of a schedule's rule into concrete occurrence windows, bounded
//! by a [`Horizon`].

use cadence_rule::recurrence::Recurrence;
use cadence_rule::schedule::Schedule;
use chrono::{DateTime, Utc};

use crate::horizon::Horizon;

/// One accepted `(start_time, end_time)` window. `index` is the 1-based
/// position within the accepted sequence and drives positional matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub index: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_else(|| instant.naive_utc())
        .and_utc()
}

/// ## Summary
/// Expands a non-singular rule between the effective date's start of day and
/// the horizon, filtering the results against both bounds.
///
/// Candidates at or before the effective date are dropped without consuming
/// a count slot, so at most `max_count` windows come back. A candidate
/// rejected by either bound tightens `horizon.max_date` down to its instant,
/// so the pruning pass later in the same rebuild sees the tightened ceiling.
pub fn expand_windows(
    recurrence: &dyn Recurrence,
    schedule: &Schedule,
    effective_date: DateTime<Utc>,
    horizon: &mut Horizon,
) -> Vec<Window> {
    let duration = schedule.duration();
    let candidates = recurrence.occurrences_between(start_of_day(effective_date), horizon.max_date);
    let candidate_count = candidates.len();

    let mut windows: Vec<Window> = Vec::new();
    for date in candidates {
        if date <= effective_date {
            continue;
        }
        if date < horizon.max_date && horizon.within_count(windows.len() + 1) {
            windows.push(Window {
                index: windows.len() + 1,
                start_time: date,
                end_time: date + duration,
            });
        } else {
            horizon.tighten(date);
        }
    }

    tracing::trace!(
        candidates = candidate_count,
        accepted = windows.len(),
        max_date = %horizon.max_date,
        "Expanded occurrence windows"
    );

    windows
}

/// The single unconditioned window of a singular schedule. Horizons do not
/// apply to one-shot rules.
#[must_use]
pub fn singular_window(schedule: &Schedule) -> Window {
    Window {
        index: 1,
        start_time: schedule.start_time,
        end_time: schedule.end_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_rule::schedule::RuleKind;
    use chrono::{NaiveDate, TimeDelta, TimeZone};

    /// Canned recurrence handing back a fixed date list.
    struct FixedDates(Vec<DateTime<Utc>>);

    impl Recurrence for FixedDates {
        fn occurrences_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Vec<DateTime<Utc>> {
            self.0
                .iter()
                .copied()
                .filter(|date| *date >= start && *date <= end)
                .collect()
        }

        fn occurs_on(&self, day: NaiveDate) -> bool {
            self.0.iter().any(|date| date.date_naive() == day)
        }

        fn occurring_at(&self, instant: DateTime<Utc>) -> bool {
            self.0.contains(&instant)
        }

        fn last_occurrence(&self) -> Option<DateTime<Utc>> {
            self.0.last().copied()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn schedule() -> Schedule {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid instant");
        Schedule::new(RuleKind::Daily, start, start + TimeDelta::hours(1))
    }

    fn daily_dates(first: DateTime<Utc>, count: i64) -> Vec<DateTime<Utc>> {
        (0..count).map(|day| first + TimeDelta::days(day)).collect()
    }

    #[test]
    fn test_candidates_at_or_before_effective_date_are_dropped() {
        let schedule = schedule();
        let mut horizon = Horizon {
            max_date: now() + TimeDelta::days(30),
            max_count: 100,
        };
        // 2026-03-02 09:00 precedes the effective instant (12:00)
        let dates = daily_dates(schedule.start_time + TimeDelta::days(1), 5);
        let recurrence = FixedDates(dates);

        let windows = expand_windows(&recurrence, &schedule, now(), &mut horizon);

        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].start_time, now() - TimeDelta::hours(3) + TimeDelta::days(1));
        assert_eq!(windows[0].index, 1);
        assert_eq!(
            windows[0].end_time - windows[0].start_time,
            TimeDelta::hours(1)
        );
    }

    #[test]
    fn test_dropped_candidates_do_not_consume_count_slots() {
        let schedule = schedule();
        let mut horizon = Horizon {
            max_date: now() + TimeDelta::days(30),
            max_count: 3,
        };
        let dates = daily_dates(schedule.start_time + TimeDelta::days(1), 6);
        let recurrence = FixedDates(dates.clone());

        let windows = expand_windows(&recurrence, &schedule, now(), &mut horizon);

        // 2026-03-02 09:00 is dropped by the effective-date filter without
        // using a slot, so the next three candidates all materialize
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[2].start_time, dates[3]);
        // the first over-count candidate tightens the date bound
        assert_eq!(horizon.max_date, dates[4]);
    }

    #[test]
    fn test_candidate_at_max_date_is_rejected() {
        let schedule = schedule();
        // exactly the 2026-03-04 09:00 candidate
        let ceiling = now() + TimeDelta::days(2) - TimeDelta::hours(3);
        let mut horizon = Horizon {
            max_date: ceiling,
            max_count: 100,
        };
        let dates = daily_dates(schedule.start_time + TimeDelta::days(1), 10);
        let recurrence = FixedDates(dates);

        let windows = expand_windows(&recurrence, &schedule, now(), &mut horizon);

        // acceptance is strictly below max_date, so only 2026-03-03 survives
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start_time, ceiling - TimeDelta::days(1));
        assert_eq!(horizon.max_date, ceiling);
    }

    #[test]
    fn test_singular_window_ignores_horizon() {
        let mut schedule = schedule();
        schedule.rule = RuleKind::Singular;
        let window = singular_window(&schedule);

        assert_eq!(window.index, 1);
        assert_eq!(window.start_time, schedule.start_time);
        assert_eq!(window.end_time, schedule.end_time);
    }
}
