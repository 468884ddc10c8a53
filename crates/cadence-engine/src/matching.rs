//! Pairing expanded windows against existing remaining occurrence records.

use cadence_core::config::UpdateMode;

use crate::expand::Window;
use crate::occurrence::Occurrence;

/// ## Summary
/// Resolves which existing records a window should update.
///
/// `Index` pairs the i-th window with the i-th remaining record, which is
/// fragile under reordering but exactly right for one-shot schedules.
/// `Datetime` matches every record sharing the window's calendar day,
/// ignoring time of day; zero, one, or many matches are possible. `Unknown`
/// never matches, which forces creation.
#[must_use]
pub fn match_existing(mode: UpdateMode, window: &Window, remaining: &[Occurrence]) -> Vec<uuid::Uuid> {
    match mode {
        UpdateMode::Index => remaining
            .get(window.index - 1)
            .map(|record| record.id)
            .into_iter()
            .collect(),
        UpdateMode::Datetime => {
            let day = window.start_time.date_naive();
            remaining
                .iter()
                .filter(|record| record.start_time.date_naive() == day)
                .map(|record| record.id)
                .collect()
        }
        UpdateMode::Unknown => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use serde_json::Map;

    fn record_at(start: DateTime<Utc>) -> Occurrence {
        Occurrence {
            id: uuid::Uuid::new_v4(),
            schedulable_id: uuid::Uuid::new_v4(),
            start_time: start,
            end_time: start + TimeDelta::hours(1),
            fields: Map::new(),
            update_from_schedulable: false,
        }
    }

    fn window_at(index: usize, start: DateTime<Utc>) -> Window {
        Window {
            index,
            start_time: start,
            end_time: start + TimeDelta::hours(1),
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn test_index_mode_is_positional() {
        let remaining = vec![record_at(base()), record_at(base() + TimeDelta::days(1))];

        let matched = match_existing(UpdateMode::Index, &window_at(2, base()), &remaining);
        assert_eq!(matched, vec![remaining[1].id]);

        let matched = match_existing(UpdateMode::Index, &window_at(3, base()), &remaining);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_datetime_mode_matches_every_record_on_the_day() {
        let remaining = vec![
            record_at(base()),
            record_at(base() + TimeDelta::hours(5)),
            record_at(base() + TimeDelta::days(1)),
        ];

        let matched = match_existing(
            UpdateMode::Datetime,
            &window_at(1, base() + TimeDelta::hours(2)),
            &remaining,
        );
        assert_eq!(matched, vec![remaining[0].id, remaining[1].id]);
    }

    #[test]
    fn test_unknown_mode_never_matches() {
        let remaining = vec![record_at(base())];
        let matched = match_existing(UpdateMode::Unknown, &window_at(1, base()), &remaining);
        assert!(matched.is_empty());
    }
}
