use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One persisted concrete instance materialized from a schedule.
///
/// `fields` carries the projected subset of parent attributes.
/// `update_from_schedulable` is transient: it marks a record the engine is
/// writing, as opposed to one being edited directly, and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: uuid::Uuid,
    pub schedulable_id: uuid::Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(skip)]
    pub update_from_schedulable: bool,
}

/// The exact data used to create or update one occurrence: projected parent
/// fields merged with the window's start and end.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrencePayload {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

impl Occurrence {
    /// Applies a payload to this record in place, overwriting the window
    /// times and the projected field values while keeping unrelated fields.
    pub fn apply(&mut self, payload: &OccurrencePayload) {
        self.start_time = payload.start_time;
        self.end_time = payload.end_time;
        for (name, value) in &payload.fields {
            self.fields.insert(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn test_apply_overwrites_window_and_projected_fields_only() {
        let start = Utc
            .with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
            .single()
            .expect("valid instant");
        let mut record = Occurrence {
            id: uuid::Uuid::new_v4(),
            schedulable_id: uuid::Uuid::new_v4(),
            start_time: start,
            end_time: start + TimeDelta::hours(1),
            fields: Map::from_iter([
                ("title".to_string(), Value::from("old")),
                ("notes".to_string(), Value::from("kept")),
            ]),
            update_from_schedulable: false,
        };

        let payload = OccurrencePayload {
            start_time: start + TimeDelta::days(1),
            end_time: start + TimeDelta::days(1) + TimeDelta::hours(1),
            fields: Map::from_iter([("title".to_string(), Value::from("new"))]),
        };
        record.apply(&payload);

        assert_eq!(record.start_time, payload.start_time);
        assert_eq!(record.end_time, payload.end_time);
        assert_eq!(record.fields["title"], Value::from("new"));
        assert_eq!(record.fields["notes"], Value::from("kept"));
    }
}
