//! Projection of configured parent attributes into occurrence payloads.

use serde_json::{Map, Value};

use crate::expand::Window;
use crate::occurrence::OccurrencePayload;
use crate::schedulable::Schedulable;

/// ## Summary
/// Reads each configured field's current value off the parent into a flat
/// key-value map. Fields the parent does not expose are skipped rather than
/// failing the rebuild.
#[must_use]
pub fn project_fields(parent: &dyn Schedulable, fields: &[String]) -> Map<String, Value> {
    let mut data = Map::with_capacity(fields.len());
    for name in fields {
        if let Some(value) = parent.field(name) {
            data.insert(name.clone(), value);
        } else {
            tracing::trace!(
                schedulable_id = %parent.id(),
                field = %name,
                "Configured field missing on schedulable, skipping"
            );
        }
    }
    data
}

/// The projected parent fields merged with the window's start and end: the
/// exact data used to create or update one occurrence.
#[must_use]
pub fn build_payload(parent: &dyn Schedulable, fields: &[String], window: &Window) -> OccurrencePayload {
    OccurrencePayload {
        start_time: window.start_time,
        end_time: window.end_time,
        fields: project_fields(parent, fields),
    }
}
