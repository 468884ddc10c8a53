use cadence_rule::schedule::Schedule;
use chrono::{DateTime, Utc};

/// The parent entity seam: whatever owns a schedule and a set of occurrences.
///
/// `effective_date` is the per-rebuild cutover instant; `None` means "now".
/// No create, update, or delete ever touches occurrences whose start time
/// precedes it.
pub trait Schedulable {
    fn id(&self) -> uuid::Uuid;

    fn schedule(&self) -> Option<&Schedule>;

    fn effective_date(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Current value of a named attribute, for projection into occurrences.
    /// `None` when the parent has no such attribute.
    fn field(&self, name: &str) -> Option<serde_json::Value>;
}
