//! The schedule attached to a schedulable parent: a rule kind plus the
//! parameters the expansion capability needs.

use chrono::{DateTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Kind tag for a schedule's rule. `Singular` marks a one-shot,
/// non-recurring schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Singular,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RuleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Singular => "singular",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence rule owned one-to-one by a schedulable parent.
///
/// `start_time`/`end_time` fix the first window and the duration of every
/// window. `until` and `count` terminate the rule; `days` feeds weekly BYDAY
/// and `day_of_week` the monthly nth-weekday form. `exdates`/`rdates` punch
/// individual instants out of, or into, the expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rule: RuleKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub interval: Option<u16>,
    #[serde(default)]
    pub days: Vec<Weekday>,
    #[serde(default)]
    pub day_of_week: Vec<(Weekday, i16)>,
    #[serde(default)]
    pub exdates: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub rdates: Vec<DateTime<Utc>>,
}

impl Schedule {
    #[must_use]
    pub const fn new(rule: RuleKind, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            rule,
            start_time,
            end_time,
            until: None,
            count: None,
            interval: None,
            days: Vec::new(),
            day_of_week: Vec::new(),
            exdates: Vec::new(),
            rdates: Vec::new(),
        }
    }

    /// ## Summary
    /// Whether the rule has a defined end.
    ///
    /// A `count` of exactly one is not treated as terminating; the original
    /// data model uses it interchangeably with a singular rule.
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        self.rule != RuleKind::Singular
            && (self.until.is_some() || self.count.is_some_and(|count| count > 1))
    }

    /// Duration of each materialized window, floored at zero.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        (self.end_time - self.start_time).max(TimeDelta::zero())
    }

    /// ## Summary
    /// Whether any attribute differs from a previously captured snapshot.
    /// Drives the rebuild-after-update trigger.
    #[must_use]
    pub fn changed_from(&self, previous: &Self) -> bool {
        self != previous
    }
}
