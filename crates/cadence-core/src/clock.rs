//! Injectable wall-clock source.
//!
//! A rebuild reads "now" exactly once and threads that instant through horizon
//! computation, matching, and pruning, so repeated reads cannot drift within
//! one pass.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by `Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, advanced explicitly. Test use only in
/// practice, but exported so downstream crates can drive time in their own
/// tests. Clones share the instant, so a test can keep a handle after moving
/// the clock into the component under test.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: std::rc::Rc<std::cell::Cell<DateTime<Utc>>>,
}

impl FixedClock {
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: std::rc::Rc::new(std::cell::Cell::new(instant)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.instant.set(instant);
    }

    pub fn advance(&self, delta: chrono::TimeDelta) {
        self.instant.set(self.instant.get() + delta);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant.get()
    }
}
