//! Schedule model and the recurrence-rule expansion capability.
//!
//! The recurrence math itself is delegated to the `rrule` crate; this crate
//! wraps it behind the [`recurrence::Recurrence`] trait so the engine only
//! sees ordered occurrence instants and point queries.

pub mod error;
pub mod recurrence;
pub mod schedule;
