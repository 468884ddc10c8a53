//! Shared foundation for the cadence workspace: configuration, the core
//! error type, and the clock abstraction every time comparison goes through.

pub mod clock;
pub mod config;
pub mod error;
