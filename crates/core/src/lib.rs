#![forbid(unsafe_code)]

//! Domain model for study goals, achievements and practice exercises.
//!
//! Everything here is pure: time comes in through [`Clock`] or explicit
//! timestamps, and all derived values are recomputed on demand.

pub mod model;
pub mod time;

pub use time::Clock;
