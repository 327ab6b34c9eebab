//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`Clock`] - Source of the current instant for timer deadlines

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
