//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Failed readiness probe:
//!     → backoff.rs (pick the delay before the next attempt)
//!     → readiness wait loop sleeps, bounded by its deadline
//! ```
//!
//! # Design Decisions
//! - Every wait has a deadline unless explicitly disabled
//! - Jittered backoff keeps restarting replicas from probing in lockstep

pub mod backoff;

pub use backoff::{calculate_backoff, next_delay};
