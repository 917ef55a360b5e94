//! Readiness checking subsystem.
//!
//! # Data Flow
//! ```text
//! Startup sequencer
//!     → wait.rs (retry loop with backoff and deadline)
//!     → probe.rs (one TCP connection attempt per iteration)
//!     → state.rs (Waiting → Ready on first success)
//! ```
//!
//! # Design Decisions
//! - A probe is a bare TCP connect; protocol handshakes belong to the app
//! - Probes go through a trait so the loop can be driven without sockets
//! - Every failed probe is logged with its attempt number

pub mod probe;
pub mod state;
pub mod wait;

pub use probe::{Probe, Target, TcpProbe};
pub use state::ReadinessState;
pub use wait::{ReadinessWaiter, WaitError, WaitPolicy, WaitReport};
