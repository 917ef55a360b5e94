//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Wait for dependencies → Run steps in order → Hand off to the app
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Abort the current wait or step → Exit 128+signo
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is retried but the wait
//! - Phases run in order, never concurrently
//! - The application starts last and only after every step succeeded

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{pending_signal, recv_signal, Shutdown, ShutdownSignal};
pub use startup::{StartupError, StartupReport, StartupSequencer};
