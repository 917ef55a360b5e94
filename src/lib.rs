//! Container entrypoint and test tooling for the authentication service.

pub mod config;
pub mod harness;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod readiness;
pub mod resilience;

pub use config::EntrypointConfig;
pub use lifecycle::{Shutdown, StartupSequencer};
pub use process::Handoff;
