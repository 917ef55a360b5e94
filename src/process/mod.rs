//! External process subsystem.
//!
//! # Data Flow
//! ```text
//! StepConfig / test runner argv
//!     → command.rs (CommandSpec: program, args, env)
//!     → runner.rs (spawn, wait, collect CommandStatus)
//!
//! Trailing entrypoint arguments
//!     → handoff.rs (exec: replace this process image)
//! ```
//!
//! # Design Decisions
//! - Commands are never run through a shell; argv is passed as given
//! - Children inherit stdio so framework output reaches the container log
//! - Steps go through the StepRunner trait; the hand-off does not

pub mod command;
pub mod handoff;
pub mod runner;

pub use command::{CommandSpec, CommandStatus};
pub use handoff::{Handoff, HandoffError};
pub use runner::{StepRunner, SystemRunner};
