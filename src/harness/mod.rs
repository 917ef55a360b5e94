//! Test tooling for the authentication suites.
//!
//! # Data Flow
//! ```text
//! run-tests:
//!     launcher.rs (marker file check in the working directory)
//!     → delegate to the suite runner with --quick by default
//!
//! auth-suite:
//!     plan.rs (selection flags → ordered jobs)
//!     → runner.rs (setup, then one framework test command per job)
//!     → report.rs (PASSED/FAILED summary, exit status)
//! ```

pub mod launcher;
pub mod plan;
pub mod report;
pub mod runner;

pub use launcher::{LaunchError, TestLauncher};
pub use plan::{Job, Selection, Suite};
pub use report::{JobResult, SuiteReport};
pub use runner::SuiteRunner;
