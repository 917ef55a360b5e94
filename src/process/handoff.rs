//! Process replacement.
//!
//! The entrypoint finishes by becoming the application: on Unix the trailing
//! argv is `exec`ed so the application keeps this PID, its open descriptors,
//! and receives container signals directly.

use std::ffi::{OsStr, OsString};
use std::io;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("command not found: {program}")]
    NotFound { program: String, source: io::Error },

    #[error("cannot execute {program}: {source}")]
    Exec { program: String, source: io::Error },
}

impl HandoffError {
    /// Shell-compatible status: 127 for a missing program, 126 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            HandoffError::NotFound { .. } => 127,
            HandoffError::Exec { .. } => 126,
        }
    }

    fn from_io(program: &OsStr, source: io::Error) -> Self {
        let program = program.to_string_lossy().into_owned();
        if source.kind() == io::ErrorKind::NotFound {
            HandoffError::NotFound { program, source }
        } else {
            HandoffError::Exec { program, source }
        }
    }
}

/// The command the entrypoint turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    argv: Vec<OsString>,
}

impl Handoff {
    /// `None` when there is nothing to run.
    pub fn new(argv: Vec<OsString>) -> Option<Self> {
        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    /// Build the command with argv passed through untouched.
    pub fn command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args());
        command
    }

    /// Replace the current process. Returns only if the exec failed.
    #[cfg(unix)]
    pub fn exec(self) -> HandoffError {
        use std::os::unix::process::CommandExt;

        tracing::info!(program = %self.program().to_string_lossy(), args = self.args().len(), "Handing off");
        let err = self.command().exec();
        HandoffError::from_io(self.program(), err)
    }

    /// Without `exec`, run the command as a child and exit with its status.
    #[cfg(not(unix))]
    pub fn exec(self) -> HandoffError {
        tracing::info!(program = %self.program().to_string_lossy(), args = self.args().len(), "Handing off");
        match self.command().status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(err) => HandoffError::from_io(self.program(), err),
        }
    }
}
