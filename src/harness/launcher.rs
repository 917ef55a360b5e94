//! Project-root check and delegation to the test runner.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::TestsConfig;
use crate::process::{CommandSpec, CommandStatus, StepRunner};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Please run this script from the project root directory ({marker} not found in {dir})")]
    NotProjectRoot { marker: String, dir: String },

    #[error("cannot start test runner {program}: {source}")]
    Spawn { program: String, source: io::Error },
}

impl LaunchError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::NotProjectRoot { .. } => 1,
            LaunchError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => 127,
            LaunchError::Spawn { .. } => 126,
        }
    }
}

/// Checks the working directory and hands over to the runner.
#[derive(Debug, Clone)]
pub struct TestLauncher {
    root: PathBuf,
    marker: String,
    runner: Vec<String>,
    default_args: Vec<String>,
}

impl TestLauncher {
    pub fn new(root: impl Into<PathBuf>, config: &TestsConfig) -> Self {
        Self {
            root: root.into(),
            marker: config.marker_file.clone(),
            runner: config.runner.clone(),
            default_args: config.default_args.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fails unless the marker file exists in the root.
    pub fn check_root(&self) -> Result<(), LaunchError> {
        if self.root.join(&self.marker).is_file() {
            Ok(())
        } else {
            Err(LaunchError::NotProjectRoot {
                marker: self.marker.clone(),
                dir: self.root.display().to_string(),
            })
        }
    }

    /// Runner command for the given user arguments.
    ///
    /// No arguments selects the defaults (`--quick`); any arguments replace them.
    pub fn invocation(&self, user_args: &[String]) -> CommandSpec {
        let (program, base) = match self.runner.split_first() {
            Some((program, base)) => (program.as_str(), base),
            None => ("", &[][..]),
        };
        let extra = if user_args.is_empty() {
            &self.default_args[..]
        } else {
            user_args
        };

        CommandSpec::new("test-runner", program)
            .args(base.iter().cloned())
            .args(extra.iter().cloned())
    }

    pub async fn launch<R: StepRunner>(
        &self,
        runner: R,
        user_args: &[String],
    ) -> Result<CommandStatus, LaunchError> {
        self.check_root()?;

        let command = self.invocation(user_args);
        tracing::info!(command = %command, "Starting test runner");

        runner.run(&command).await.map_err(|source| LaunchError::Spawn {
            program: command.program.clone(),
            source,
        })
    }
}
