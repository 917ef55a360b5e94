//! Startup orchestration.
//!
//! # Responsibilities
//! - Wait for the database (only when it is postgres) and extra services
//! - Run the pre-start steps (migrate, collectstatic) in configured order
//! - Report what happened so the caller can hand off to the application
//!
//! # Design Decisions
//! - Fail fast: a failing step stops startup with that step's exit code
//! - Steps run strictly one after another, never concurrently
//! - The hand-off itself stays with the caller, after the runtime is done

use std::io;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::EntrypointConfig;
use crate::lifecycle::shutdown::{recv_signal, ShutdownSignal};
use crate::process::{CommandSpec, CommandStatus, StepRunner};
use crate::readiness::{Probe, ReadinessWaiter, Target, WaitError, WaitPolicy, WaitReport};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error("step '{step}' failed with {status}")]
    StepFailed { step: String, status: CommandStatus },

    #[error("step '{step}' could not be started: {source}")]
    Spawn { step: String, source: io::Error },

    #[error("step '{step}' interrupted by {signal}")]
    Interrupted { step: String, signal: ShutdownSignal },
}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::Wait(WaitError::Cancelled { signal, .. }) => signal.exit_code(),
            StartupError::Wait(_) => 1,
            StartupError::StepFailed { status, .. } => status.code(),
            StartupError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => 127,
            StartupError::Spawn { .. } => 126,
            StartupError::Interrupted { signal, .. } => signal.exit_code(),
        }
    }
}

/// What a successful startup did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupReport {
    /// One entry per awaited target; empty when waiting was skipped.
    pub waits: Vec<WaitReport>,
    /// Names of the steps that ran, in order.
    pub steps: Vec<String>,
}

/// Runs everything that must happen before the application starts.
pub struct StartupSequencer<P, R> {
    config: EntrypointConfig,
    waiter: ReadinessWaiter<P>,
    runner: R,
}

impl<P: Probe, R: StepRunner> StartupSequencer<P, R> {
    pub fn new(config: EntrypointConfig, probe: P, runner: R) -> Self {
        let waiter = ReadinessWaiter::new(probe, WaitPolicy::from(&config.wait));
        Self {
            config,
            waiter,
            runner,
        }
    }

    /// Targets awaited before the steps, in order.
    pub fn targets(&self) -> Vec<Target> {
        if !self.config.database.kind.requires_wait() {
            return Vec::new();
        }

        std::iter::once(Target::database(&self.config.database))
            .chain(self.config.wait.services.iter().map(Target::from))
            .collect()
    }

    pub async fn run(
        &self,
        shutdown: &mut broadcast::Receiver<ShutdownSignal>,
    ) -> Result<StartupReport, StartupError> {
        let mut report = StartupReport::default();

        let targets = self.targets();
        if targets.is_empty() {
            tracing::info!(database = %self.config.database.kind, "Database is not postgres, skipping wait");
        } else if self.config.wait.is_unbounded() {
            tracing::warn!("Wait has neither timeout nor attempt cap; startup blocks until reachable");
        }

        for target in &targets {
            report.waits.push(self.waiter.wait_for(target, shutdown).await?);
        }

        for step in &self.config.steps {
            let command = CommandSpec::from(step);
            self.run_step(&command, shutdown).await?;
            report.steps.push(command.name);
        }

        Ok(report)
    }

    async fn run_step(
        &self,
        command: &CommandSpec,
        shutdown: &mut broadcast::Receiver<ShutdownSignal>,
    ) -> Result<(), StartupError> {
        tracing::info!(step = %command.name, command = %command, "Running step");

        let status = tokio::select! {
            biased;
            signal = recv_signal(shutdown) => {
                return Err(StartupError::Interrupted { step: command.name.clone(), signal });
            }
            res = self.runner.run(command) => res.map_err(|source| StartupError::Spawn {
                step: command.name.clone(),
                source,
            })?,
        };

        if !status.success() {
            tracing::error!(step = %command.name, code = status.code(), "Step failed");
            return Err(StartupError::StepFailed {
                step: command.name.clone(),
                status,
            });
        }

        tracing::info!(step = %command.name, "Step completed");
        Ok(())
    }
}
