//! Running commands to completion.

use std::future::Future;
use std::io;
use std::process::Stdio;

use tokio::process::Command;

use crate::process::command::{CommandSpec, CommandStatus};

/// Runs a command and reports how it exited.
pub trait StepRunner {
    fn run(&self, command: &CommandSpec) -> impl Future<Output = io::Result<CommandStatus>>;
}

impl<R: StepRunner + ?Sized> StepRunner for &R {
    fn run(&self, command: &CommandSpec) -> impl Future<Output = io::Result<CommandStatus>> {
        (**self).run(command)
    }
}

/// Spawns real child processes.
///
/// Children inherit stdout/stderr, get no stdin, and are killed if the
/// future is dropped (e.g. on shutdown).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl StepRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> io::Result<CommandStatus> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .envs(&command.env)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;
        Ok(status.into())
    }
}
