//! OS signal handling.
//!
//! SIGTERM and SIGINT are translated into a [`Shutdown`] trigger. The
//! handlers only live until the hand-off: `exec` resets caught signals to
//! their default disposition, so the application installs its own.

use std::io;

use crate::lifecycle::shutdown::{Shutdown, ShutdownSignal};

/// Wait for the first termination signal.
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<ShutdownSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = terminate.recv() => Ok(ShutdownSignal::Terminate),
        _ = interrupt.recv() => Ok(ShutdownSignal::Interrupt),
    }
}

#[cfg(not(unix))]
pub async fn wait_for_signal() -> io::Result<ShutdownSignal> {
    tokio::signal::ctrl_c().await?;
    Ok(ShutdownSignal::Interrupt)
}

/// Spawn a task that triggers `shutdown` when a signal arrives.
pub fn spawn_listener(shutdown: Shutdown) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                tracing::warn!(%signal, "Signal received, aborting startup");
                shutdown.trigger(signal);
            }
            Err(e) => tracing::error!(error = %e, "Failed to install signal handlers"),
        }
    });
}
