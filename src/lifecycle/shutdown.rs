//! Shutdown coordination for the entrypoint.

use std::fmt;

use tokio::sync::broadcast::{self, error::{RecvError, TryRecvError}};

/// The signal that requested shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl ShutdownSignal {
    /// Conventional `128 + signo` exit status.
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownSignal::Interrupt => 130,
            ShutdownSignal::Terminate => 143,
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that every blocking phase of startup selects on.
#[derive(Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<ShutdownSignal>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownSignal> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self, signal: ShutdownSignal) {
        let _ = self.tx.send(signal);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve with the next shutdown signal.
///
/// Pends forever once every sender is gone, so a dropped coordinator never
/// reads as a cancellation.
pub async fn recv_signal(rx: &mut broadcast::Receiver<ShutdownSignal>) -> ShutdownSignal {
    loop {
        match rx.recv().await {
            Ok(signal) => return signal,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}

/// A signal already queued on `rx`, without waiting.
pub fn pending_signal(rx: &mut broadcast::Receiver<ShutdownSignal>) -> Option<ShutdownSignal> {
    loop {
        match rx.try_recv() {
            Ok(signal) => return Some(signal),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
        }
    }
}
