//! Readiness state machine.
//!
//! # States
//! - Waiting: probing, startup blocked
//! - Ready: target reachable, terminal
//!
//! # State Transitions
//! ```text
//! Waiting → Ready: a probe succeeds
//! Waiting → Waiting: a probe fails
//! Ready → Ready: always
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Waiting,
    Ready,
}

impl ReadinessState {
    /// Apply the outcome of one probe.
    pub fn observe(self, probe_succeeded: bool) -> Self {
        match self {
            ReadinessState::Ready => ReadinessState::Ready,
            ReadinessState::Waiting if probe_succeeded => ReadinessState::Ready,
            ReadinessState::Waiting => ReadinessState::Waiting,
        }
    }

    pub fn is_ready(self) -> bool {
        self == ReadinessState::Ready
    }
}
