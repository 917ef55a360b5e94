//! Bounded wait for a target to accept connections.
//!
//! # Responsibilities
//! - Probe a target until it answers
//! - Sleep between attempts according to the backoff strategy
//! - Give up on the deadline or attempt cap with a distinct error
//! - Abort promptly on a shutdown signal

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::{BackoffStrategy, WaitConfig};
use crate::lifecycle::shutdown::{pending_signal, recv_signal, ShutdownSignal};
use crate::readiness::probe::{Probe, Target};
use crate::readiness::state::ReadinessState;
use crate::resilience::next_delay;

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("{name} at {address} still unreachable after {attempts} attempts in {elapsed:?}: {last_error}")]
    TimedOut {
        name: String,
        address: String,
        attempts: u32,
        elapsed: Duration,
        last_error: String,
    },

    #[error("{name} at {address} unreachable after {attempts} attempts: {last_error}")]
    AttemptsExhausted {
        name: String,
        address: String,
        attempts: u32,
        last_error: String,
    },

    #[error("wait for {name} cancelled by {signal}")]
    Cancelled { name: String, signal: ShutdownSignal },
}

/// Retry parameters for one wait.
#[derive(Debug, Clone)]
pub struct WaitPolicy {
    pub strategy: BackoffStrategy,
    pub base_ms: u64,
    pub max_ms: u64,
    pub connect_timeout: Duration,
    pub deadline: Option<Duration>,
    pub max_attempts: Option<u32>,
}

impl From<&WaitConfig> for WaitPolicy {
    fn from(config: &WaitConfig) -> Self {
        Self {
            strategy: config.strategy,
            base_ms: config.interval_ms,
            max_ms: config.max_interval_ms,
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            deadline: (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs)),
            max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
        }
    }
}

/// Outcome of a successful wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitReport {
    pub name: String,
    /// Probes issued, including the successful one.
    pub attempts: u32,
    pub elapsed: Duration,
}

impl WaitReport {
    pub fn failed_attempts(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Drives a [`Probe`] until the target is ready.
pub struct ReadinessWaiter<P> {
    probe: P,
    policy: WaitPolicy,
}

impl<P: Probe> ReadinessWaiter<P> {
    pub fn new(probe: P, policy: WaitPolicy) -> Self {
        Self { probe, policy }
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Block until `target` accepts a connection.
    pub async fn wait_for(
        &self,
        target: &Target,
        shutdown: &mut broadcast::Receiver<ShutdownSignal>,
    ) -> Result<WaitReport, WaitError> {
        let started = Instant::now();
        let mut state = ReadinessState::Waiting;
        let mut attempts = 0u32;

        tracing::info!(address = %target, "Waiting for {}...", target.name);

        loop {
            attempts += 1;

            let attempt = time::timeout(self.policy.connect_timeout, self.probe.probe(target));
            let outcome = tokio::select! {
                biased;
                signal = recv_signal(shutdown) => {
                    return Err(WaitError::Cancelled { name: target.name.clone(), signal });
                }
                res = attempt => match res {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err(format!("connect timed out after {:?}", self.policy.connect_timeout)),
                },
            };

            state = state.observe(outcome.is_ok());
            let last_error = match outcome {
                Ok(()) => String::new(),
                Err(e) => e,
            };

            if state.is_ready() {
                let elapsed = started.elapsed();
                tracing::info!(address = %target, attempts, elapsed_ms = elapsed.as_millis() as u64, "{} started", target.name);
                return Ok(WaitReport {
                    name: target.name.clone(),
                    attempts,
                    elapsed,
                });
            }

            tracing::warn!(address = %target, attempt = attempts, error = %last_error, "{} not ready", target.name);

            // A signal that raced the probe wins over giving up.
            if let Some(signal) = pending_signal(shutdown) {
                return Err(WaitError::Cancelled { name: target.name.clone(), signal });
            }

            if self.policy.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(WaitError::AttemptsExhausted {
                    name: target.name.clone(),
                    address: target.to_string(),
                    attempts,
                    last_error,
                });
            }

            let delay = next_delay(self.policy.strategy, attempts, self.policy.base_ms, self.policy.max_ms);
            if let Some(deadline) = self.policy.deadline {
                let elapsed = started.elapsed();
                if elapsed + delay > deadline {
                    return Err(WaitError::TimedOut {
                        name: target.name.clone(),
                        address: target.to_string(),
                        attempts,
                        elapsed,
                        last_error,
                    });
                }
            }

            tokio::select! {
                biased;
                signal = recv_signal(shutdown) => {
                    return Err(WaitError::Cancelled { name: target.name.clone(), signal });
                }
                _ = time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use crate::observability::logging::{fmt_layer, LogCapture};
    use std::cell::Cell;
    use std::io;
    use tracing_subscriber::layer::SubscriberExt;

    /// Fails the first `failures` probes, then succeeds.
    struct FlakyProbe {
        failures: u32,
        calls: Cell<u32>,
    }

    impl FlakyProbe {
        fn new(failures: u32) -> Self {
            Self { failures, calls: Cell::new(0) }
        }
    }

    impl Probe for FlakyProbe {
        async fn probe(&self, _target: &Target) -> io::Result<()> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n < self.failures {
                Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
            } else {
                Ok(())
            }
        }
    }

    fn policy() -> WaitPolicy {
        WaitPolicy {
            strategy: BackoffStrategy::Fixed,
            base_ms: 1,
            max_ms: 1,
            connect_timeout: Duration::from_millis(100),
            deadline: Some(Duration::from_secs(5)),
            max_attempts: None,
        }
    }

    fn target() -> Target {
        Target::new("postgres", "db", 5432)
    }

    #[tokio::test]
    async fn test_ready_after_failures() {
        let probe = FlakyProbe::new(3);
        let waiter = ReadinessWaiter::new(&probe, policy());
        let shutdown = Shutdown::new();

        let report = waiter.wait_for(&target(), &mut shutdown.subscribe()).await.unwrap();

        assert_eq!(report.attempts, 4);
        assert_eq!(report.failed_attempts(), 3);
        assert_eq!(probe.calls.get(), 4);
    }

    #[tokio::test]
    async fn test_attempt_cap() {
        let probe = FlakyProbe::new(u32::MAX);
        let waiter = ReadinessWaiter::new(&probe, WaitPolicy { max_attempts: Some(3), ..policy() });
        let shutdown = Shutdown::new();

        let err = waiter.wait_for(&target(), &mut shutdown.subscribe()).await.unwrap_err();

        assert!(matches!(err, WaitError::AttemptsExhausted { attempts: 3, .. }));
        assert_eq!(probe.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_deadline() {
        let probe = FlakyProbe::new(u32::MAX);
        let waiter = ReadinessWaiter::new(
            &probe,
            WaitPolicy {
                base_ms: 20,
                max_ms: 20,
                deadline: Some(Duration::from_millis(50)),
                ..policy()
            },
        );
        let shutdown = Shutdown::new();

        let err = waiter.wait_for(&target(), &mut shutdown.subscribe()).await.unwrap_err();

        match err {
            WaitError::TimedOut { attempts, last_error, .. } => {
                assert!(attempts >= 1 && attempts <= 3);
                assert_eq!(last_error, "refused");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_by_signal() {
        // The next sleep alone would cross the deadline, so anything but
        // Cancelled means the queued signal lost to the give-up checks.
        for _ in 0..100 {
            let probe = FlakyProbe::new(u32::MAX);
            let waiter = ReadinessWaiter::new(
                &probe,
                WaitPolicy { base_ms: 10_000, max_ms: 10_000, ..policy() },
            );
            let shutdown = Shutdown::new();
            let mut rx = shutdown.subscribe();
            shutdown.trigger(ShutdownSignal::Interrupt);

            let err = waiter.wait_for(&target(), &mut rx).await.unwrap_err();

            assert!(
                matches!(err, WaitError::Cancelled { signal: ShutdownSignal::Interrupt, .. }),
                "unexpected error: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_signal_during_last_attempt_wins() {
        /// Refuses, but raises SIGTERM while the attempt is in flight.
        struct SignalMidAttempt(Shutdown);

        impl Probe for SignalMidAttempt {
            async fn probe(&self, _target: &Target) -> io::Result<()> {
                self.0.trigger(ShutdownSignal::Terminate);
                Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
            }
        }

        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let waiter = ReadinessWaiter::new(
            SignalMidAttempt(shutdown.clone()),
            WaitPolicy { max_attempts: Some(1), ..policy() },
        );

        let err = waiter.wait_for(&target(), &mut rx).await.unwrap_err();

        assert!(matches!(err, WaitError::Cancelled { signal: ShutdownSignal::Terminate, .. }));
    }

    #[tokio::test]
    async fn test_status_lines() {
        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::registry().with(fmt_layer(capture.clone(), false));
        let _guard = tracing::subscriber::set_default(subscriber);

        let probe = FlakyProbe::new(3);
        let waiter = ReadinessWaiter::new(&probe, policy());
        waiter.wait_for(&target(), &mut Shutdown::new().subscribe()).await.unwrap();

        let lines = capture.lines();
        assert!(lines[0].contains("Waiting for postgres..."), "got: {lines:?}");

        let not_ready: Vec<_> = lines.iter().filter(|l| l.contains("postgres not ready")).collect();
        assert_eq!(not_ready.len(), 3, "got: {lines:?}");
        for (i, line) in not_ready.iter().enumerate() {
            assert!(line.contains(&format!("attempt={}", i + 1)), "got: {line}");
        }

        assert_eq!(lines.iter().filter(|l| l.contains("postgres started")).count(), 1);
        assert!(lines[4].contains("postgres started"), "got: {lines:?}");
        assert_eq!(lines.len(), 5);
    }

    #[tokio::test]
    async fn test_slow_probe_counts_as_failure() {
        struct Hang;
        impl Probe for Hang {
            async fn probe(&self, _target: &Target) -> io::Result<()> {
                std::future::pending().await
            }
        }

        let waiter = ReadinessWaiter::new(
            Hang,
            WaitPolicy {
                connect_timeout: Duration::from_millis(10),
                max_attempts: Some(2),
                ..policy()
            },
        );
        let shutdown = Shutdown::new();

        let err = waiter.wait_for(&target(), &mut shutdown.subscribe()).await.unwrap_err();
        assert!(err.to_string().contains("connect timed out"));
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = WaitConfig::default();
        config.timeout_secs = 0;
        config.max_attempts = 7;

        let policy = WaitPolicy::from(&config);
        assert_eq!(policy.deadline, None);
        assert_eq!(policy.max_attempts, Some(7));
        assert_eq!(policy.connect_timeout, Duration::from_millis(1000));
    }
}
