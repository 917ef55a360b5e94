//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, ports valid)
//! - Detect duplicate step names
//!
//! Returns every problem found, not just the first.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::EntrypointConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("database host must not be empty")]
    EmptyHost,

    #[error("port for {0} must be non-zero")]
    ZeroPort(String),

    #[error("wait.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("wait.max_interval_ms ({max}) is below wait.interval_ms ({base})")]
    MaxIntervalBelowBase { base: u64, max: u64 },

    #[error("wait.connect_timeout_ms must be greater than zero")]
    ZeroConnectTimeout,

    #[error("service entry {0} has an empty host")]
    EmptyServiceHost(String),

    #[error("step #{0} has an empty name")]
    EmptyStepName(usize),

    #[error("step '{0}' is defined more than once")]
    DuplicateStep(String),

    #[error("step '{0}' has an empty program")]
    EmptyProgram(String),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("tests.marker_file must not be empty")]
    EmptyMarker,

    #[error("tests.runner must name a program")]
    EmptyRunner,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &EntrypointConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.database.kind.requires_wait() {
        if config.database.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost);
        }
        if config.database.port == 0 {
            errors.push(ValidationError::ZeroPort("database".to_string()));
        }
    }

    let wait = &config.wait;
    if wait.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if wait.max_interval_ms < wait.interval_ms {
        errors.push(ValidationError::MaxIntervalBelowBase {
            base: wait.interval_ms,
            max: wait.max_interval_ms,
        });
    }
    if wait.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    for service in &wait.services {
        if service.host.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceHost(service.name.clone()));
        }
        if service.port == 0 {
            errors.push(ValidationError::ZeroPort(service.name.clone()));
        }
    }

    let mut seen = HashSet::new();
    for (index, step) in config.steps.iter().enumerate() {
        if step.name.trim().is_empty() {
            errors.push(ValidationError::EmptyStepName(index));
        } else if !seen.insert(step.name.as_str()) {
            errors.push(ValidationError::DuplicateStep(step.name.clone()));
        }
        if step.program.trim().is_empty() {
            errors.push(ValidationError::EmptyProgram(step.name.clone()));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.tests.marker_file.trim().is_empty() {
        errors.push(ValidationError::EmptyMarker);
    }
    if config.tests.runner.first().map_or(true, |p| p.trim().is_empty()) {
        errors.push(ValidationError::EmptyRunner);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DatabaseKind, StepConfig};

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&EntrypointConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = EntrypointConfig::default();
        config.database.kind = DatabaseKind::Postgres;
        config.database.host = " ".into();
        config.database.port = 0;
        config.wait.interval_ms = 500;
        config.wait.max_interval_ms = 100;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyHost));
        assert!(errors.contains(&ValidationError::ZeroPort("database".into())));
        assert!(errors.contains(&ValidationError::MaxIntervalBelowBase { base: 500, max: 100 }));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
    }

    #[test]
    fn test_host_ignored_when_not_waiting() {
        let mut config = EntrypointConfig::default();
        config.database.kind = DatabaseKind::parse("sqlite");
        config.database.host.clear();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_steps() {
        let mut config = EntrypointConfig::default();
        config.steps.push(StepConfig {
            name: "migrate".into(),
            program: String::new(),
            args: vec![],
            env: Default::default(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateStep("migrate".into()),
                ValidationError::EmptyProgram("migrate".into()),
            ]
        );
    }
}
