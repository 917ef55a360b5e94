//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{DatabaseKind, EntrypointConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, without applying the environment or validating.
pub fn load_file(path: &Path) -> Result<EntrypointConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so callers can supply a fixed map.
/// Empty values count as unset, the way `${VAR:-default}` treats them.
pub fn apply_env<F>(config: &mut EntrypointConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

    if let Some(kind) = get("DATABASE") {
        config.database.kind = DatabaseKind::parse(&kind);
    }

    if let Some(host) = get("SQL_HOST").or_else(|| get("POSTGRES_HOST")) {
        config.database.host = host;
    }

    let port = get("SQL_PORT")
        .map(|v| ("SQL_PORT", v))
        .or_else(|| get("POSTGRES_PORT").map(|v| ("POSTGRES_PORT", v)));
    if let Some((var, value)) = port {
        config.database.port = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env { var, value: value.clone() })?;
    }

    if let Some(value) = get("ENTRYPOINT_WAIT_TIMEOUT_SECS") {
        config.wait.timeout_secs = value.trim().parse().map_err(|_| ConfigError::Env {
            var: "ENTRYPOINT_WAIT_TIMEOUT_SECS",
            value: value.clone(),
        })?;
    }

    if let Some(level) = get("ENTRYPOINT_LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

/// Build the effective configuration: defaults, optional file, environment,
/// then validation.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<EntrypointConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => EntrypointConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// [`load_config`] against the real process environment.
pub fn load_from_process(path: Option<&Path>) -> Result<EntrypointConfig, ConfigError> {
    load_config(path, |var| std::env::var(var).ok())
}
