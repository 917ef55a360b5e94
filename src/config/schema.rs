//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the entrypoint
//! and the test tooling. All types derive Serde traits for deserialization from
//! config files; every section has defaults so an empty file is valid.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The only database kind that makes the entrypoint wait.
pub const POSTGRES: &str = "postgres";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EntrypointConfig {
    /// Database the application depends on.
    pub database: DatabaseConfig,

    /// Readiness wait policy.
    pub wait: WaitConfig,

    /// Commands run, in order, before the hand-off.
    pub steps: Vec<StepConfig>,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Test launcher and suite runner settings.
    pub tests: TestsConfig,
}

impl Default for EntrypointConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            wait: WaitConfig::default(),
            steps: default_steps(),
            observability: ObservabilityConfig::default(),
            tests: TestsConfig::default(),
        }
    }
}

fn default_steps() -> Vec<StepConfig> {
    vec![
        StepConfig {
            name: "migrate".to_string(),
            program: "python".to_string(),
            args: vec!["manage.py".to_string(), "migrate".to_string()],
            env: BTreeMap::new(),
        },
        StepConfig {
            name: "collectstatic".to_string(),
            program: "python".to_string(),
            args: vec![
                "manage.py".to_string(),
                "collectstatic".to_string(),
                "--no-input".to_string(),
            ],
            env: BTreeMap::new(),
        },
    ]
}

/// Database kind selector.
///
/// Anything other than the exact string `postgres` is carried verbatim and
/// never triggers a wait.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatabaseKind {
    /// No selector configured.
    #[default]
    Unset,
    Postgres,
    Other(String),
}

impl DatabaseKind {
    /// Parse a selector value. The comparison is exact and case-sensitive.
    pub fn parse(value: &str) -> Self {
        if value == POSTGRES {
            DatabaseKind::Postgres
        } else {
            DatabaseKind::Other(value.to_string())
        }
    }

    pub fn requires_wait(&self) -> bool {
        matches!(self, DatabaseKind::Postgres)
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Unset => write!(f, "<unset>"),
            DatabaseKind::Postgres => write!(f, "{}", POSTGRES),
            DatabaseKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

impl Serialize for DatabaseKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DatabaseKind::Unset => serializer.serialize_none(),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DatabaseKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map_or(DatabaseKind::Unset, |v| DatabaseKind::parse(&v)))
    }
}

/// Database connection target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Kind selector (`DATABASE`).
    pub kind: DatabaseKind,

    /// Host name or address (`SQL_HOST` / `POSTGRES_HOST`).
    pub host: String,

    /// TCP port (`SQL_PORT` / `POSTGRES_PORT`).
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::Unset,
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

/// Delay strategy between failed probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Constant `interval_ms` between probes.
    Fixed,
    /// Doubling delay from `interval_ms`, capped at `max_interval_ms`, with jitter.
    #[default]
    Exponential,
}

/// Readiness wait policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitConfig {
    pub strategy: BackoffStrategy,

    /// Base delay between probes in milliseconds.
    pub interval_ms: u64,

    /// Upper bound for exponential delays in milliseconds.
    pub max_interval_ms: u64,

    /// Deadline for a single connection attempt in milliseconds.
    pub connect_timeout_ms: u64,

    /// Total time budget per target in seconds (0 = no deadline).
    pub timeout_secs: u64,

    /// Maximum probes per target (0 = unlimited).
    pub max_attempts: u32,

    /// Additional TCP dependencies awaited after the database.
    pub services: Vec<ServiceConfig>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            strategy: BackoffStrategy::Exponential,
            interval_ms: 100,
            max_interval_ms: 2000,
            connect_timeout_ms: 1000,
            timeout_secs: 60,
            max_attempts: 0,
            services: Vec::new(),
        }
    }
}

impl WaitConfig {
    /// True when neither a deadline nor an attempt cap bounds the wait.
    pub fn is_unbounded(&self) -> bool {
        self.timeout_secs == 0 && self.max_attempts == 0
    }
}

/// An extra TCP dependency such as a cache.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
}

/// A pre-start command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StepConfig {
    /// Identifier used in logs and errors.
    pub name: String,

    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment for the child.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Test tooling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TestsConfig {
    /// File whose presence identifies the project root.
    pub marker_file: String,

    /// Runner command line the launcher delegates to.
    pub runner: Vec<String>,

    /// Arguments passed to the runner when none are given.
    pub default_args: Vec<String>,

    /// Interpreter used by the suite runner.
    pub python: String,

    /// `DJANGO_SETTINGS_MODULE` applied when the environment has none.
    pub settings_module: String,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            marker_file: "manage.py".to_string(),
            runner: vec!["python".to_string(), "scripts/test_auth.py".to_string()],
            default_args: vec!["--quick".to_string()],
            python: "python".to_string(),
            settings_module: "app.settings".to_string(),
        }
    }
}
