//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (environment overlay: DATABASE, SQL_HOST, SQL_PORT, ...)
//!     → validation.rs (semantic checks)
//!     → EntrypointConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once per process start
//! - All fields have defaults so the binaries run with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_process, ConfigError};
pub use schema::{
    BackoffStrategy, DatabaseConfig, DatabaseKind, EntrypointConfig, ObservabilityConfig,
    ServiceConfig, StepConfig, TestsConfig, WaitConfig, POSTGRES,
};
