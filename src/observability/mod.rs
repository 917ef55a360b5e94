//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (status lines with structured fields)
//!     → logging.rs (fmt subscriber on stdout)
//!     → container log collector
//! ```
//!
//! # Design Decisions
//! - Human-readable lines; the container runtime adds timestamps and routing
//! - Level comes from config, RUST_LOG wins when set

pub mod logging;
