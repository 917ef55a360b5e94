//! Container entrypoint.
//!
//! # Sequence
//!
//! ```text
//!   DATABASE=postgres?
//!        │ yes                       no
//!        ▼                           │
//!   ┌──────────┐  probe ok  ┌──────┐ │
//!   │ WAITING  │──────────▶│READY │◀┘
//!   └──────────┘            └──┬───┘
//!     │ retry with backoff     │
//!     │ until deadline         ▼
//!     ▼               migrate → collectstatic
//!   exit 1                     │
//!                              ▼
//!                     exec "$@" (same PID)
//! ```
//!
//! Everything after the entrypoint's own options is the application command
//! and is passed to `exec` untouched.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app_entrypoint::config::load_from_process;
use app_entrypoint::lifecycle::{signals, Shutdown, StartupSequencer};
use app_entrypoint::observability::logging;
use app_entrypoint::process::{Handoff, SystemRunner};
use app_entrypoint::readiness::TcpProbe;

#[derive(Parser)]
#[command(name = "app-entrypoint")]
#[command(about = "Wait for the database, run migrations, then exec the application", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "ENTRYPOINT_CONFIG")]
    config: Option<PathBuf>,

    /// Command to exec once startup steps succeed.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<OsString>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_from_process(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        database = %config.database.kind,
        host = %config.database.host,
        port = config.database.port,
        steps = config.steps.len(),
        "Configuration loaded"
    );

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let outcome = runtime.block_on(async {
        let shutdown = Shutdown::new();
        let mut signals_rx = shutdown.subscribe();
        signals::spawn_listener(shutdown.clone());

        StartupSequencer::new(config, TcpProbe, SystemRunner)
            .run(&mut signals_rx)
            .await
    });

    // Tear down the runtime before exec.
    drop(runtime);

    if let Err(e) = outcome {
        tracing::error!(error = %e, "Startup aborted");
        return exit_code(e.exit_code());
    }

    let Some(handoff) = Handoff::new(cli.command) else {
        tracing::info!("No command given, startup complete");
        return ExitCode::SUCCESS;
    };

    let err = handoff.exec();
    tracing::error!(error = %err, "Hand-off failed");
    exit_code(err.exit_code())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
