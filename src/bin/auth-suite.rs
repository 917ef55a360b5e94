use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app_entrypoint::config::load_from_process;
use app_entrypoint::harness::{Selection, SuiteRunner};
use app_entrypoint::observability::logging;
use app_entrypoint::process::SystemRunner;

#[derive(Parser)]
#[command(name = "auth-suite")]
#[command(about = "Authentication Test Runner", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "ENTRYPOINT_CONFIG")]
    config: Option<PathBuf>,

    /// Run registration tests only
    #[arg(long)]
    registration: bool,

    /// Run login tests only
    #[arg(long)]
    login: bool,

    /// Run Google OAuth tests only
    #[arg(long)]
    oauth: bool,

    /// Run integration tests only
    #[arg(long)]
    integration: bool,

    /// Run E2E tests only
    #[arg(long)]
    e2e: bool,

    /// Run all authentication tests
    #[arg(long)]
    all: bool,

    /// Run tests with coverage
    #[arg(long)]
    coverage: bool,

    /// Run quick tests (unit + integration)
    #[arg(long)]
    quick: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn selection(&self) -> Selection {
        Selection {
            registration: self.registration,
            login: self.login,
            oauth: self.oauth,
            integration: self.integration,
            e2e: self.e2e,
            all: self.all,
            coverage: self.coverage,
            quick: self.quick,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_from_process(cli.config.as_deref())?;
    logging::init(&config.observability.log_level);

    let settings_module = std::env::var_os("DJANGO_SETTINGS_MODULE")
        .is_none()
        .then(|| config.tests.settings_module.clone());

    let runner = SuiteRunner::new(SystemRunner, config.tests.python.clone(), settings_module);
    let plan = cli.selection().plan();
    tracing::info!(jobs = plan.len(), "Authentication Test Suite");

    let report = runner.run(&plan).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
