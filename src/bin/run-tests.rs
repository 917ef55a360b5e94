use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app_entrypoint::config::load_from_process;
use app_entrypoint::harness::TestLauncher;
use app_entrypoint::observability::logging;
use app_entrypoint::process::SystemRunner;

#[derive(Parser)]
#[command(name = "run-tests")]
#[command(about = "Run the authentication test suite from the project root", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "ENTRYPOINT_CONFIG")]
    config: Option<PathBuf>,

    /// Arguments for the test runner (default: --quick).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    runner_args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_from_process(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.observability.log_level);

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot read working directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let launcher = TestLauncher::new(root, &config.tests);
    match launcher.launch(SystemRunner, &cli.runner_args).await {
        Ok(status) => ExitCode::from(u8::try_from(status.code()).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
