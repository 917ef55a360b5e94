//! Executes a suite plan through the framework's test command.

use crate::harness::plan::{Job, Suite};
use crate::harness::report::SuiteReport;
use crate::process::{CommandSpec, StepRunner};

const SETTINGS_VAR: &str = "DJANGO_SETTINGS_MODULE";
const COVERAGE_FILTER: [&str; 2] = [
    "--include=users/*,app/*",
    "--omit=*/migrations/*,*/tests/*",
];

/// Runs setup and each planned job, collecting pass/fail per job.
pub struct SuiteRunner<R> {
    runner: R,
    python: String,
    settings_module: Option<String>,
}

impl<R: StepRunner> SuiteRunner<R> {
    /// `settings_module` is exported to children only when given.
    pub fn new(runner: R, python: impl Into<String>, settings_module: Option<String>) -> Self {
        Self {
            runner,
            python: python.into(),
            settings_module,
        }
    }

    fn command(&self, name: &str, program: &str) -> CommandSpec {
        let command = CommandSpec::new(name, program);
        match &self.settings_module {
            Some(module) => command.env(SETTINGS_VAR, module.clone()),
            None => command,
        }
    }

    fn manage(&self, name: &str) -> CommandSpec {
        self.command(name, &self.python).arg("manage.py")
    }

    pub fn setup_command(&self) -> CommandSpec {
        self.manage("Database Migration").args(["migrate", "--run-syncdb"])
    }

    pub fn suite_command(&self, suite: Suite) -> CommandSpec {
        self.manage(suite.description())
            .args(["test", suite.module(), "-v", "2"])
    }

    pub fn coverage_commands(&self) -> Vec<CommandSpec> {
        vec![
            self.command("Coverage: erase", "coverage").arg("erase"),
            self.command("Coverage: run", "coverage").args([
                "run",
                "--source=.",
                "manage.py",
                "test",
                "tests.unit",
                "tests.integration",
            ]),
            self.command("Coverage: report", "coverage")
                .arg("report")
                .args(COVERAGE_FILTER),
            self.command("Coverage: html", "coverage")
                .arg("html")
                .args(COVERAGE_FILTER),
        ]
    }

    /// Run one command; spawn errors count as failure.
    async fn run_command(&self, command: &CommandSpec) -> bool {
        tracing::info!(command = %command, "{}", command.name);
        match self.runner.run(command).await {
            Ok(status) if status.success() => {
                tracing::info!("{} completed successfully", command.name);
                true
            }
            Ok(status) => {
                tracing::error!(code = status.code(), "{} failed", command.name);
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "{} could not be started", command.name);
                false
            }
        }
    }

    /// Prepare the test database. Failure is logged, never fatal.
    pub async fn setup(&self) {
        if !self.run_command(&self.setup_command()).await {
            tracing::warn!("Database setup failed, continuing with tests");
        }
    }

    pub async fn run_job(&self, job: Job) -> bool {
        match job {
            Job::Suite(suite) => {
                if suite == Suite::E2e {
                    tracing::warn!("E2E tests require a Chrome browser to be installed");
                }
                self.run_command(&self.suite_command(suite)).await
            }
            Job::Coverage => {
                for command in self.coverage_commands() {
                    if !self.run_command(&command).await {
                        return false;
                    }
                }
                tracing::info!("Coverage report generated in htmlcov/index.html");
                true
            }
        }
    }

    /// Setup, then every job in order.
    pub async fn run(&self, plan: &[Job]) -> SuiteReport {
        self.setup().await;

        let mut report = SuiteReport::default();
        for &job in plan {
            let passed = self.run_job(job).await;
            report.record(job, passed);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandStatus;
    use std::cell::RefCell;
    use std::io;

    /// Fails any command whose line contains `fail_on`.
    #[derive(Default)]
    struct Recorder {
        lines: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl StepRunner for Recorder {
        async fn run(&self, command: &CommandSpec) -> io::Result<CommandStatus> {
            let line = command.command_line();
            let fail = self.fail_on.is_some_and(|pat| line.contains(pat));
            self.lines.borrow_mut().push(line);
            Ok(CommandStatus::from_code(if fail { 1 } else { 0 }))
        }
    }

    #[tokio::test]
    async fn test_setup_then_suites() {
        let recorder = Recorder::default();
        let runner = SuiteRunner::new(&recorder, "python", None);

        let report = runner.run(&[Job::Suite(Suite::Login), Job::Suite(Suite::Oauth)]).await;

        assert!(report.all_passed());
        assert_eq!(
            *recorder.lines.borrow(),
            [
                "python manage.py migrate --run-syncdb",
                "python manage.py test tests.unit.test_login -v 2",
                "python manage.py test tests.unit.test_google_oauth -v 2",
            ]
        );
    }

    #[tokio::test]
    async fn test_setup_failure_is_not_fatal() {
        let recorder = Recorder {
            fail_on: Some("migrate"),
            ..Default::default()
        };
        let runner = SuiteRunner::new(&recorder, "python3", None);

        let report = runner.run(&[Job::Suite(Suite::Registration)]).await;

        assert!(report.all_passed());
        assert_eq!(recorder.lines.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_coverage_stops_at_first_failure() {
        let recorder = Recorder {
            fail_on: Some("coverage run"),
            ..Default::default()
        };
        let runner = SuiteRunner::new(&recorder, "python", None);

        assert!(!runner.run_job(Job::Coverage).await);
        assert_eq!(
            *recorder.lines.borrow(),
            [
                "coverage erase",
                "coverage run --source=. manage.py test tests.unit tests.integration",
            ]
        );
    }

    #[test]
    fn test_settings_module_exported() {
        let runner = SuiteRunner::new(Recorder::default(), "python", Some("app.settings".into()));
        let command = runner.suite_command(Suite::E2e);
        assert_eq!(command.env[SETTINGS_VAR], "app.settings");

        let runner = SuiteRunner::new(Recorder::default(), "python", None);
        assert!(runner.setup_command().env.is_empty());
    }
}
