//! Run summary.

use std::fmt::Write as _;

use serde::Serialize;

use crate::harness::plan::Job;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    pub name: String,
    pub passed: bool,
}

/// Results in the order the jobs ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub results: Vec<JobResult>,
}

impl SuiteReport {
    /// Record a result; a repeated job overwrites its earlier entry in place.
    pub fn record(&mut self, job: Job, passed: bool) {
        let name = job.key();
        match self.results.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.passed = passed,
            None => self.results.push(JobResult {
                name: name.to_string(),
                passed,
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    /// 0 when every job passed (or nothing ran), 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    /// Plain-text summary block.
    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = format!("{rule}\nTEST SUMMARY\n{rule}\n");

        if self.results.is_empty() {
            out.push_str("No tests were run\n");
            return out;
        }

        for result in &self.results {
            let status = if result.passed { "PASSED" } else { "FAILED" };
            let _ = writeln!(out, "{}: {}", result.name.to_uppercase(), status);
        }

        let _ = writeln!(
            out,
            "\nOverall: {}/{} test suites passed",
            self.passed(),
            self.total()
        );
        out.push_str(if self.all_passed() {
            "All authentication tests passed!\n"
        } else {
            "Some authentication tests failed!\n"
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::plan::Suite;

    #[test]
    fn test_summary_counts() {
        let mut report = SuiteReport::default();
        report.record(Job::Suite(Suite::Registration), true);
        report.record(Job::Suite(Suite::Login), false);
        report.record(Job::Coverage, true);

        assert_eq!(report.passed(), 2);
        assert_eq!(report.exit_code(), 1);

        let text = report.render();
        assert!(text.contains("REGISTRATION: PASSED"));
        assert!(text.contains("LOGIN: FAILED"));
        assert!(text.contains("Overall: 2/3 test suites passed"));
        assert!(text.contains("Some authentication tests failed!"));
    }

    #[test]
    fn test_rerun_overwrites() {
        let mut report = SuiteReport::default();
        report.record(Job::Suite(Suite::Oauth), false);
        report.record(Job::Suite(Suite::Login), true);
        report.record(Job::Suite(Suite::Oauth), true);

        assert_eq!(report.total(), 2);
        assert_eq!(report.results[0].name, "oauth");
        assert!(report.all_passed());
    }

    #[test]
    fn test_empty_report() {
        let report = SuiteReport::default();
        assert_eq!(report.exit_code(), 0);
        assert!(report.render().contains("No tests were run"));
    }

    #[test]
    fn test_json_shape() {
        let mut report = SuiteReport::default();
        report.record(Job::Suite(Suite::E2e), true);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["name"], "e2e");
        assert_eq!(json["results"][0]["passed"], true);
    }
}
