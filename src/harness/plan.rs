//! Which suites to run, and in what order.

use std::fmt;

/// A framework test module group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    Registration,
    Login,
    Oauth,
    Integration,
    E2e,
}

impl Suite {
    /// Suites run by `--quick` (and by default).
    pub const QUICK: [Suite; 4] = [Suite::Registration, Suite::Login, Suite::Oauth, Suite::Integration];

    /// Suites run by `--all`.
    pub const ALL: [Suite; 5] = [
        Suite::Registration,
        Suite::Login,
        Suite::Oauth,
        Suite::Integration,
        Suite::E2e,
    ];

    /// Dotted test label passed to `manage.py test`.
    pub fn module(self) -> &'static str {
        match self {
            Suite::Registration => "tests.unit.test_registration",
            Suite::Login => "tests.unit.test_login",
            Suite::Oauth => "tests.unit.test_google_oauth",
            Suite::Integration => "tests.integration.test_auth_flows",
            Suite::E2e => "tests.e2e.test_auth_e2e",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Suite::Registration => "User Registration Tests",
            Suite::Login => "User Login Tests",
            Suite::Oauth => "Google OAuth Tests",
            Suite::Integration => "Authentication Integration Tests",
            Suite::E2e => "End-to-End Authentication Tests",
        }
    }

    /// Key shown in the summary.
    pub fn key(self) -> &'static str {
        match self {
            Suite::Registration => "registration",
            Suite::Login => "login",
            Suite::Oauth => "oauth",
            Suite::Integration => "integration",
            Suite::E2e => "e2e",
        }
    }
}

/// One unit of work in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    Suite(Suite),
    Coverage,
}

impl Job {
    pub fn key(self) -> &'static str {
        match self {
            Job::Suite(suite) => suite.key(),
            Job::Coverage => "coverage",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Selection flags as given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub registration: bool,
    pub login: bool,
    pub oauth: bool,
    pub integration: bool,
    pub e2e: bool,
    pub all: bool,
    pub coverage: bool,
    pub quick: bool,
}

impl Selection {
    /// True when no flag other than `quick` was given.
    fn is_empty(&self) -> bool {
        !(self.registration
            || self.login
            || self.oauth
            || self.integration
            || self.e2e
            || self.all
            || self.coverage)
    }

    /// Ordered job list. A job selected twice runs once, at its first position.
    pub fn plan(&self) -> Vec<Job> {
        let mut jobs = Vec::new();
        let mut push = |job: Job| {
            if !jobs.contains(&job) {
                jobs.push(job);
            }
        };

        let explicit = [
            (self.registration, Suite::Registration),
            (self.login, Suite::Login),
            (self.oauth, Suite::Oauth),
            (self.integration, Suite::Integration),
            (self.e2e, Suite::E2e),
        ];
        for (selected, suite) in explicit {
            if selected {
                push(Job::Suite(suite));
            }
        }

        if self.all {
            Suite::ALL.into_iter().for_each(|s| push(Job::Suite(s)));
        }

        if self.coverage {
            push(Job::Coverage);
        }

        if self.quick || self.is_empty() {
            Suite::QUICK.into_iter().for_each(|s| push(Job::Suite(s)));
        }

        jobs
    }
}
