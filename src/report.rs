//! Test outcome reporting
//!
//! Library hook for external test runners; nothing in this crate drives it.
//!
//! A test runner feeds per-test events to a [TestReporter], which logs each
//! result with a status tag and keeps a summary. Only the `call` phase of a
//! test decides its outcome; setup and teardown events are ignored.

use std::fmt;

use crate::logging::{Level, Logger, STATUS_FAILED, STATUS_OK, STATUS_SKIPPED, STATUS_WARNING};

/// Phase of a single test that an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    Setup,
    Call,
    Teardown,
}

/// Raw status reported by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

/// One report from the test runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEvent {
    pub name: String,
    pub phase: TestPhase,
    pub status: TestStatus,
    /// Test is marked optional; its failure is only a warning
    pub optional: bool,
    /// Failure details such as a short traceback
    pub details: Option<String>,
}

impl TestEvent {
    /// A `call`-phase event with no optional marker or details
    pub fn call(name: impl Into<String>, status: TestStatus) -> Self {
        TestEvent {
            name: name.into(),
            phase: TestPhase::Call,
            status,
            optional: false,
            details: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Final classification of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed,
    OptionalFailed,
    Skipped,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::OptionalFailed => "optional-failed",
            TestOutcome::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

/// Name and outcome of a finished test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub outcome: TestOutcome,
}

/// Collects test outcomes and logs each one as it arrives
pub struct TestReporter<L> {
    logger: L,
    results: Vec<TestResult>,
}

impl<L: Logger> TestReporter<L> {
    pub fn new(logger: L) -> Self {
        TestReporter {
            logger,
            results: Vec::new(),
        }
    }

    /// Handle one runner event
    pub fn on_event(&mut self, event: &TestEvent) {
        if event.phase != TestPhase::Call {
            return;
        }

        let outcome = match (event.status, event.optional) {
            (TestStatus::Passed, _) => {
                self.logger.info(&event.name, STATUS_OK);
                TestOutcome::Passed
            }
            (TestStatus::Failed, true) => {
                self.logger
                    .warning(&format!("{} (optional)", event.name), STATUS_WARNING);
                TestOutcome::OptionalFailed
            }
            (TestStatus::Failed, false) => {
                self.logger.error(&event.name, STATUS_FAILED);
                TestOutcome::Failed
            }
            (TestStatus::Skipped, _) => {
                self.logger.info(&event.name, STATUS_SKIPPED);
                TestOutcome::Skipped
            }
        };

        if event.status == TestStatus::Failed {
            self.logger.log(
                Level::Debug,
                &format!("Debug info for {}", event.name),
                None,
                event.details.as_deref(),
            );
        }

        self.results.push(TestResult {
            name: event.name.clone(),
            outcome,
        });
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Whether any required (non-optional) test failed
    pub fn has_failures(&self) -> bool {
        self.results
            .iter()
            .any(|result| result.outcome == TestOutcome::Failed)
    }

    /// Number of results with the given outcome
    pub fn count(&self, outcome: TestOutcome) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome == outcome)
            .count()
    }

    pub fn into_results(self) -> Vec<TestResult> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;

    #[test]
    fn test_passed_event() {
        let logger = MemoryLogger::new();
        let mut reporter = TestReporter::new(&logger);
        reporter.on_event(&TestEvent::call("tests/test_a.py::test_ok", TestStatus::Passed));

        assert_eq!(
            reporter.results(),
            &[TestResult {
                name: "tests/test_a.py::test_ok".to_string(),
                outcome: TestOutcome::Passed,
            }]
        );
        let entries = logger.entries();
        assert_eq!(entries[0].level, Level::Info);
        assert_eq!(entries[0].status.as_deref(), Some(STATUS_OK));
    }

    #[test]
    fn test_required_failure() {
        let logger = MemoryLogger::new();
        let mut reporter = TestReporter::new(&logger);
        reporter.on_event(
            &TestEvent::call("test_broken", TestStatus::Failed).with_details("assert 1 == 2"),
        );

        assert!(reporter.has_failures());
        assert_eq!(reporter.count(TestOutcome::Failed), 1);

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, Level::Error);
        assert_eq!(entries[0].status.as_deref(), Some(STATUS_FAILED));
        assert_eq!(entries[1].level, Level::Debug);
        assert_eq!(entries[1].message, "Debug info for test_broken");
        assert_eq!(entries[1].reason.as_deref(), Some("assert 1 == 2"));
    }

    #[test]
    fn test_optional_failure_is_warning() {
        let logger = MemoryLogger::new();
        let mut reporter = TestReporter::new(&logger);
        reporter.on_event(&TestEvent::call("test_flaky", TestStatus::Failed).optional());

        assert!(!reporter.has_failures());
        assert_eq!(reporter.count(TestOutcome::OptionalFailed), 1);
        let warning = &logger.at_level(Level::Warning)[0];
        assert_eq!(warning.message, "test_flaky (optional)");
        assert_eq!(warning.status.as_deref(), Some(STATUS_WARNING));
    }

    #[test]
    fn test_skipped_event() {
        let logger = MemoryLogger::new();
        let mut reporter = TestReporter::new(&logger);
        reporter.on_event(&TestEvent::call("test_later", TestStatus::Skipped));

        assert_eq!(reporter.count(TestOutcome::Skipped), 1);
        assert_eq!(logger.entries()[0].status.as_deref(), Some(STATUS_SKIPPED));
    }

    #[test]
    fn test_non_call_phases_ignored() {
        let logger = MemoryLogger::new();
        let mut reporter = TestReporter::new(&logger);
        for phase in [TestPhase::Setup, TestPhase::Teardown] {
            let mut event = TestEvent::call("test_fixture", TestStatus::Failed);
            event.phase = phase;
            reporter.on_event(&event);
        }

        assert!(reporter.results().is_empty());
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_outcome_names() {
        assert_eq!(TestOutcome::OptionalFailed.to_string(), "optional-failed");
        assert_eq!(TestOutcome::Skipped.to_string(), "skipped");
    }

    #[test]
    fn test_into_results_keeps_order() {
        let mut reporter = TestReporter::new(MemoryLogger::new());
        reporter.on_event(&TestEvent::call("first", TestStatus::Passed));
        reporter.on_event(&TestEvent::call("second", TestStatus::Skipped));

        let names: Vec<String> = reporter.into_results().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
