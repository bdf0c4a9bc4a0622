//! Test and run result types

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::interaction::StepInfo;
use crate::reporter::title::extract_case_ids;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Passed,
    Failed,
    TimedOut,
    Skipped,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::TimedOut => "timedOut",
            TestStatus::Skipped => "skipped",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a test ended across all of its attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TestOutcome {
    Expected,
    Unexpected,
    Flaky,
    Skipped,
}

impl TestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Expected => "expected",
            TestOutcome::Unexpected => "unexpected",
            TestOutcome::Flaky => "flaky",
            TestOutcome::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestInfo {
    pub suite: String,
    pub title: String,
    /// Zero for the first attempt
    pub retry: u32,
}

impl TestInfo {
    pub fn new(suite: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            title: title.into(),
            retry: 0,
        }
    }

    pub fn full_title(&self) -> String {
        format!("{} > {}", self.suite, self.title)
    }

    /// External test case ids embedded in the title as `[123]`
    pub fn case_ids(&self) -> Vec<u64> {
        extract_case_ids(&self.title)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub status: TestStatus,
    pub duration: Duration,
    pub retry: u32,
    pub error: Option<String>,
    pub steps: Vec<StepInfo>,
}

impl TestResult {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            retry: 0,
            error: Some(reason.into()),
            steps: Vec::new(),
        }
    }

    pub fn outcome(&self) -> TestOutcome {
        match self.status {
            TestStatus::Skipped => TestOutcome::Skipped,
            TestStatus::Passed if self.retry > 0 => TestOutcome::Flaky,
            TestStatus::Passed => TestOutcome::Expected,
            TestStatus::Failed | TestStatus::TimedOut => TestOutcome::Unexpected,
        }
    }
}

/// Announced to reporters before the first test starts
#[derive(Debug, Clone, Serialize)]
pub struct RunInfo {
    pub run_id: String,
    pub total_tests: usize,
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub results: Vec<(TestInfo, TestResult)>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub flaky: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(run_id: String, results: Vec<(TestInfo, TestResult)>, duration: Duration) -> Self {
        let count = |outcome: TestOutcome| {
            results
                .iter()
                .filter(|(_, r)| r.outcome() == outcome)
                .count()
        };
        Self {
            passed: count(TestOutcome::Expected),
            failed: count(TestOutcome::Unexpected),
            skipped: count(TestOutcome::Skipped),
            flaky: count(TestOutcome::Flaky),
            run_id,
            results,
            duration,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: TestStatus, retry: u32) -> TestResult {
        TestResult {
            status,
            duration: Duration::from_millis(5),
            retry,
            error: None,
            steps: Vec::new(),
        }
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(result(TestStatus::Passed, 0).outcome(), TestOutcome::Expected);
        assert_eq!(result(TestStatus::Passed, 1).outcome(), TestOutcome::Flaky);
        assert_eq!(result(TestStatus::TimedOut, 0).outcome(), TestOutcome::Unexpected);
        assert_eq!(TestResult::skipped("x").outcome(), TestOutcome::Skipped);
    }

    #[test]
    fn test_summary_counts() {
        let info = TestInfo::new("suite", "t");
        let summary = RunSummary::new(
            "run".to_string(),
            vec![
                (info.clone(), result(TestStatus::Passed, 0)),
                (info.clone(), result(TestStatus::Passed, 2)),
                (info.clone(), result(TestStatus::Failed, 0)),
                (info, TestResult::skipped("serial")),
            ],
            Duration::from_secs(1),
        );
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.flaky, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 4);
        assert!(!summary.success());
    }

    #[test]
    fn test_info_case_ids() {
        let info = TestInfo::new("s", "[306542],[306543] TestCase 4 and 5");
        assert_eq!(info.case_ids(), vec![306542, 306543]);
        assert_eq!(info.full_title(), "s > [306542],[306543] TestCase 4 and 5");
    }
}
