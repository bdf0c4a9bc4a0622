//! Logs the test lifecycle: start banners, step progress and a summary block

use async_trait::async_trait;
use tracing::{error, info};

use super::Reporter;
use crate::interaction::{StepCategory, StepInfo};
use crate::runner::{RunInfo, RunSummary, TestInfo, TestResult};

const RULE: &str = "----------------------------------------------------------------------------";

#[derive(Debug, Default, Clone)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

fn seconds(duration: std::time::Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}

#[async_trait]
impl Reporter for LogReporter {
    async fn on_begin(&self, run: &RunInfo) {
        info!(
            "Starting run {} with {} test(s) on {} worker(s)",
            run.run_id, run.total_tests, run.workers
        );
    }

    async fn on_test_begin(&self, test: &TestInfo) {
        info!("-------------------------Test {} started---------------------", test.title);
    }

    async fn on_step_begin(&self, _test: &TestInfo, step: &StepInfo) {
        if step.category == StepCategory::TestStep {
            info!("---------------Executing Step : {} --------------------", step.title);
        }
    }

    async fn on_step_end(&self, _test: &TestInfo, step: &StepInfo) {
        if step.category == StepCategory::TestStep {
            info!("------------------- Step {} Completed -------------------", step.title);
            info!("Time Elapsed: {} sec", seconds(step.duration));
        }
    }

    async fn on_test_end(&self, test: &TestInfo, result: &TestResult) {
        info!("{}", RULE);
        info!("                              TEST SUMMARY                                  ");
        info!("{}", RULE);
        info!("Test : {}", test.title);
        info!("Status : {}", result.status.as_str().to_lowercase());
        info!("Test Outcome: {}", result.outcome().as_str());
        info!("Time Elapsed: {} sec", seconds(result.duration));
        if let Some(e) = &result.error {
            error!("Error: {}", e);
        }
        info!("{}", RULE);
    }

    async fn on_error(&self, message: &str) {
        error!("{}", message);
    }

    async fn on_end(&self, summary: &RunSummary) {
        info!(
            "Run {} finished in {} sec: {} passed, {} failed, {} flaky, {} skipped",
            summary.run_id,
            seconds(summary.duration),
            summary.passed,
            summary.failed,
            summary.flaky,
            summary.skipped
        );
    }
}
