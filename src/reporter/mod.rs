//! Run lifecycle reporters
//!
//! - `log` - banner and summary logging for every test
//! - `azure` - pushes outcomes to Azure DevOps test points named in titles
//! - `client` - the Azure DevOps Test Plans HTTP calls behind [`TestPlanApi`]
//! - `title` - `[123]` case id extraction

use async_trait::async_trait;

use crate::interaction::StepInfo;
use crate::runner::{RunInfo, RunSummary, TestInfo, TestResult};

pub mod azure;
pub mod client;
pub mod log;
pub mod title;

pub use azure::AzureDevOpsReporter;
pub use client::{AzureDevOpsClient, PlanSuite, SyncError, SyncOutcome, TestPlanApi};
pub use log::LogReporter;
pub use title::extract_case_ids;

/// Receives run lifecycle events; every callback defaults to a no-op
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn on_begin(&self, _run: &RunInfo) {}

    async fn on_test_begin(&self, _test: &TestInfo) {}

    async fn on_step_begin(&self, _test: &TestInfo, _step: &StepInfo) {}

    async fn on_step_end(&self, _test: &TestInfo, _step: &StepInfo) {}

    async fn on_test_end(&self, _test: &TestInfo, _result: &TestResult) {}

    async fn on_error(&self, _message: &str) {}

    async fn on_end(&self, _summary: &RunSummary) {}
}
