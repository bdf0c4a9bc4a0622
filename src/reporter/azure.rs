//! Pushes test outcomes to the Azure DevOps test points named in test titles
//!
//! A title like `[306542],[306543] renews license` syncs both cases. Each
//! case fans out over the plan suites containing it, with bounded
//! concurrency at both levels and a timeout on every call. A failed call
//! stops only its own case or suite chain and never changes the test result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{error, info};

use super::client::{AzureDevOpsClient, PlanSuite, SyncError, SyncOutcome, TestPlanApi};
use super::title::extract_case_ids;
use super::Reporter;
use crate::config::{AzureDevOpsConfig, SyncConfig};
use crate::runner::{TestInfo, TestResult};

/// Points updated for one case id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSync {
    pub case_id: u64,
    pub updated_points: usize,
}

pub struct AzureDevOpsReporter {
    api: Arc<dyn TestPlanApi>,
    concurrency: usize,
    call_timeout: Duration,
}

impl AzureDevOpsReporter {
    pub fn new(api: Arc<dyn TestPlanApi>, sync: &SyncConfig) -> Self {
        Self {
            api,
            concurrency: sync.concurrency.max(1),
            call_timeout: Duration::from_millis(sync.call_timeout_ms),
        }
    }

    pub fn from_config(config: &AzureDevOpsConfig, sync: &SyncConfig) -> Result<Self, SyncError> {
        Ok(Self::new(Arc::new(AzureDevOpsClient::new(config)?), sync))
    }

    async fn call<T, F>(&self, call: &str, fut: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, SyncError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::Timeout {
                call: call.to_string(),
                timeout_ms: self.call_timeout.as_millis() as u64,
            }),
        }
    }

    /// Sync every case id found in `title`
    pub async fn sync_title(&self, title: &str, outcome: SyncOutcome) -> Vec<CaseSync> {
        let case_ids = extract_case_ids(title);
        info!("Test Cases : {:?}", case_ids);
        self.sync_cases(&case_ids, outcome).await
    }

    pub async fn sync_cases(&self, case_ids: &[u64], outcome: SyncOutcome) -> Vec<CaseSync> {
        stream::iter(case_ids.iter().copied())
            .map(|case_id| async move {
                CaseSync {
                    case_id,
                    updated_points: self.sync_case(case_id, outcome).await,
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    /// Update the case's point in every suite that contains it; returns how many were updated
    pub async fn sync_case(&self, case_id: u64, outcome: SyncOutcome) -> usize {
        info!(
            "Fetching test plans and suites for case ID {} in Azure DevOps",
            case_id
        );
        let suites = match self
            .call("suites", self.api.suites_for_case(case_id))
            .await
        {
            Ok(suites) => suites,
            Err(e) => {
                error!("Failed to fetch test plan suites for case {}: {}", case_id, e);
                return 0;
            }
        };
        info!("This testcase is in {} testplan(s).", suites.len());

        stream::iter(suites)
            .map(|suite| async move { self.sync_point(case_id, suite, outcome).await })
            .buffer_unordered(self.concurrency)
            .filter(|updated| futures::future::ready(*updated))
            .count()
            .await
    }

    async fn sync_point(&self, case_id: u64, suite: PlanSuite, outcome: SyncOutcome) -> bool {
        info!("TestSuiteID: {}, TestplanID: {}", suite.suite_id, suite.plan_id);
        let point_id = match self
            .call("test point", self.api.test_point(suite, case_id))
            .await
        {
            Ok(Some(id)) => id,
            Ok(None) => {
                info!("No test point for case {} in suite {}", case_id, suite.suite_id);
                return false;
            }
            Err(e) => {
                error!("Failed to fetch test points: {}", e);
                return false;
            }
        };
        info!("TestPointID: {}", point_id);

        match self
            .call(
                "update outcome",
                self.api.update_outcome(suite, point_id, outcome),
            )
            .await
        {
            Ok(()) => {
                info!(
                    "TestPointID {} outcome updated to \"{:?}\" successfully.",
                    point_id, outcome
                );
                true
            }
            Err(e) => {
                error!("Failed to update TestPoint outcome: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl Reporter for AzureDevOpsReporter {
    async fn on_test_end(&self, test: &TestInfo, result: &TestResult) {
        self.sync_title(&test.title, SyncOutcome::from(result.status))
            .await;
    }
}
