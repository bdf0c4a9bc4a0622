//! Azure DevOps Test Plans API
//!
//! Three calls take a test case id to an updated outcome: find the plan
//! suites containing the case, find the case's test point in one suite,
//! then patch that point's outcome. [`TestPlanApi`] is the seam the
//! reporter talks to; [`AzureDevOpsClient`] is the HTTP implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bridge::{BridgeError, RequestBody, WebBridge, WebResponse};
use crate::config::{AzureDevOpsConfig, WebAuthConfig, WebConfig};
use crate::runner::TestStatus;

pub const SUITES_API_VERSION: &str = "7.1";
pub const TEST_POINT_API_VERSION: &str = "6.0-preview.2";
pub const UPDATE_POINT_API_VERSION: &str = "7.1-preview.2";

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{call} returned HTTP {status}")]
    Status { call: String, status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] BridgeError),

    #[error("Malformed {call} response: {message}")]
    Payload { call: String, message: String },

    #[error("{call} timed out after {timeout_ms}ms")]
    Timeout { call: String, timeout_ms: u64 },
}

/// Outcome values accepted by the test point API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    Passed,
    Failed,
}

impl From<TestStatus> for SyncOutcome {
    fn from(status: TestStatus) -> Self {
        if status.is_passed() {
            SyncOutcome::Passed
        } else {
            SyncOutcome::Failed
        }
    }
}

impl std::str::FromStr for SyncOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "passed" => Ok(SyncOutcome::Passed),
            "failed" => Ok(SyncOutcome::Failed),
            other => Err(format!("unknown outcome '{}' (expected passed or failed)", other)),
        }
    }
}

/// A test plan suite that contains a given case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanSuite {
    pub plan_id: u64,
    pub suite_id: u64,
}

#[async_trait]
pub trait TestPlanApi: Send + Sync {
    async fn suites_for_case(&self, case_id: u64) -> Result<Vec<PlanSuite>, SyncError>;

    /// First test point of the case in the suite, if it has one
    async fn test_point(&self, suite: PlanSuite, case_id: u64) -> Result<Option<u64>, SyncError>;

    async fn update_outcome(
        &self,
        suite: PlanSuite,
        point_id: u64,
        outcome: SyncOutcome,
    ) -> Result<(), SyncError>;
}

#[derive(Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Deserialize)]
struct SuiteRef {
    id: u64,
    plan: IdRef,
}

#[derive(Deserialize)]
struct IdRef {
    id: u64,
}

pub struct AzureDevOpsClient {
    web: WebBridge,
    project: String,
}

impl AzureDevOpsClient {
    pub fn new(config: &AzureDevOpsConfig) -> Result<Self, SyncError> {
        let web_config = WebConfig::new(config.base_url.clone())
            .with_auth(WebAuthConfig::Basic {
                username: config.username.clone(),
                password: config.pat_token.clone(),
            })
            .with_header("Content-Type", "application/json");
        Ok(Self {
            web: WebBridge::new(web_config)?,
            project: config.project.clone(),
        })
    }

    fn points_path(&self, suite: PlanSuite) -> String {
        format!(
            "/{}/_apis/testplan/Plans/{}/Suites/{}/TestPoint",
            self.project, suite.plan_id, suite.suite_id
        )
    }

    fn ensure_success(call: &str, response: &WebResponse) -> Result<(), SyncError> {
        if response.is_success() {
            Ok(())
        } else {
            Err(SyncError::Status {
                call: call.to_string(),
                status: response.status,
            })
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(
        call: &str,
        response: &WebResponse,
    ) -> Result<T, SyncError> {
        response.json().map_err(|e| SyncError::Payload {
            call: call.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TestPlanApi for AzureDevOpsClient {
    async fn suites_for_case(&self, case_id: u64) -> Result<Vec<PlanSuite>, SyncError> {
        let call = "suites";
        let response = self
            .web
            .get_with_query(
                "/_apis/testplan/suites",
                &[
                    ("testCaseId", case_id.to_string()),
                    ("api-version", SUITES_API_VERSION.to_string()),
                ],
            )
            .await?;
        Self::ensure_success(call, &response)?;
        let list: ListResponse<SuiteRef> = Self::parse(call, &response)?;
        Ok(list
            .value
            .into_iter()
            .map(|s| PlanSuite {
                plan_id: s.plan.id,
                suite_id: s.id,
            })
            .collect())
    }

    async fn test_point(&self, suite: PlanSuite, case_id: u64) -> Result<Option<u64>, SyncError> {
        let call = "test point";
        let response = self
            .web
            .get_with_query(
                &self.points_path(suite),
                &[
                    ("api-version", TEST_POINT_API_VERSION.to_string()),
                    ("testCaseId", case_id.to_string()),
                ],
            )
            .await?;
        Self::ensure_success(call, &response)?;
        let list: ListResponse<IdRef> = Self::parse(call, &response)?;
        Ok(list.value.first().map(|p| p.id))
    }

    async fn update_outcome(
        &self,
        suite: PlanSuite,
        point_id: u64,
        outcome: SyncOutcome,
    ) -> Result<(), SyncError> {
        let body = json!([{ "id": point_id, "results": { "outcome": outcome } }]);
        let response = self
            .web
            .patch_with_query(
                &self.points_path(suite),
                RequestBody::Json(body),
                &[("api-version", UPDATE_POINT_API_VERSION.to_string())],
            )
            .await?;
        Self::ensure_success("update outcome", &response)
    }
}
