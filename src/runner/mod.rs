//! Suite runner
//!
//! Runs [`TestSuite`]s one after another. Parallel suites run their tests
//! concurrently under a worker semaphore; serial suites run in order and skip
//! the remainder after a failure. Every attempt gets fresh fixtures, a
//! timeout, and retries up to the configured count. Lifecycle events go to
//! every registered [`Reporter`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use tokio::sync::{Mutex, Semaphore};
use tracing::{info, instrument, warn};

use crate::bridge::{BridgeError, BrowserDriver, WebBridge};
use crate::config::{EnvProfile, RunnerConfig, WebConfig};
use crate::fixtures::{BrowserSession, Fixtures};
use crate::interaction::{StepCategory, StepInfo, StepSink, Steps};
use crate::locator::PageId;
use crate::reporter::Reporter;

pub mod result;
pub mod suite;

pub use result::{RunInfo, RunSummary, TestInfo, TestOutcome, TestResult, TestStatus};
pub use suite::{Hook, SuiteMode, TestCase, TestFn, TestFuture, TestKind, TestSuite};

type Reporters = Arc<Vec<Arc<dyn Reporter>>>;

/// Collects a test's steps and forwards them to the reporters
struct StepRecorder {
    test: TestInfo,
    reporters: Reporters,
    steps: Mutex<Vec<StepInfo>>,
}

impl StepRecorder {
    fn new(test: TestInfo, reporters: Reporters) -> Self {
        Self {
            test,
            reporters,
            steps: Mutex::new(Vec::new()),
        }
    }

    async fn take(&self) -> Vec<StepInfo> {
        std::mem::take(&mut *self.steps.lock().await)
    }
}

#[async_trait]
impl StepSink for StepRecorder {
    async fn step_begin(&self, step: &StepInfo) {
        for reporter in self.reporters.iter() {
            reporter.on_step_begin(&self.test, step).await;
        }
    }

    async fn step_end(&self, step: &StepInfo) {
        self.steps.lock().await.push(step.clone());
        for reporter in self.reporters.iter() {
            reporter.on_step_end(&self.test, step).await;
        }
    }
}

pub struct Runner {
    config: Arc<RunnerConfig>,
    env: Arc<EnvProfile>,
    request: WebBridge,
    reporters: Reporters,
    driver: Option<Arc<dyn BrowserDriver>>,
}

impl Runner {
    pub fn new(config: RunnerConfig, env: EnvProfile) -> Result<Self, BridgeError> {
        let request = WebBridge::new(WebConfig::new(config.api_base_url.clone()))?;
        Ok(Self {
            config: Arc::new(config),
            env: Arc::new(env),
            request,
            reporters: Arc::new(Vec::new()),
            driver: None,
        })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        let mut reporters: Vec<_> = self.reporters.iter().cloned().collect();
        reporters.push(reporter);
        self.reporters = Arc::new(reporters);
        self
    }

    pub fn with_driver(mut self, driver: Arc<dyn BrowserDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    pub async fn run(&self, suites: &[TestSuite]) -> RunSummary {
        let run_id = uuid::Uuid::new_v4().to_string();
        let workers = self.config.workers.max(1);
        let run = RunInfo {
            run_id: run_id.clone(),
            total_tests: suites.iter().map(|s| s.tests.len()).sum(),
            workers,
        };
        for reporter in self.reporters.iter() {
            reporter.on_begin(&run).await;
        }

        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut results = Vec::with_capacity(run.total_tests);
        for suite in suites {
            results.extend(self.run_suite(suite, &semaphore).await);
        }

        let summary = RunSummary::new(run_id, results, start.elapsed());
        for reporter in self.reporters.iter() {
            reporter.on_end(&summary).await;
        }
        summary
    }

    #[instrument(skip(self, suite, semaphore), fields(suite = %suite.title))]
    async fn run_suite(
        &self,
        suite: &TestSuite,
        semaphore: &Arc<Semaphore>,
    ) -> Vec<(TestInfo, TestResult)> {
        info!(
            "Running suite {} ({} test(s), {:?})",
            suite.title,
            suite.tests.len(),
            suite.mode
        );

        match suite.mode {
            SuiteMode::Parallel => {
                let runs = suite.tests.iter().map(|test| async move {
                    match semaphore.acquire().await {
                        Ok(_permit) => self.run_test(suite, test).await,
                        Err(_) => (
                            TestInfo::new(&suite.title, &test.title),
                            TestResult::skipped("worker pool closed"),
                        ),
                    }
                });
                join_all(runs).await
            }
            SuiteMode::Serial => {
                let mut results = Vec::with_capacity(suite.tests.len());
                let mut failed = false;
                for test in &suite.tests {
                    if failed {
                        info!("Skipping {} after an earlier failure", test.title);
                        results.push((
                            TestInfo::new(&suite.title, &test.title),
                            TestResult::skipped("an earlier test in this serial suite failed"),
                        ));
                        continue;
                    }
                    let (info, result) = self.run_test(suite, test).await;
                    failed = !result.status.is_passed();
                    results.push((info, result));
                }
                results
            }
        }
    }

    /// Run a test until it passes or its retries are used up
    async fn run_test(&self, suite: &TestSuite, test: &TestCase) -> (TestInfo, TestResult) {
        let mut info = TestInfo::new(&suite.title, &test.title);
        loop {
            for reporter in self.reporters.iter() {
                reporter.on_test_begin(&info).await;
            }
            let result = self.run_attempt(suite, test, &info).await;
            for reporter in self.reporters.iter() {
                reporter.on_test_end(&info, &result).await;
            }

            if result.status.is_passed() || info.retry >= self.config.retries {
                return (info, result);
            }
            warn!(
                "Retrying {} (retry {}/{})",
                test.title,
                info.retry + 1,
                self.config.retries
            );
            info.retry += 1;
        }
    }

    async fn run_attempt(&self, suite: &TestSuite, test: &TestCase, info: &TestInfo) -> TestResult {
        let start = Instant::now();
        let recorder = Arc::new(StepRecorder::new(info.clone(), self.reporters.clone()));
        let steps = Steps::new(recorder.clone());
        let mut fixtures = Fixtures::new(self.request.clone(), self.env.clone(), steps.clone());

        let mut page: Option<(Arc<dyn BrowserDriver>, PageId)> = None;
        if test.kind == TestKind::Browser {
            let Some(driver) = self.driver.clone() else {
                return failed_attempt(info, start, "no browser driver configured for a browser test");
            };
            let fixture_steps = steps.with_category(StepCategory::Fixture);
            match fixture_steps.run("fixture: page", driver.new_page()).await {
                Ok(id) => {
                    fixtures = fixtures.with_browser(BrowserSession::new(
                        driver.clone(),
                        id.clone(),
                        steps.clone(),
                        self.config.expect_timeout_ms,
                    ));
                    page = Some((driver, id));
                }
                Err(e) => {
                    return failed_attempt(info, start, format!("failed to open page: {}", e));
                }
            }
        }

        let hook_steps = steps.with_category(StepCategory::Hook);
        let body = async {
            for hook in &suite.before_each {
                hook_steps
                    .run(format!("beforeEach: {}", hook.title), hook.run(fixtures.clone()))
                    .await?;
            }
            test.run(fixtures.clone()).await
        };

        let timeout = Duration::from_millis(self.config.test_timeout_ms);
        let (status, error) =
            match tokio::time::timeout(timeout, AssertUnwindSafe(body).catch_unwind()).await {
                Err(_) => (
                    TestStatus::TimedOut,
                    Some(format!(
                        "Test timeout of {}ms exceeded.",
                        self.config.test_timeout_ms
                    )),
                ),
                Ok(Err(panic)) => {
                    let message = format!("{} panicked: {}", test.title, panic_message(&*panic));
                    for reporter in self.reporters.iter() {
                        reporter.on_error(&message).await;
                    }
                    (TestStatus::Failed, Some(message))
                }
                Ok(Ok(Err(e))) => (TestStatus::Failed, Some(format!("{:#}", e))),
                Ok(Ok(Ok(()))) => (TestStatus::Passed, None),
            };

        if let Some((driver, id)) = page {
            if let Err(e) = driver.close_page(&id).await {
                warn!("Failed to close page {}: {}", id, e);
            }
        }

        TestResult {
            status,
            duration: start.elapsed(),
            retry: info.retry,
            error,
            steps: recorder.take().await,
        }
    }
}

fn failed_attempt(info: &TestInfo, start: Instant, error: impl Into<String>) -> TestResult {
    TestResult {
        status: TestStatus::Failed,
        duration: start.elapsed(),
        retry: info.retry,
        error: Some(error.into()),
        steps: Vec::new(),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
