//! Named steps
//!
//! [`Steps::run`] wraps an operation in a titled step: it opens a tracing
//! span, notifies the attached [`StepSink`] before and after, and records the
//! duration and error of the operation. Page actions and the utility layer
//! call it explicitly with their own titles.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tracing::Instrument;

/// Where a step comes from; reporters usually only show `TestStep`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    TestStep,
    Hook,
    Fixture,
}

impl StepCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepCategory::TestStep => "test.step",
            StepCategory::Hook => "hook",
            StepCategory::Fixture => "fixture",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    pub title: String,
    pub category: StepCategory,
    pub duration: Duration,
    pub error: Option<String>,
}

impl StepInfo {
    pub fn new(title: impl Into<String>, category: StepCategory) -> Self {
        Self {
            title: title.into(),
            category,
            duration: Duration::ZERO,
            error: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Receiver of step lifecycle notifications
#[async_trait]
pub trait StepSink: Send + Sync {
    async fn step_begin(&self, step: &StepInfo);
    async fn step_end(&self, step: &StepInfo);
}

#[derive(Clone)]
pub struct Steps {
    sink: Option<Arc<dyn StepSink>>,
    category: StepCategory,
}

impl Default for Steps {
    fn default() -> Self {
        Self::detached()
    }
}

impl Steps {
    pub fn new(sink: Arc<dyn StepSink>) -> Self {
        Self {
            sink: Some(sink),
            category: StepCategory::TestStep,
        }
    }

    /// Steps that only log, with nobody listening
    pub fn detached() -> Self {
        Self {
            sink: None,
            category: StepCategory::TestStep,
        }
    }

    pub fn with_category(&self, category: StepCategory) -> Self {
        Self {
            sink: self.sink.clone(),
            category,
        }
    }

    /// Run a fallible operation as a named step
    pub async fn run<T, E, F>(&self, title: impl Into<String>, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut step = StepInfo::new(title, self.category);
        self.begin(&step).await;

        let start = Instant::now();
        let span = tracing::info_span!("step", title = %step.title);
        let result = operation.instrument(span).await;

        step.duration = start.elapsed();
        step.error = result.as_ref().err().map(|e| e.to_string());
        self.end(&step).await;
        result
    }

    /// Run an operation that cannot fail as a named step
    pub async fn wrap<T, F>(&self, title: impl Into<String>, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        let mut step = StepInfo::new(title, self.category);
        self.begin(&step).await;

        let start = Instant::now();
        let span = tracing::info_span!("step", title = %step.title);
        let value = operation.instrument(span).await;

        step.duration = start.elapsed();
        self.end(&step).await;
        value
    }

    async fn begin(&self, step: &StepInfo) {
        if let Some(sink) = &self.sink {
            sink.step_begin(step).await;
        }
    }

    async fn end(&self, step: &StepInfo) {
        if let Some(sink) = &self.sink {
            sink.step_end(step).await;
        }
    }
}

/// `Type.operation - description`, the title format used for utility steps
pub fn step_title(owner: &str, operation: &str, description: Option<&str>) -> String {
    match description {
        Some(d) => format!("{}.{} - {}", owner, operation, d),
        None => format!("{}.{}", owner, operation),
    }
}
