//! Declarative suites of test cases

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::fixtures::Fixtures;

pub type TestFuture = BoxFuture<'static, anyhow::Result<()>>;
pub type TestFn = Arc<dyn Fn(Fixtures) -> TestFuture + Send + Sync>;

fn boxed<F, Fut>(body: F) -> TestFn
where
    F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |fixtures| body(fixtures).boxed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuiteMode {
    /// Tests run in declaration order; a failure skips the rest
    #[default]
    Serial,
    /// Tests run concurrently, bounded by the worker count
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    /// Needs a fresh browser page
    Browser,
    Api,
}

#[derive(Clone)]
pub struct TestCase {
    pub title: String,
    pub kind: TestKind,
    body: TestFn,
}

impl TestCase {
    pub fn api<F, Fut>(title: impl Into<String>, body: F) -> Self
    where
        F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            title: title.into(),
            kind: TestKind::Api,
            body: boxed(body),
        }
    }

    pub fn browser<F, Fut>(title: impl Into<String>, body: F) -> Self
    where
        F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            title: title.into(),
            kind: TestKind::Browser,
            body: boxed(body),
        }
    }

    pub fn run(&self, fixtures: Fixtures) -> TestFuture {
        (self.body)(fixtures)
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Runs before every test of its suite, reported as a hook step
#[derive(Clone)]
pub struct Hook {
    pub title: String,
    body: TestFn,
}

impl Hook {
    pub fn run(&self, fixtures: Fixtures) -> TestFuture {
        (self.body)(fixtures)
    }
}

#[derive(Clone)]
pub struct TestSuite {
    pub title: String,
    pub mode: SuiteMode,
    pub before_each: Vec<Hook>,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            mode: SuiteMode::default(),
            before_each: Vec::new(),
            tests: Vec::new(),
        }
    }

    pub fn serial(mut self) -> Self {
        self.mode = SuiteMode::Serial;
        self
    }

    pub fn parallel(mut self) -> Self {
        self.mode = SuiteMode::Parallel;
        self
    }

    pub fn before_each<F, Fut>(mut self, title: impl Into<String>, body: F) -> Self
    where
        F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.before_each.push(Hook {
            title: title.into(),
            body: boxed(body),
        });
        self
    }

    pub fn test(mut self, case: TestCase) -> Self {
        self.tests.push(case);
        self
    }

    pub fn tests(mut self, cases: impl IntoIterator<Item = TestCase>) -> Self {
        self.tests.extend(cases);
        self
    }

    pub fn needs_browser(&self) -> bool {
        self.tests.iter().any(|t| t.kind == TestKind::Browser)
    }

    /// Keep only tests whose `suite > title` contains `pattern`
    pub fn grep(mut self, pattern: &str) -> Self {
        let suite = self.title.clone();
        self.tests
            .retain(|t| format!("{} > {}", suite, t.title).contains(pattern));
        self
    }
}

impl std::fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks: Vec<&str> = self.before_each.iter().map(|h| h.title.as_str()).collect();
        f.debug_struct("TestSuite")
            .field("title", &self.title)
            .field("mode", &self.mode)
            .field("before_each", &hooks)
            .field("tests", &self.tests)
            .finish()
    }
}
