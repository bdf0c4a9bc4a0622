//! # Playwright Suite
//!
//! Browser and API end-to-end tests on Playwright, with outcome sync to
//! Azure DevOps Test Plans.
//!
//! ## Layers
//!
//! - **Locators** - `Target` selectors with `|`-delimited frame paths and occurrence picking
//! - **Bridge** - the `BrowserDriver` seam, the Playwright sidecar and a reqwest HTTP client
//! - **Interaction** - `Utility`, every element operation as a named, logged step
//! - **Pages** - page action objects for the user journeys
//! - **Runner** - serial/parallel suites with retries, timeouts and reporters
//! - **Reporter** - log summaries and Azure DevOps test point sync
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use playwright_suite::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RunnerConfig::default();
//!     let suite = TestSuite::new("smoke").test(TestCase::api("petstore is up", |fx| async move {
//!         let response = fx.petstore().find_by_status("available").await?;
//!         anyhow::ensure!(response.is_success());
//!         Ok(())
//!     }));
//!
//!     let runner = Runner::new(config, EnvProfile::default())?
//!         .with_reporter(Arc::new(LogReporter::new()));
//!     let summary = runner.run(&[suite]).await;
//!     println!("passed={} failed={}", summary.passed, summary.failed);
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod fixtures;
pub mod interaction;
pub mod locator;
pub mod logging;
pub mod pages;
pub mod petstore;
pub mod reporter;
pub mod runner;
pub mod specs;
pub mod support;

// Re-export main types
pub use bridge::{BridgeError, BrowserDriver, PlaywrightBridge, WebBridge, WebResponse};
pub use config::{ConfigError, EnvConfig, EnvProfile, RunnerConfig};
pub use fixtures::{FixtureError, Fixtures};
pub use interaction::{InteractionError, InteractionResultExt, Steps, Utility};
pub use locator::{ElementQuery, FramePath, PageId, Target};
pub use reporter::{AzureDevOpsReporter, LogReporter, Reporter};
pub use runner::{RunSummary, Runner, TestCase, TestStatus, TestSuite};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::{BrowserDriver, ElementAction, LoadState, PlaywrightBridge, SelectBy};
    pub use crate::config::{EnvConfig, EnvProfile, RunnerConfig};
    pub use crate::fixtures::Fixtures;
    pub use crate::interaction::{InteractionError, InteractionResultExt, Steps, Utility};
    pub use crate::locator::{PageId, Target};
    pub use crate::reporter::{AzureDevOpsReporter, LogReporter, Reporter};
    pub use crate::runner::{RunSummary, Runner, TestCase, TestStatus, TestSuite};
}
