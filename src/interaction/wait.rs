//! Wait and existence primitives

use std::time::Duration;

use tracing::{error, info, warn};

use super::error::InteractionError;
use super::utility::Utility;
use crate::bridge::{ElementAction, ElementState, LoadState};
use crate::locator::Target;

/// Timeout for the slow waits: values, hidden state, grid headers
pub const LONG_WAIT_MS: u64 = 60_000;

/// Network idle gets its own, shorter budget
pub const NETWORK_IDLE_TIMEOUT_MS: u64 = 10_000;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl Utility {
    /// Wait until the target (or its requested occurrence) is visible
    pub async fn wait_for_locator(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps()
            .run(Self::title("waitForLocator", Some("Wait For Locator")), async {
                let (query, count) = self.resolve(&target, true).await?;
                if count > 1 {
                    info!(
                        "Multiple elements found for {}, waiting for occurrence {}",
                        target.selector,
                        target.occurrence_or_default()
                    );
                }
                let result = self
                    .driver()
                    .wait_for(&query, ElementState::Visible, target.timeout_or_default())
                    .await
                    .map_err(|e| self.driver_error(e, &target));
                if let Err(e) = &result {
                    error!("Waiting for locator {} failed with exception {}", target.selector, e);
                }
                result
            })
            .await
    }

    /// Assert the target becomes visible within the expect timeout
    pub async fn expect_visible(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        let timeout_ms = target.timeout_or(self.expect_timeout_ms());
        self.steps()
            .run(Self::title("expectVisible", Some("Expect Visible")), async {
                let (query, _) = self.resolve(&target, true).await?;
                self.driver()
                    .wait_for(&query, ElementState::Visible, timeout_ms)
                    .await
                    .map_err(|e| InteractionError::from_driver(e, &target.selector, timeout_ms))?;
                info!("Element {} is visible", target.selector);
                Ok(())
            })
            .await
    }

    /// Assert the target's inner text contains `expected` within the expect timeout
    pub async fn expect_text(
        &self,
        target: impl Into<Target>,
        expected: &str,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        let timeout_ms = target.timeout_or(self.expect_timeout_ms());
        self.steps()
            .run(Self::title("expectText", Some("Expect Text")), async {
                let (query, _) = self.resolve(&target, false).await?;
                let mut last = String::new();
                let poll = async {
                    loop {
                        if let Ok(value) = self
                            .driver()
                            .perform(&query, &ElementAction::InnerText)
                            .await
                        {
                            last = value.as_str().unwrap_or_default().to_string();
                            if last.contains(expected) {
                                return;
                            }
                        }
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                };
                let timed_out = tokio::time::timeout(Duration::from_millis(timeout_ms), poll)
                    .await
                    .is_err();
                if timed_out {
                    error!(
                        "Expected {} to contain '{}', last text was '{}'",
                        target.selector, expected, last
                    );
                    return Err(InteractionError::Timeout {
                        selector: target.selector.clone(),
                        timeout_ms,
                    });
                }
                Ok(())
            })
            .await
    }

    /// True when something matches and the first match is visible. Never fails.
    pub async fn check_if_element_exists(&self, target: impl Into<Target>) -> bool {
        let target = target.into();
        self.steps()
            .wrap(Self::title("checkIfElementExists", None), async {
                let (count, visible) = self.probe(&target).await;
                let exists = count > 0 && visible;
                info!("Element {} exists: {}", target.selector, exists);
                exists
            })
            .await
    }

    /// True when nothing matches and nothing is visible. Never fails.
    pub async fn check_if_element_not_exists(&self, target: impl Into<Target>) -> bool {
        let target = target.into();
        self.steps()
            .wrap(Self::title("checkIfElementNotExists", None), async {
                let (count, visible) = self.probe(&target).await;
                let absent = count == 0 && !visible;
                info!("Element {} does not exist: {}", target.selector, absent);
                absent
            })
            .await
    }

    async fn probe(&self, target: &Target) -> (usize, bool) {
        let query = self.locate(target);
        let count = match self.driver().count(&query).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Counting {} failed: {}", target.selector, e);
                return (0, false);
            }
        };
        if count == 0 {
            return (0, false);
        }
        let visible = match self
            .driver()
            .perform(&query.visible().first(), &ElementAction::IsVisible)
            .await
        {
            Ok(value) => value.as_bool().unwrap_or(false),
            Err(e) => {
                warn!("Visibility check of {} failed: {}", target.selector, e);
                false
            }
        };
        (count, visible)
    }

    /// Wait for DOM content and network idle together; timeouts are only logged
    pub async fn wait_until_page_is_loaded(&self) {
        self.steps()
            .wrap(Self::title("waitUntilPageIsLoaded", Some("Wait Until Page Is Loaded")), async {
                let driver = self.driver();
                let (content, idle) = tokio::join!(
                    driver.wait_for_load_state(self.page(), LoadState::DomContentLoaded, None),
                    driver.wait_for_load_state(
                        self.page(),
                        LoadState::NetworkIdle,
                        Some(NETWORK_IDLE_TIMEOUT_MS)
                    ),
                );
                if let Err(e) = content {
                    error!("Error while waiting for page to load: {}", e);
                }
                if let Err(e) = idle {
                    warn!("Network did not go idle: {}", e);
                }
                info!("Page load wait finished for {}", self.page());
            })
            .await
    }

    /// Poll the input value until it equals `expected`
    pub async fn wait_until_element_has_value(
        &self,
        target: impl Into<Target>,
        expected: &str,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps()
            .run(Self::title("waitUntilElementHasValue", None), async {
                let (query, _) = self.resolve(&target, false).await?;
                let poll = async {
                    loop {
                        if let Ok(value) = self
                            .driver()
                            .perform(&query, &ElementAction::InputValue)
                            .await
                        {
                            if value.as_str() == Some(expected) {
                                return;
                            }
                        }
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                };
                tokio::time::timeout(Duration::from_millis(LONG_WAIT_MS), poll)
                    .await
                    .map_err(|_| InteractionError::Timeout {
                        selector: target.selector.clone(),
                        timeout_ms: LONG_WAIT_MS,
                    })?;
                info!("Element {} has value {}", target.selector, expected);
                Ok(())
            })
            .await
    }

    pub async fn wait_until_element_is_hidden(
        &self,
        target: impl Into<Target>,
    ) -> Result<(), InteractionError> {
        let target = target.into().timeout_ms(LONG_WAIT_MS);
        self.steps()
            .run(Self::title("waitUntilElementIsHidden", None), async {
                let (query, _) = self.resolve(&target, false).await?;
                self.driver()
                    .wait_for(&query, ElementState::Hidden, LONG_WAIT_MS)
                    .await
                    .map_err(|e| self.driver_error(e, &target))?;
                info!("Element {} is hidden", target.selector);
                Ok(())
            })
            .await
    }

    /// Let the page settle for a second, then wait for the element to detach
    pub async fn wait_until_selector_disappear(
        &self,
        target: impl Into<Target>,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps()
            .run(Self::title("waitUntilSelectorDisappear", None), async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let query = self.locate(&target).first();
                self.driver()
                    .wait_for(&query, ElementState::Detached, target.timeout_or_default())
                    .await
                    .map_err(|e| self.driver_error(e, &target))?;
                info!("Element {} disappeared", target.selector);
                Ok(())
            })
            .await
    }

    pub async fn wait_for_timeout(&self, ms: u64) -> Result<(), InteractionError> {
        self.driver().wait_for_timeout(self.page(), ms).await?;
        Ok(())
    }

    /// Fixed pause for pages whose load events fire too early
    pub async fn wait_for_document_loaded(&self) {
        self.steps()
            .wrap(Self::title("waitForDocumentLoaded", None), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
            })
            .await
    }
}
