//! Per-test fixtures
//!
//! The runner builds one [`Fixtures`] per test attempt. API tests get the
//! `request` client and the environment profile; browser tests additionally
//! get a fresh page, its [`Utility`] and the page action objects built on it.

use std::sync::Arc;

use crate::bridge::{BrowserDriver, WebBridge};
use crate::config::EnvProfile;
use crate::interaction::{Steps, Utility};
use crate::locator::PageId;
use crate::pages::{BasePage, GoogleHomePageActions, LoginPageActions, NaukriPageActions};
use crate::petstore::PetStoreClient;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("This test has no browser page; mark it as a browser test")]
    NoBrowser,
}

/// A page opened for one test and the utility bound to it
#[derive(Clone)]
pub struct BrowserSession {
    pub driver: Arc<dyn BrowserDriver>,
    pub page: PageId,
    pub utility: Utility,
}

impl BrowserSession {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        page: PageId,
        steps: Steps,
        expect_timeout_ms: u64,
    ) -> Self {
        let utility =
            Utility::new(driver.clone(), page.clone(), steps).with_expect_timeout(expect_timeout_ms);
        Self {
            driver,
            page,
            utility,
        }
    }
}

#[derive(Clone)]
pub struct Fixtures {
    pub request: WebBridge,
    pub env: Arc<EnvProfile>,
    pub steps: Steps,
    browser: Option<BrowserSession>,
}

impl Fixtures {
    pub fn new(request: WebBridge, env: Arc<EnvProfile>, steps: Steps) -> Self {
        Self {
            request,
            env,
            steps,
            browser: None,
        }
    }

    pub fn with_browser(mut self, session: BrowserSession) -> Self {
        self.browser = Some(session);
        self
    }

    pub fn has_browser(&self) -> bool {
        self.browser.is_some()
    }

    fn session(&self) -> Result<&BrowserSession, FixtureError> {
        self.browser.as_ref().ok_or(FixtureError::NoBrowser)
    }

    pub fn page(&self) -> Result<&PageId, FixtureError> {
        Ok(&self.session()?.page)
    }

    pub fn utility(&self) -> Result<&Utility, FixtureError> {
        Ok(&self.session()?.utility)
    }

    pub fn base_page(&self) -> Result<BasePage, FixtureError> {
        Ok(BasePage::new(self.utility()?.clone(), self.env.clone()))
    }

    pub fn google_home_page_actions(&self) -> Result<GoogleHomePageActions, FixtureError> {
        Ok(GoogleHomePageActions::new(self.base_page()?))
    }

    pub fn login_page_actions(&self) -> Result<LoginPageActions, FixtureError> {
        Ok(LoginPageActions::new(self.base_page()?))
    }

    pub fn naukri_page_actions(&self) -> Result<NaukriPageActions, FixtureError> {
        Ok(NaukriPageActions::new(self.base_page()?))
    }

    pub fn petstore(&self) -> PetStoreClient {
        PetStoreClient::new(self.request.clone())
    }
}
