//! Page action objects
//!
//! Each page wraps a [`BasePage`] (the test's [`Utility`] plus the active
//! environment profile) and exposes one method per user journey. Journeys
//! run as named steps, `GoogleHomePageActions.googleSearch - Google Search`.

use std::sync::Arc;

use crate::config::EnvProfile;
use crate::interaction::{step_title, InteractionError, Utility};

pub mod google;
pub mod locators;
pub mod login;
pub mod naukri;

pub use google::GoogleHomePageActions;
pub use login::LoginPageActions;
pub use naukri::NaukriPageActions;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

#[derive(Clone)]
pub struct BasePage {
    pub utility: Utility,
    pub env: Arc<EnvProfile>,
}

impl BasePage {
    pub fn new(utility: Utility, env: Arc<EnvProfile>) -> Self {
        Self { utility, env }
    }

    /// Run a journey as a named step owned by `page`
    pub(crate) async fn journey<T, F>(
        &self,
        page: &str,
        method: &str,
        description: Option<&str>,
        journey: F,
    ) -> Result<T, PageError>
    where
        F: std::future::Future<Output = Result<T, PageError>>,
    {
        self.utility
            .steps()
            .run(step_title(page, method, description), journey)
            .await
    }

    /// Navigate and let the page settle
    pub async fn open(&self, url: &str) -> Result<(), InteractionError> {
        self.utility.goto(url).await?;
        self.utility.wait_until_page_is_loaded().await;
        Ok(())
    }

    /// Profile value, falling back to the process environment
    pub(crate) fn credential(&self, key: &str) -> Result<String, PageError> {
        self.env
            .var(key)
            .or_else(|| std::env::var(key).ok())
            .ok_or_else(|| PageError::MissingCredential(key.to_string()))
    }

    /// A typed profile field, or `key` looked up like [`Self::credential`]
    pub(crate) fn credential_field(
        &self,
        field: Option<&str>,
        key: &str,
    ) -> Result<String, PageError> {
        match field {
            Some(value) => Ok(value.to_string()),
            None => self.credential(key),
        }
    }
}
