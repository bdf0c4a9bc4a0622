use super::locators::google_home;
use super::{BasePage, PageError};
use crate::locator::Target;

pub const GOOGLE_URL: &str = "https://google.com";

#[derive(Clone)]
pub struct GoogleHomePageActions {
    base: BasePage,
}

impl GoogleHomePageActions {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub async fn google_search(&self) -> Result<(), PageError> {
        self.base
            .journey("GoogleHomePageActions", "googleSearch", Some("Google Search"), async {
                self.base.open(GOOGLE_URL).await?;
                self.base.utility.expect_visible(google_home::LOGO).await?;
                Ok(())
            })
            .await
    }

    /// Type a query into the search box and submit it
    pub async fn search_for(&self, query: &str) -> Result<(), PageError> {
        self.base
            .journey("GoogleHomePageActions", "searchFor", Some("Search For"), async {
                let utility = &self.base.utility;
                utility.wait_for_locator(google_home::SEARCH_BOX).await?;
                utility.click(google_home::SEARCH_BOX).await?;
                utility.type_text(google_home::SEARCH_BOX, query).await?;
                utility.click(google_home::LOGO).await?;
                utility.keyboard("Escape").await?;
                utility
                    .click(Target::new(google_home::SEARCH_BUTTON))
                    .await?;
                utility.wait_until_page_is_loaded().await;
                Ok(())
            })
            .await
    }
}
