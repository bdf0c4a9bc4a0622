use super::locators::naukri;
use super::{BasePage, PageError};
use crate::locator::Target;

pub const USERNAME_VAR: &str = "NAUKARI_USERNAME";
pub const PASSWORD_VAR: &str = "NAUKARI_PASSWORD";

const LOGIN_LINK_TIMEOUT_MS: u64 = 120_000;

#[derive(Clone)]
pub struct NaukriPageActions {
    base: BasePage,
}

impl NaukriPageActions {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    /// Log in and re-save the resume headline so the profile shows as updated
    pub async fn login_into_naukri(&self) -> Result<(), PageError> {
        self.base
            .journey("NaukriPageActions", "loginIntoNaukri", None, async {
                let username = self.base.credential(USERNAME_VAR)?;
                let password = self.base.credential(PASSWORD_VAR)?;
                let utility = &self.base.utility;

                self.base.open(&self.base.env.base_url).await?;
                let login_link = Target::new(naukri::LOGIN_LINK).timeout_ms(LOGIN_LINK_TIMEOUT_MS);
                utility.wait_for_locator(login_link).await?;
                utility.click(naukri::LOGIN_LINK).await?;
                utility.type_text(naukri::USERNAME_FIELD, &username).await?;
                utility.type_text(naukri::PASSWORD_FIELD, &password).await?;
                utility.click(naukri::SIGN_IN_BUTTON).await?;
                utility.wait_until_page_is_loaded().await;

                utility.click(naukri::VIEW_PROFILE).await?;
                utility.click(naukri::EDIT_RESUME_HEADLINE).await?;
                utility.click(naukri::SAVE_BUTTON).await?;
                utility.expect_visible(naukri::SUCCESS_MESSAGE).await?;
                utility.wait_until_page_is_loaded().await;
                Ok(())
            })
            .await
    }
}
