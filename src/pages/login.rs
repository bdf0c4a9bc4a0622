use super::locators::ms_login;
use super::{BasePage, PageError};
use crate::locator::Target;

/// Sign-in can sit behind a slow redirect chain
const EMAIL_BOX_TIMEOUT_MS: u64 = 120_000;

#[derive(Clone)]
pub struct LoginPageActions {
    base: BasePage,
}

impl LoginPageActions {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    /// Sign in to the environment's home page with the profile credentials
    pub async fn login_into_home(&self) -> Result<(), PageError> {
        self.base
            .journey("LoginPageActions", "loginIntoHome", None, async {
                let env = &self.base.env;
                let username = self
                    .base
                    .credential_field(env.username.as_deref(), "USERNAME")?;
                let password = self
                    .base
                    .credential_field(env.password.as_deref(), "PASSWORD")?;
                let utility = &self.base.utility;

                self.base.open(&env.base_url).await?;
                let email_box = Target::new(ms_login::EMAIL_BOX).timeout_ms(EMAIL_BOX_TIMEOUT_MS);
                utility.wait_for_locator(email_box).await?;
                utility.click(ms_login::EMAIL_BOX).await?;
                utility.type_text(ms_login::EMAIL_BOX, &username).await?;
                utility.click(ms_login::NEXT_BUTTON).await?;
                utility.wait_until_page_is_loaded().await;

                utility.click(ms_login::PASSWORD_BOX).await?;
                utility.type_text(ms_login::PASSWORD_BOX, &password).await?;
                utility.click(ms_login::SIGN_IN_BUTTON).await?;
                utility.wait_until_page_is_loaded().await;

                utility.click(ms_login::STAY_SIGNED_IN_NO).await?;
                utility.wait_until_page_is_loaded().await;
                Ok(())
            })
            .await
    }
}
