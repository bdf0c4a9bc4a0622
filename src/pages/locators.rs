//! Selectors for the pages the suites drive

pub mod google_home {
    pub const SEARCH_BOX: &str = r#"//textarea[@aria-label="Search"]"#;
    pub const SEARCH_BUTTON: &str = r#"(//input[@value="Google Search"])[2]"#;
    pub const LOGO: &str = r#"//img[@alt="Google"]"#;
}

/// Microsoft identity sign-in
pub mod ms_login {
    pub const EMAIL_BOX: &str = r#"//input[@type="email"]"#;
    pub const NEXT_BUTTON: &str = r#"//input[@type="submit"]"#;
    pub const PASSWORD_BOX: &str = r#"//input[@name="passwd"]"#;
    pub const SIGN_IN_BUTTON: &str = r#"//input[@type="submit"]"#;
    pub const STAY_SIGNED_IN_NO: &str = r#"//input[@type="button"]"#;
}

pub mod naukri {
    pub const LOGIN_LINK: &str = "//a[text()='Login']";
    pub const USERNAME_FIELD: &str = "//input[@placeholder='Enter your active Email ID / Username']";
    pub const PASSWORD_FIELD: &str = "//input[@placeholder='Enter your password']";
    pub const SIGN_IN_BUTTON: &str = "//button[text()='Login']";
    pub const VIEW_PROFILE: &str = "//div[@class='view-profile-wrapper']";
    pub const EDIT_RESUME_HEADLINE: &str =
        "//span[text()='Resume headline']//following-sibling::span[text()='editOneTheme']";
    pub const SAVE_BUTTON: &str = "//button[text()='Save']";
    pub const SUCCESS_MESSAGE: &str = "//p[text()='Success']";
}
