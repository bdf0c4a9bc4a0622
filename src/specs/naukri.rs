use crate::fixtures::Fixtures;
use crate::runner::{TestCase, TestSuite};

pub fn profile_update() -> TestSuite {
    TestSuite::new("NaukriProfileUpdate")
        .parallel()
        .before_each("settle", |fixtures: Fixtures| async move {
            fixtures.utility()?.wait_for_timeout(5000).await?;
            Ok(())
        })
        .test(TestCase::browser("Naukri", |fixtures: Fixtures| async move {
            fixtures.naukri_page_actions()?.login_into_naukri().await?;
            Ok(())
        }))
}
