//! Google search smoke suites; bracketed ids sync to Azure DevOps test points

use crate::fixtures::Fixtures;
use crate::runner::{TestCase, TestSuite};

const SETTLE_MS: u64 = 5000;

async fn settle(fixtures: Fixtures) -> anyhow::Result<()> {
    fixtures.utility()?.wait_for_timeout(SETTLE_MS).await?;
    Ok(())
}

async fn google_search(fixtures: Fixtures) -> anyhow::Result<()> {
    fixtures.google_home_page_actions()?.google_search().await?;
    Ok(())
}

pub fn google_search_2() -> TestSuite {
    TestSuite::new("TestSuite - GoogleSearch2")
        .parallel()
        .before_each("settle", settle)
        .test(TestCase::browser("[306542],[306543] TestCase 4 and 5", google_search))
        .test(TestCase::browser("[306544] TestCase6", google_search))
}

pub fn google_search_3() -> TestSuite {
    TestSuite::new("TestSuite - GoogleSearch3")
        .parallel()
        .before_each("settle", settle)
        .test(TestCase::browser("[306542],[306543] TestCase 7 and 8", google_search))
        .test(TestCase::browser("[306544] TestCase9", google_search))
}
