//! The test suites this crate ships, by name

use crate::runner::TestSuite;

pub mod google_search;
pub mod naukri;
pub mod petstore;

/// Every suite, in run order, with the name `--suite` selects it by
pub fn registry() -> Vec<(&'static str, TestSuite)> {
    vec![
        ("google-search-2", google_search::google_search_2()),
        ("google-search-3", google_search::google_search_3()),
        ("naukri", naukri::profile_update()),
        ("petstore-positive", petstore::positive()),
        ("petstore-negative", petstore::negative()),
    ]
}

pub fn suite_names() -> Vec<&'static str> {
    registry().into_iter().map(|(name, _)| name).collect()
}

/// Suites whose name is in `names`, or all of them when `names` is empty
pub fn select(names: &[String]) -> Result<Vec<TestSuite>, String> {
    if let Some(unknown) = names
        .iter()
        .find(|n| !suite_names().contains(&n.as_str()))
    {
        return Err(format!(
            "unknown suite '{}' (available: {})",
            unknown,
            suite_names().join(", ")
        ));
    }
    Ok(registry()
        .into_iter()
        .filter(|(name, _)| names.is_empty() || names.iter().any(|n| n == name))
        .map(|(_, suite)| suite)
        .collect())
}
