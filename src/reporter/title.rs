//! Azure DevOps test case ids embedded in test titles as `[123]`

use std::sync::LazyLock;

use regex::Regex;

static CASE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("case id pattern is valid"));

/// Every `[digits]` group in the title, in order. Ids too large for `u64` are skipped.
pub fn extract_case_ids(title: &str) -> Vec<u64> {
    CASE_ID_REGEX
        .captures_iter(title)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_ids_in_order() {
        assert_eq!(extract_case_ids("[100],[200] renews license"), vec![100, 200]);
        assert_eq!(extract_case_ids("[306544] TestCase6"), vec![306544]);
    }

    #[test]
    fn test_titles_without_ids() {
        assert!(extract_case_ids("TestCase9").is_empty());
        assert!(extract_case_ids("[abc] and [] and [12a]").is_empty());
    }

    #[test]
    fn test_ids_anywhere_in_title() {
        assert_eq!(extract_case_ids("login [7] then [8]"), vec![7, 8]);
    }
}
