mod common;

use common::{FakeDriver, FakeElement};
use playwright_suite::bridge::{ElementAction, LoadState};
use playwright_suite::interaction::{InteractionError, InteractionResultExt};
use playwright_suite::locator::Target;

const BUTTON: &str = "//button[@id='save']";
const ROWS: &str = "//tr";

fn clicked_nth(driver: &FakeDriver) -> Vec<Option<usize>> {
    driver
        .actions()
        .into_iter()
        .filter(|(_, action)| *action == ElementAction::Click)
        .map(|(query, _)| query.nth)
        .collect()
}

#[tokio::test]
async fn test_single_match_ignores_occurrence() {
    let driver =
        FakeDriver::new().with_elements(BUTTON, vec![FakeElement::visible("Save")]);
    let utility = driver.utility();

    utility.click(Target::new(BUTTON).nth(3)).await.unwrap();
    utility.click(BUTTON).await.unwrap();

    assert_eq!(clicked_nth(&driver), vec![Some(0), Some(0)]);
}

#[tokio::test]
async fn test_multiple_matches_use_requested_occurrence() {
    let driver = FakeDriver::new().with_elements(
        ROWS,
        vec![
            FakeElement::visible("a"),
            FakeElement::visible("b"),
            FakeElement::visible("c"),
        ],
    );
    let utility = driver.utility();

    utility.click(Target::new(ROWS).nth(1)).await.unwrap();
    utility.click(ROWS).await.unwrap();

    assert_eq!(clicked_nth(&driver), vec![Some(1), Some(0)]);
}

#[tokio::test]
async fn test_occurrence_out_of_range() {
    let driver = FakeDriver::new().with_elements(
        ROWS,
        vec![FakeElement::visible("a"), FakeElement::visible("b")],
    );
    let utility = driver.utility();

    let err = utility.click(Target::new(ROWS).nth(2)).await.unwrap_err();
    match err {
        InteractionError::OccurrenceOutOfRange {
            selector,
            occurrence,
            count,
        } => {
            assert_eq!(selector, ROWS);
            assert_eq!(occurrence, 2);
            assert_eq!(count, 2);
        }
        other => panic!("expected OccurrenceOutOfRange, got {:?}", other),
    }
    assert!(clicked_nth(&driver).is_empty());
}

#[tokio::test]
async fn test_click_skips_hidden_duplicates() {
    let driver = FakeDriver::new().with_elements(
        BUTTON,
        vec![FakeElement::hidden("Save"), FakeElement::visible("Save")],
    );
    let utility = driver.utility();

    utility.click(BUTTON).await.unwrap();

    let actions = driver.actions();
    assert_eq!(actions.len(), 1);
    assert!(actions[0].0.visible_only);
}

#[tokio::test]
async fn test_missing_element_times_out_and_soft_swallows() {
    let driver = FakeDriver::new();
    let utility = driver.utility();

    let err = utility
        .click(Target::new(BUTTON).timeout_ms(50))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(
        err.to_string(),
        format!("Timed out after 50ms waiting for {}", BUTTON)
    );

    assert!(utility.click(BUTTON).await.soft().is_none());
}

#[tokio::test]
async fn test_check_if_element_exists() {
    let driver = FakeDriver::new()
        .with_elements("#shown", vec![FakeElement::visible("x")])
        .with_elements("#hidden", vec![FakeElement::hidden("x")]);
    let utility = driver.utility();

    assert!(utility.check_if_element_exists("#shown").await);
    assert!(!utility.check_if_element_exists("#hidden").await);
    assert!(!utility.check_if_element_exists("#absent").await);

    assert!(utility.check_if_element_not_exists("#absent").await);
    assert!(!utility.check_if_element_not_exists("#shown").await);
}

#[tokio::test]
async fn test_page_loaded_tolerates_network_idle_timeout() {
    let driver = FakeDriver::new();
    driver.fail_load_state(LoadState::NetworkIdle);
    let utility = driver.utility();

    utility.wait_until_page_is_loaded().await;

    let waits = driver.load_waits();
    assert!(waits.contains(&LoadState::DomContentLoaded));
    assert!(waits.contains(&LoadState::NetworkIdle));
}

#[tokio::test]
async fn test_type_text_then_wait_for_value() {
    let driver = FakeDriver::new().with_elements("#name", vec![FakeElement::visible("")]);
    let utility = driver.utility();

    utility.type_text("#name", "Fluffy").await.unwrap();
    utility
        .wait_until_element_has_value("#name", "Fluffy")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reads() {
    let driver = FakeDriver::new().with_elements(
        ROWS,
        vec![FakeElement::visible("first"), FakeElement::hidden("second")],
    );
    let utility = driver.utility();

    assert_eq!(utility.get_count_of_elements(ROWS).await.unwrap(), 2);
    assert_eq!(utility.get_text(ROWS).await.unwrap(), vec!["first", "second"]);
    assert_eq!(
        utility.get_inner_text(Target::new(ROWS).nth(1)).await.unwrap(),
        "second"
    );

    let err = utility.get_inner_text("#absent").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_click_all_clicks_every_match() {
    let driver = FakeDriver::new().with_elements(
        ROWS,
        vec![
            FakeElement::visible("a"),
            FakeElement::visible("b"),
            FakeElement::visible("c"),
        ],
    );
    let utility = driver.utility();

    assert_eq!(utility.click_all(ROWS).await.unwrap(), 3);
    assert_eq!(clicked_nth(&driver), vec![Some(0), Some(1), Some(2)]);
}

#[tokio::test]
async fn test_frame_path_flows_into_query() {
    let driver = FakeDriver::new().with_elements(BUTTON, vec![FakeElement::visible("Save")]);
    let utility = driver.utility();

    utility
        .click(Target::new(BUTTON).in_frame("#outer|#inner"))
        .await
        .unwrap();

    let (query, _) = &driver.actions()[0];
    assert_eq!(query.frames.segments(), &["#outer", "#inner"]);
    assert_eq!(query.page_id.as_str(), "page-1");
}

#[tokio::test]
async fn test_expect_visible_uses_expect_timeout() {
    let driver = FakeDriver::new().with_elements(BUTTON, vec![FakeElement::visible("Save")]);
    let utility = driver.utility().with_expect_timeout(75);
    assert_eq!(utility.expect_timeout_ms(), 75);

    utility.expect_visible(BUTTON).await.unwrap();

    match utility.expect_visible("#missing").await.unwrap_err() {
        InteractionError::Timeout { selector, timeout_ms } => {
            assert_eq!(selector, "#missing");
            assert_eq!(timeout_ms, 75);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_expect_visible_prefers_target_timeout() {
    let utility = FakeDriver::new().utility().with_expect_timeout(75);

    let err = utility
        .expect_visible(Target::new("#missing").timeout_ms(40))
        .await
        .unwrap_err();
    assert!(matches!(err, InteractionError::Timeout { timeout_ms: 40, .. }));
}

#[tokio::test]
async fn test_expect_text_polls_within_expect_timeout() {
    let driver = FakeDriver::new().with_elements("#status", vec![FakeElement::visible("Profile saved")]);
    let utility = driver.utility().with_expect_timeout(200);

    utility.expect_text("#status", "saved").await.unwrap();

    let err = utility.expect_text("#status", "failed").await.unwrap_err();
    assert!(matches!(err, InteractionError::Timeout { timeout_ms: 200, .. }));
}
