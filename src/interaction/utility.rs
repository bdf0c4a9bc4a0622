//! Element interaction utility
//!
//! Every operation follows the same shape: resolve the target against the
//! page (window, then frames), count the matches, pick the requested
//! occurrence when there are several, wait for it, then act. Each call runs
//! as a named step and logs the selector, match count and outcome.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};

use super::error::InteractionError;
use super::step::{step_title, Steps};
use crate::bridge::{BrowserDriver, ElementAction, ElementState, LoadState, SelectBy};
use crate::locator::{ElementQuery, FramePath, PageId, Target, DEFAULT_EXPECT_TIMEOUT_MS};

const OWNER: &str = "Utility";

/// Default pause between keystrokes for `keyboard_type`
pub const DEFAULT_KEYSTROKE_DELAY_MS: u64 = 200;

const DROPDOWN_OPTION_SELECTOR: &str = r#"li[role="option"]"#;
const MASKED_BODY_SELECTOR: &str = "body[id*=ext-gen]";

/// DOM properties readable through `get_html_attribute_value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlProperty {
    Value,
    AriaSelected,
    Disabled,
}

impl HtmlProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            HtmlProperty::Value => "value",
            HtmlProperty::AriaSelected => "ariaSelected",
            HtmlProperty::Disabled => "disabled",
        }
    }
}

#[derive(Clone)]
pub struct Utility {
    driver: Arc<dyn BrowserDriver>,
    page: PageId,
    steps: Steps,
    expect_timeout_ms: u64,
}

impl Utility {
    pub fn new(driver: Arc<dyn BrowserDriver>, page: PageId, steps: Steps) -> Self {
        Self {
            driver,
            page,
            steps,
            expect_timeout_ms: DEFAULT_EXPECT_TIMEOUT_MS,
        }
    }

    /// Budget for `expect_*` assertions when the target carries no timeout
    pub fn with_expect_timeout(mut self, ms: u64) -> Self {
        self.expect_timeout_ms = ms;
        self
    }

    pub fn expect_timeout_ms(&self) -> u64 {
        self.expect_timeout_ms
    }

    pub fn page(&self) -> &PageId {
        &self.page
    }

    pub fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    /// Same utility bound to another window, e.g. a popup
    pub fn for_window(&self, page: PageId) -> Self {
        Self {
            driver: self.driver.clone(),
            page,
            steps: self.steps.clone(),
            expect_timeout_ms: self.expect_timeout_ms,
        }
    }

    pub(crate) fn title(operation: &str, description: Option<&str>) -> String {
        step_title(OWNER, operation, description)
    }

    /// Resolve a target to its element address, descending one frame per segment
    pub fn locate(&self, target: &Target) -> ElementQuery {
        let query = target.resolve(&self.page);
        for frame in query.frames.segments() {
            info!("Finding Frame with element selector {}", frame);
        }
        query
    }

    /// Address of the frame chain itself, for callers composing their own selectors
    pub fn get_frame(&self, path: &str) -> FramePath {
        let frames = FramePath::parse(path);
        for frame in frames.segments() {
            info!("Finding Frame with element selector {}", frame);
        }
        frames
    }

    /// Count matches and pick the element to act on.
    ///
    /// With several matches the target's occurrence (default 0) is used and
    /// must be in range; with one or none, the first match is used.
    pub(crate) async fn resolve(
        &self,
        target: &Target,
        visible_only: bool,
    ) -> Result<(ElementQuery, usize), InteractionError> {
        let mut query = self.locate(target);
        if visible_only {
            query = query.visible();
        }
        let count = self
            .driver
            .count(&query)
            .await
            .map_err(|e| self.driver_error(e, target))?;
        info!("No of elements found with locator {} are {}", target.selector, count);

        if count > 1 {
            let occurrence = target.occurrence_or_default();
            if occurrence >= count {
                return Err(InteractionError::OccurrenceOutOfRange {
                    selector: target.selector.clone(),
                    occurrence,
                    count,
                });
            }
            Ok((query.nth(occurrence), count))
        } else {
            Ok((query.first(), count))
        }
    }

    pub(crate) fn driver_error(
        &self,
        err: crate::bridge::BridgeError,
        target: &Target,
    ) -> InteractionError {
        InteractionError::from_driver(err, &target.selector, target.timeout_or_default())
    }

    /// Resolve, wait for `state`, then perform
    pub(crate) async fn act_when(
        &self,
        target: &Target,
        action: ElementAction,
        visible_only: bool,
        state: ElementState,
    ) -> Result<Value, InteractionError> {
        let (query, _) = self.resolve(target, visible_only).await?;
        self.driver
            .wait_for(&query, state, target.timeout_or_default())
            .await
            .map_err(|e| self.driver_error(e, target))?;
        self.driver
            .perform(&query, &action)
            .await
            .map_err(|e| self.driver_error(e, target))
    }

    pub(crate) async fn act(
        &self,
        target: &Target,
        action: ElementAction,
    ) -> Result<Value, InteractionError> {
        self.act_when(target, action, false, ElementState::Visible)
            .await
    }

    /// Resolve and read without waiting; nothing matching is `NotFound`
    pub(crate) async fn read(
        &self,
        target: &Target,
        action: ElementAction,
    ) -> Result<Value, InteractionError> {
        let (query, count) = self.resolve(target, false).await?;
        if count == 0 {
            return Err(InteractionError::NotFound {
                selector: target.selector.clone(),
            });
        }
        self.driver
            .perform(&query, &action)
            .await
            .map_err(|e| self.driver_error(e, target))
    }

    fn log_failure<T>(
        what: &str,
        selector: &str,
        result: Result<T, InteractionError>,
    ) -> Result<T, InteractionError> {
        if let Err(e) = &result {
            error!("{} {} failed with exception {}", what, selector, e);
        }
        result
    }

    pub async fn goto(&self, url: &str) -> Result<(), InteractionError> {
        self.steps
            .run(Self::title("goto", Some("Navigate")), async {
                info!("Navigating to {}", url);
                self.driver
                    .goto(&self.page, url)
                    .await
                    .map_err(InteractionError::from)
            })
            .await
    }

    pub async fn click(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("click", Some("Click on element")), async {
                info!("Clicking on element with selector {}", target.selector);
                let result = self
                    .act_when(&target, ElementAction::Click, true, ElementState::Visible)
                    .await
                    .map(|_| ());
                Self::log_failure("Clicking on element", &target.selector, result)
            })
            .await
    }

    /// Click the element whose visible text is the target's selector
    pub async fn click_using_text(&self, text: impl Into<Target>) -> Result<(), InteractionError> {
        let mut target = text.into();
        info!("Clicking on element with text {}", target.selector);
        target.selector = format!("text={}", target.selector);
        self.steps
            .run(Self::title("clickUsingText", Some("Click on element with text")), async {
                let result = self.act(&target, ElementAction::Click).await.map(|_| ());
                Self::log_failure("Clicking on element with text", &target.selector, result)
            })
            .await
    }

    /// Click every match in document order; returns how many were clicked
    pub async fn click_all(&self, target: impl Into<Target>) -> Result<usize, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("clickAll", Some("Click on all elements")), async {
                info!("Clicking on all elements with selector {}", target.selector);
                let query = self.locate(&target);
                let count = self
                    .driver
                    .count(&query)
                    .await
                    .map_err(|e| self.driver_error(e, &target))?;
                for i in 0..count {
                    let result = self
                        .driver
                        .perform(&query.nth(i), &ElementAction::Click)
                        .await
                        .map_err(|e| self.driver_error(e, &target));
                    Self::log_failure("Clicking on element", &target.selector, result)?;
                }
                Ok(count)
            })
            .await
    }

    pub async fn check(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("check", Some("Checkbox click on element")), async {
                info!("Checking element with selector {}", target.selector);
                let result = self.act(&target, ElementAction::Check).await.map(|_| ());
                Self::log_failure("Checking element", &target.selector, result)
            })
            .await
    }

    pub async fn double_click(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("doubleClick", Some("Double Click")), async {
                info!("Double clicking on element with selector {}", target.selector);
                let result = self.act(&target, ElementAction::DblClick).await.map(|_| ());
                Self::log_failure("Double clicking on element", &target.selector, result)
            })
            .await
    }

    pub async fn hover(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("hover", Some("Hover on element")), async {
                info!("Hovering on element with selector {}", target.selector);
                let result = self.act(&target, ElementAction::Hover).await.map(|_| ());
                Self::log_failure("Hovering on element", &target.selector, result)
            })
            .await
    }

    pub async fn drag_and_drop(
        &self,
        source: impl Into<Target>,
        destination: impl Into<Target>,
        force: bool,
    ) -> Result<(), InteractionError> {
        let source = source.into();
        let destination = destination.into();
        self.steps
            .run(
                Self::title("dragAndDrop", Some("Drag and drop an element on another element")),
                async {
                    info!(
                        "Dragging element {} onto element {}",
                        source.selector, destination.selector
                    );
                    let (from, _) = self.resolve(&source, false).await?;
                    let (to, _) = self.resolve(&destination, false).await?;
                    let result = self
                        .driver
                        .drag_and_drop(&from, &to, force)
                        .await
                        .map_err(|e| self.driver_error(e, &source));
                    Self::log_failure(
                        "Drag and drop of element",
                        &format!("{} on element {}", source.selector, destination.selector),
                        result,
                    )
                },
            )
            .await
    }

    pub async fn type_text(
        &self,
        target: impl Into<Target>,
        text: &str,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("typeText", Some("Type Text")), async {
                info!("Trying to get the selector {}", target.selector);
                let result = self
                    .act(
                        &target,
                        ElementAction::Fill {
                            text: text.to_string(),
                        },
                    )
                    .await
                    .map(|_| ());
                let result = Self::log_failure("Typing into element", &target.selector, result);
                if result.is_ok() {
                    info!("Sent Text {} to element {}", text, target.selector);
                }
                result
            })
            .await
    }

    /// Clear the field, then press each key of `text` in turn
    pub async fn type_text_sequentially(
        &self,
        target: impl Into<Target>,
        text: &str,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("typeTextSequentially", Some("Type Text Sequentially")), async {
                info!("Trying to get the selector {}", target.selector);
                let result = async {
                    self.act(
                        &target,
                        ElementAction::Fill {
                            text: String::new(),
                        },
                    )
                    .await?;
                    self.act(
                        &target,
                        ElementAction::PressSequentially {
                            text: text.to_string(),
                        },
                    )
                    .await?;
                    Ok::<(), InteractionError>(())
                }
                .await;
                let result = Self::log_failure("Typing into element", &target.selector, result);
                if result.is_ok() {
                    info!("Sent Text {} to element {}", text, target.selector);
                }
                result
            })
            .await
    }

    pub async fn clear(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("clear", None), async {
                info!("Clearing element with selector {}", target.selector);
                let result = self.act(&target, ElementAction::Clear).await.map(|_| ());
                Self::log_failure("Clearing element", &target.selector, result)
            })
            .await
    }

    pub async fn focus(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("focus", Some("focus on element")), async {
                self.act(&target, ElementAction::Focus).await?;
                info!("Focussed element {}", target.selector);
                Ok(())
            })
            .await
    }

    pub async fn scroll_into_view(&self, target: impl Into<Target>) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("scrollIntoView", None), async {
                self.act_when(
                    &target,
                    ElementAction::ScrollIntoView,
                    false,
                    ElementState::Attached,
                )
                .await?;
                info!(
                    "scrolled until the element with selector {} is in view",
                    target.selector
                );
                Ok(())
            })
            .await
    }

    pub async fn upload_file(
        &self,
        target: impl Into<Target>,
        file_path: impl AsRef<Path>,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        let path = file_path.as_ref().to_string_lossy().to_string();
        self.steps
            .run(Self::title("uploadFile", None), async {
                info!("UploadFile on element with selector {}", target.selector);
                let result = self
                    .act_when(
                        &target,
                        ElementAction::SetInputFiles { paths: vec![path] },
                        false,
                        ElementState::Attached,
                    )
                    .await
                    .map(|_| ());
                Self::log_failure("uploadFile", &target.selector, result)
            })
            .await
    }

    /// Upload an image from disk under a chosen file name as `image/png`
    pub async fn upload_image(
        &self,
        target: impl Into<Target>,
        image_path: impl AsRef<Path>,
        image_name: &str,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        let image_path = image_path.as_ref().to_path_buf();
        self.steps
            .run(Self::title("uploadImage", None), async {
                let buffer = tokio::fs::read(&image_path).await?;
                info!(
                    "Uploading image {} ({} bytes) to {}",
                    image_name,
                    buffer.len(),
                    target.selector
                );
                self.act_when(
                    &target,
                    ElementAction::SetInputBuffer {
                        name: image_name.to_string(),
                        mime_type: "image/png".to_string(),
                        buffer,
                    },
                    false,
                    ElementState::Attached,
                )
                .await?;
                Ok(())
            })
            .await
    }

    /// Select an option of a `<select>` element by label or index
    pub async fn select_drop_down_value(
        &self,
        target: impl Into<Target>,
        option: SelectBy,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("selectDropDownValue", Some("Select Dropdown Value")), async {
                info!(
                    "Trying to select dropdown item {} with {:?}",
                    target.selector, option
                );
                self.act(
                    &target,
                    ElementAction::SelectOption {
                        option: option.clone(),
                    },
                )
                .await?;
                info!(
                    "Dropdown Value selection is performed on element with selector {}",
                    target.selector
                );
                Ok(())
            })
            .await
    }

    /// Click the ARIA option with the given accessible name
    pub async fn select_drop_down_option(&self, text: &str) -> Result<(), InteractionError> {
        let target = Target::new(format!(
            r#"internal:role=option[name="{}"i]"#,
            escape_quotes(text)
        ));
        self.steps
            .run(Self::title("selectDropDownOption", Some("Select Dropdown Option")), async {
                self.act(&target, ElementAction::Click).await?;
                info!("clicked on dropdown Item with text {}", text);
                Ok(())
            })
            .await
    }

    pub fn get_drop_down_item_with_text(&self, text: &str, frame: Option<&str>) -> ElementQuery {
        info!("Getting the dropdown Item with text {}", text);
        let target = Target::new(format!(
            r#"{}:has-text("{}")"#,
            DROPDOWN_OPTION_SELECTOR,
            escape_quotes(text)
        ))
        .in_frame(frame.unwrap_or_default());
        self.locate(&target)
    }

    pub async fn get_drop_down_items(
        &self,
        frame: Option<&str>,
    ) -> Result<Vec<String>, InteractionError> {
        let target = Target::new(DROPDOWN_OPTION_SELECTOR).in_frame(frame.unwrap_or_default());
        self.get_text(target).await
    }

    /// Click the down-arrow inside the resolved dropdown element
    pub async fn expand_drop_down_item(
        &self,
        target: impl Into<Target>,
    ) -> Result<(), InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("expandDropDownItem", Some("Expand Dropdown Item")), async {
                let element = self.get_element(target.clone()).await?;
                let arrow = element.with_selector(format!(
                    r#"{} >> nth={} >> [arialabel="downArrow"]"#,
                    element.selector,
                    element.nth.unwrap_or(0)
                ));
                self.driver
                    .perform(&arrow, &ElementAction::Click)
                    .await
                    .map_err(|e| self.driver_error(e, &target))?;
                info!("Expanded Dropdown Item with selector {}", target.selector);
                Ok(())
            })
            .await
    }

    /// Check every unchecked checkbox; returns how many had to be checked
    pub async fn verify_and_check_all_checkboxes(
        &self,
        target: impl Into<Target>,
    ) -> Result<usize, InteractionError> {
        let target = target.into();
        self.steps
            .run(
                Self::title(
                    "verifyAndCheckAllCheckboxes",
                    Some("Verify and check all checkboxes if not checked"),
                ),
                async {
                    info!("Checking all checkboxes with selector {}", target.selector);
                    let query = self.locate(&target);
                    let count = self
                        .driver
                        .count(&query)
                        .await
                        .map_err(|e| self.driver_error(e, &target))?;
                    let mut newly_checked = 0;
                    for i in 0..count {
                        let checkbox = query.nth(i);
                        let checked = self
                            .driver
                            .perform(&checkbox, &ElementAction::IsChecked)
                            .await
                            .map_err(|e| self.driver_error(e, &target))?;
                        if !checked.as_bool().unwrap_or(false) {
                            self.driver
                                .perform(&checkbox, &ElementAction::Check)
                                .await
                                .map_err(|e| self.driver_error(e, &target))?;
                            newly_checked += 1;
                            info!("Checkbox at index {} was not checked and has been checked.", i);
                        }
                    }
                    if newly_checked == 0 {
                        info!("All checkboxes were already checked.");
                    } else {
                        info!("All checkboxes are now checked.");
                    }
                    Ok(newly_checked)
                },
            )
            .await
    }

    pub async fn keyboard(&self, key: &str) -> Result<(), InteractionError> {
        self.steps
            .run(Self::title("keyboard", Some("Press KeyboardEvent")), async {
                self.driver.keyboard_press(&self.page, key).await?;
                info!("Pressed key {}", key);
                Ok(())
            })
            .await
    }

    /// Optionally click `target` first, then type with a delay between keys
    pub async fn keyboard_type(
        &self,
        target: Option<Target>,
        text: &str,
        delay_ms: Option<u64>,
    ) -> Result<(), InteractionError> {
        self.steps
            .run(Self::title("keyboardType", Some("Press Keyboard Type")), async {
                if let Some(target) = target {
                    self.click(target).await?;
                }
                self.driver
                    .keyboard_type(
                        &self.page,
                        text,
                        delay_ms.unwrap_or(DEFAULT_KEYSTROKE_DELAY_MS),
                    )
                    .await?;
                info!("Typed {} with keyboard", text);
                Ok(())
            })
            .await
    }

    /// Dismiss an ExtJS modal mask by clicking `button` when the body is masked
    pub async fn handle_popup(&self, button: impl Into<Target>) -> Result<bool, InteractionError> {
        let button = button.into();
        self.steps
            .run(Self::title("handlePopup", None), async {
                let mut body = Target::new(MASKED_BODY_SELECTOR);
                body.frame = button.frame.clone();
                body.window = button.window.clone();
                let class = self.get_attribute_value(body, "class").await?;
                if class.is_some_and(|c| c.contains("x-body-masked")) {
                    self.click(button).await?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            })
            .await
    }

    pub async fn clear_cache(&self) -> Result<(), InteractionError> {
        self.steps
            .run(Self::title("clearCache", Some("Clear Page Cache")), async {
                self.driver.clear_cache(&self.page).await?;
                info!("Page cache cleared successfully");
                Ok(())
            })
            .await
    }

    pub async fn get_attribute_value(
        &self,
        target: impl Into<Target>,
        attribute_name: &str,
    ) -> Result<Option<String>, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("getAttributeValue", Some("Get Attribute Value")), async {
                let value = self
                    .read(
                        &target,
                        ElementAction::GetAttribute {
                            name: attribute_name.to_string(),
                        },
                    )
                    .await?;
                Ok(value.as_str().map(str::to_string))
            })
            .await
    }

    pub async fn get_html_attribute_value(
        &self,
        target: impl Into<Target>,
        property: HtmlProperty,
    ) -> Result<Value, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("getHtmlAttributeValue", None), async {
                self.read(
                    &target,
                    ElementAction::Property {
                        name: property.as_str().to_string(),
                    },
                )
                .await
            })
            .await
    }

    pub async fn get_css_value(
        &self,
        target: impl Into<Target>,
        css_property: &str,
    ) -> Result<String, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("getCssValue", None), async {
                let value = self
                    .read(
                        &target,
                        ElementAction::ComputedStyle {
                            property: css_property.to_string(),
                        },
                    )
                    .await?;
                expect_string(value, &target)
            })
            .await
    }

    pub async fn get_inner_text(&self, target: impl Into<Target>) -> Result<String, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("getInnerText", Some("Get InnerText of Element")), async {
                let value = self.read(&target, ElementAction::InnerText).await?;
                expect_string(value, &target)
            })
            .await
    }

    /// Text of every match, hidden elements included
    pub async fn get_text(&self, target: impl Into<Target>) -> Result<Vec<String>, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("getText", Some("Get Element Text")), async {
                let query = self.locate(&target);
                let value = self
                    .driver
                    .perform(&query, &ElementAction::AllTextContents)
                    .await
                    .map_err(|e| self.driver_error(e, &target))?;
                serde_json::from_value(value).map_err(|e| InteractionError::UnexpectedValue {
                    selector: target.selector.clone(),
                    message: e.to_string(),
                })
            })
            .await
    }

    pub async fn get_count_of_elements(
        &self,
        target: impl Into<Target>,
    ) -> Result<usize, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("getCountOfElements", Some("Get Count Of Elements")), async {
                let count = self
                    .driver
                    .count(&self.locate(&target))
                    .await
                    .map_err(|e| self.driver_error(e, &target))?;
                info!("No of Elements found with selector {} is {}", target.selector, count);
                Ok(count)
            })
            .await
    }

    /// The element an action on `target` would use
    pub async fn get_element(&self, target: impl Into<Target>) -> Result<ElementQuery, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("getElement", Some("Get Element")), async {
                let (query, _) = self.resolve(&target, false).await?;
                Ok(query)
            })
            .await
    }

    pub fn get_element_first(&self, target: impl Into<Target>) -> ElementQuery {
        self.locate(&target.into()).first()
    }

    pub fn get_element_second(&self, target: impl Into<Target>) -> ElementQuery {
        self.locate(&target.into()).nth(1)
    }

    pub async fn get_element_last(
        &self,
        target: impl Into<Target>,
    ) -> Result<ElementQuery, InteractionError> {
        let target = target.into();
        let query = self.locate(&target);
        let count = self
            .driver
            .count(&query)
            .await
            .map_err(|e| self.driver_error(e, &target))?;
        match count {
            0 => Err(InteractionError::NotFound {
                selector: target.selector,
            }),
            n => Ok(query.nth(n - 1)),
        }
    }

    pub async fn get_element_with_text(
        &self,
        text: impl Into<Target>,
    ) -> Result<ElementQuery, InteractionError> {
        let mut target = text.into();
        target.selector = format!("text={}", target.selector);
        self.get_element(target).await
    }

    pub fn get_element_by_label(&self, label: &str, frame: Option<&str>) -> ElementQuery {
        info!("Trying to get the selector {} by label", label);
        let target = Target::new(format!(r#"internal:label="{}"i"#, escape_quotes(label)))
            .in_frame(frame.unwrap_or_default());
        self.locate(&target).first()
    }

    /// Run `trigger` while waiting for the popup it opens; returns the new window
    pub async fn wait_for_window<F, T>(&self, trigger: F) -> Result<PageId, InteractionError>
    where
        F: Future<Output = Result<T, InteractionError>> + Send,
    {
        self.steps
            .run(Self::title("waitForWindow", Some("Wait For New Window")), async {
                let popup = async {
                    self.driver
                        .wait_for_popup(&self.page, crate::locator::DEFAULT_TIMEOUT_MS)
                        .await
                        .map_err(InteractionError::from)
                };
                let (popup, _) = tokio::try_join!(popup, trigger)?;
                self.driver
                    .wait_for_load_state(&popup, LoadState::Load, None)
                    .await?;
                info!("New window {} opened", popup);
                Ok(popup)
            })
            .await
    }

    /// Click `target`, save the download it starts under `dir` (default `~/Downloads`)
    pub async fn download_file(
        &self,
        target: impl Into<Target>,
        dir: Option<&Path>,
    ) -> Result<PathBuf, InteractionError> {
        let target = target.into();
        self.steps
            .run(Self::title("downloadFile", Some("Download File")), async {
                let download = async {
                    self.driver
                        .wait_for_download(&self.page, target.timeout_or_default())
                        .await
                        .map_err(|e| self.driver_error(e, &target))
                };
                let click = async {
                    let query = self.locate(&target);
                    self.driver
                        .perform(&query, &ElementAction::Click)
                        .await
                        .map_err(|e| self.driver_error(e, &target))
                };
                let (download, _) = tokio::try_join!(download, click)?;

                let dir = dir.map(Path::to_path_buf).unwrap_or_else(default_download_dir);
                let path = dir.join(&download.suggested_filename);
                self.driver.save_download(&download, &path).await?;
                info!("Downloaded file saved to {}", path.display());
                Ok(path)
            })
            .await
    }

    /// Run `trigger` while waiting for one response per endpoint; returns their statuses
    pub async fn wait_for_api_calls<F, T>(
        &self,
        endpoints: &[&str],
        trigger: F,
    ) -> Result<Vec<u16>, InteractionError>
    where
        F: Future<Output = Result<T, InteractionError>> + Send,
    {
        self.steps
            .run(Self::title("waitForApiCalls", Some("Wait For API Calls")), async {
                info!("waiting for API calls {:?}", endpoints);
                let responses = futures::future::try_join_all(endpoints.iter().map(|endpoint| {
                    let glob = response_glob(endpoint);
                    async move {
                        self.driver
                            .wait_for_response(&self.page, &glob, crate::locator::DEFAULT_TIMEOUT_MS)
                            .await
                            .map_err(|e| InteractionError::from_driver(
                                e,
                                &glob,
                                crate::locator::DEFAULT_TIMEOUT_MS,
                            ))
                    }
                }));
                let settle = async {
                    tokio::time::sleep(Duration::from_millis(2000)).await;
                    Ok::<(), InteractionError>(())
                };
                let (statuses, _, _) = tokio::try_join!(responses, trigger, settle)?;
                Ok(statuses)
            })
            .await
    }
}

fn expect_string(value: Value, target: &Target) -> Result<String, InteractionError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(InteractionError::UnexpectedValue {
            selector: target.selector.clone(),
            message: format!("expected a string, got {}", other),
        }),
    }
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// `**/endpoint*`, the glob `waitForResponse` matches against
pub(crate) fn response_glob(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("**{}*", endpoint)
    } else {
        format!("**/{}*", endpoint)
    }
}

fn default_download_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
}
