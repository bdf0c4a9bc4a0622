//! Element locator resolution
//!
//! A [`Target`] is what page actions hand to the utility layer: a selector,
//! an optional `|`-delimited frame path, an optional occurrence index, an
//! optional timeout and an optional explicit window. The utility resolves it
//! against a page into an [`ElementQuery`], the concrete address the driver
//! understands.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default wait applied when a target carries no timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default budget for `expect_*` assertions
pub const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 5_000;

/// Opaque handle to a page (tab or popup window) owned by the driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chain of frame selectors, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FramePath(Vec<String>);

impl FramePath {
    /// Split a `|`-delimited frame path. Blank segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for FramePath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for FramePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("|"))
    }
}

/// Selector descriptor passed to every utility operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub selector: String,
    pub frame: Option<FramePath>,
    pub occurrence: Option<usize>,
    pub timeout: Option<Duration>,
    pub window: Option<PageId>,
}

impl Target {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            frame: None,
            occurrence: None,
            timeout: None,
            window: None,
        }
    }

    /// Target for Playwright's `text=` engine
    pub fn text(text: &str) -> Self {
        Self::new(format!("text={}", text))
    }

    pub fn in_frame(mut self, path: impl Into<FramePath>) -> Self {
        let path = path.into();
        self.frame = if path.is_empty() { None } else { Some(path) };
        self
    }

    /// Pick the zero-based occurrence when the selector matches several elements
    pub fn nth(mut self, occurrence: usize) -> Self {
        self.occurrence = Some(occurrence);
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(ms));
        self
    }

    /// Act in another window (e.g. a popup) instead of the utility's page
    pub fn in_window(mut self, page: PageId) -> Self {
        self.window = Some(page);
        self
    }

    pub fn occurrence_or_default(&self) -> usize {
        self.occurrence.unwrap_or(0)
    }

    pub fn timeout_or_default(&self) -> u64 {
        self.timeout_or(DEFAULT_TIMEOUT_MS)
    }

    pub fn timeout_or(&self, fallback_ms: u64) -> u64 {
        self.timeout
            .map(|d| d.as_millis() as u64)
            .unwrap_or(fallback_ms)
    }

    /// Resolve against the default page: explicit window first, then frames
    pub fn resolve(&self, default_page: &PageId) -> ElementQuery {
        let page_id = self.window.clone().unwrap_or_else(|| default_page.clone());
        ElementQuery {
            page_id,
            frames: self.frame.clone().unwrap_or_default(),
            selector: self.selector.clone(),
            nth: None,
            visible_only: false,
        }
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Self::new(selector)
    }
}

impl From<&String> for Target {
    fn from(selector: &String) -> Self {
        Self::new(selector.clone())
    }
}

/// Concrete element address: page, frame chain, selector, filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementQuery {
    pub page_id: PageId,
    pub frames: FramePath,
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth: Option<usize>,
    pub visible_only: bool,
}

impl ElementQuery {
    pub fn on_page(page_id: &PageId, selector: impl Into<String>) -> Self {
        Self {
            page_id: page_id.clone(),
            frames: FramePath::default(),
            selector: selector.into(),
            nth: None,
            visible_only: false,
        }
    }

    pub fn nth(&self, index: usize) -> Self {
        Self {
            nth: Some(index),
            ..self.clone()
        }
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    pub fn visible(&self) -> Self {
        Self {
            visible_only: true,
            ..self.clone()
        }
    }

    pub fn with_selector(&self, selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            nth: None,
            ..self.clone()
        }
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames.segments() {
            write!(f, "{} >> ", frame)?;
        }
        f.write_str(&self.selector)?;
        if self.visible_only {
            f.write_str(" >> visible=true")?;
        }
        if let Some(n) = self.nth {
            write!(f, " >> nth={}", n)?;
        }
        Ok(())
    }
}
