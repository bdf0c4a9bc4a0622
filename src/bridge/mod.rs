//! Bridge modules for external service communication
//!
//! - `playwright`: browser automation through the Playwright sidecar
//! - `web`: plain HTTP requests via reqwest
//! - `rpc`: JSON-RPC plumbing shared by process-backed bridges
//!
//! [`BrowserDriver`] is the seam between the interaction layer and the
//! browser. The utility only ever talks to this trait, so anything that can
//! count, wait for and act on elements can stand in for Playwright.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod playwright;
pub mod rpc;
pub mod web;

pub use crate::locator::{ElementQuery, PageId};
pub use playwright::PlaywrightBridge;
pub use web::{RequestBody, WebBridge, WebResponse};

/// JSON-RPC error code the sidecar uses for Playwright `TimeoutError`s
pub const RPC_TIMEOUT_CODE: i32 = -32001;

/// Common error type for bridge operations
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to start server: {0}")]
    StartupFailed(String),

    #[error("Server disconnected")]
    Disconnected,

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },
}

impl BridgeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout(_))
    }
}

/// Page load milestones understood by `waitForLoadState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Load,
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

/// Element states accepted by `locator.waitFor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    Attached,
    Detached,
    Visible,
    Hidden,
}

/// How a `<select>` option is chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum SelectBy {
    Label(String),
    Index(usize),
}

/// Something to do with (or read from) a resolved element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementAction {
    Click,
    DblClick,
    Check,
    Fill { text: String },
    PressSequentially { text: String },
    Clear,
    Hover,
    Focus,
    ScrollIntoView,
    SetInputFiles { paths: Vec<String> },
    #[serde(rename_all = "camelCase")]
    SetInputBuffer {
        name: String,
        mime_type: String,
        buffer: Vec<u8>,
    },
    SelectOption { option: SelectBy },
    InnerText,
    AllTextContents,
    GetAttribute { name: String },
    InputValue,
    /// DOM property read through `evaluate`, e.g. `value`, `ariaSelected`, `disabled`
    Property { name: String },
    ComputedStyle { property: String },
    IsVisible,
    IsChecked,
}

impl ElementAction {
    pub fn name(&self) -> &'static str {
        match self {
            ElementAction::Click => "click",
            ElementAction::DblClick => "dblclick",
            ElementAction::Check => "check",
            ElementAction::Fill { .. } => "fill",
            ElementAction::PressSequentially { .. } => "pressSequentially",
            ElementAction::Clear => "clear",
            ElementAction::Hover => "hover",
            ElementAction::Focus => "focus",
            ElementAction::ScrollIntoView => "scrollIntoView",
            ElementAction::SetInputFiles { .. } => "setInputFiles",
            ElementAction::SetInputBuffer { .. } => "setInputBuffer",
            ElementAction::SelectOption { .. } => "selectOption",
            ElementAction::InnerText => "innerText",
            ElementAction::AllTextContents => "allTextContents",
            ElementAction::GetAttribute { .. } => "getAttribute",
            ElementAction::InputValue => "inputValue",
            ElementAction::Property { .. } => "property",
            ElementAction::ComputedStyle { .. } => "computedStyle",
            ElementAction::IsVisible => "isVisible",
            ElementAction::IsChecked => "isChecked",
        }
    }
}

/// A finished browser download waiting to be saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub download_id: String,
    pub suggested_filename: String,
}

/// Browser primitives the interaction layer is built on
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Open a fresh page in its own browser context
    async fn new_page(&self) -> Result<PageId, BridgeError>;

    async fn close_page(&self, page: &PageId) -> Result<(), BridgeError>;

    async fn goto(&self, page: &PageId, url: &str) -> Result<(), BridgeError>;

    async fn url(&self, page: &PageId) -> Result<String, BridgeError>;

    async fn title(&self, page: &PageId) -> Result<String, BridgeError>;

    async fn wait_for_load_state(
        &self,
        page: &PageId,
        state: LoadState,
        timeout_ms: Option<u64>,
    ) -> Result<(), BridgeError>;

    /// Pause on the page's clock
    async fn wait_for_timeout(&self, _page: &PageId, ms: u64) -> Result<(), BridgeError> {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        Ok(())
    }

    /// Number of elements currently matching the query (ignores `nth`)
    async fn count(&self, query: &ElementQuery) -> Result<usize, BridgeError>;

    async fn wait_for(
        &self,
        query: &ElementQuery,
        state: ElementState,
        timeout_ms: u64,
    ) -> Result<(), BridgeError>;

    /// Run an action on the element; reads return their value, writes `Null`
    async fn perform(&self, query: &ElementQuery, action: &ElementAction)
        -> Result<Value, BridgeError>;

    async fn keyboard_press(&self, page: &PageId, key: &str) -> Result<(), BridgeError>;

    async fn keyboard_type(
        &self,
        page: &PageId,
        text: &str,
        delay_ms: u64,
    ) -> Result<(), BridgeError>;

    async fn drag_and_drop(
        &self,
        source: &ElementQuery,
        target: &ElementQuery,
        force: bool,
    ) -> Result<(), BridgeError>;

    /// Resolve with the next popup opened by the page
    async fn wait_for_popup(&self, page: &PageId, timeout_ms: u64)
        -> Result<PageId, BridgeError>;

    async fn wait_for_download(
        &self,
        page: &PageId,
        timeout_ms: u64,
    ) -> Result<Download, BridgeError>;

    async fn save_download(&self, download: &Download, path: &Path) -> Result<(), BridgeError>;

    /// Resolve with the status of the next response whose URL matches the glob
    async fn wait_for_response(
        &self,
        page: &PageId,
        url_glob: &str,
        timeout_ms: u64,
    ) -> Result<u16, BridgeError>;

    /// Clear cookies, permissions and Cache Storage for the page's context
    async fn clear_cache(&self, page: &PageId) -> Result<(), BridgeError>;
}
