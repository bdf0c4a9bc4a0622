//! Playwright Bridge - Communication with the Playwright sidecar via JSON-RPC
//!
//! The sidecar (`extensions/playwright/server.js`) owns the real browser.
//! Each page lives in its own browser context so parallel tests never share
//! cookies or storage.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::rpc::{send_request, spawn_communication_task, RequestSender};
use super::{
    BridgeError, BrowserDriver, Download, ElementAction, ElementQuery, ElementState, LoadState,
    PageId,
};
use crate::config::{BrowserType, SidecarConfig};

pub struct PlaywrightBridge {
    request_tx: RequestSender,
    browser_id: String,
    #[allow(dead_code)]
    child: Child,
}

impl PlaywrightBridge {
    /// Spawn the sidecar and launch a browser in it
    pub async fn start(
        sidecar: &SidecarConfig,
        browser_type: BrowserType,
        headless: bool,
    ) -> Result<Self, BridgeError> {
        let node = which::which(&sidecar.node)
            .map_err(|e| BridgeError::StartupFailed(format!("{}: {}", sidecar.node, e)))?;

        let mut child = Command::new(node)
            .arg(&sidecar.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BridgeError::StartupFailed(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::StartupFailed("sidecar stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::StartupFailed("sidecar stdout unavailable".to_string()))?;

        let (request_tx, request_rx) = mpsc::channel(100);
        spawn_communication_task(request_rx, stdin, stdout);

        let result = send_request(
            &request_tx,
            "browser.launch",
            json!({
                "browserType": browser_type.as_str(),
                "headless": headless,
                "args": sidecar.launch_args,
            }),
        )
        .await?;
        let browser_id = string_field(&result, "browserId")?;

        info!(browser = browser_type.as_str(), headless, "Playwright browser launched");

        Ok(Self {
            request_tx,
            browser_id,
            child,
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, BridgeError> {
        debug!(method, "playwright request");
        send_request(&self.request_tx, method, params).await
    }

    pub async fn close(&self) -> Result<(), BridgeError> {
        self.request("browser.close", json!({ "browserId": self.browser_id }))
            .await?;
        Ok(())
    }
}

fn string_field(value: &Value, field: &str) -> Result<String, BridgeError> {
    value[field]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| BridgeError::ServerError(format!("No {} returned", field)))
}

#[async_trait]
impl BrowserDriver for PlaywrightBridge {
    async fn new_page(&self) -> Result<PageId, BridgeError> {
        let result = self
            .request("page.new", json!({ "browserId": self.browser_id }))
            .await?;
        Ok(PageId::new(string_field(&result, "pageId")?))
    }

    async fn close_page(&self, page: &PageId) -> Result<(), BridgeError> {
        self.request("page.close", json!({ "pageId": page })).await?;
        Ok(())
    }

    async fn goto(&self, page: &PageId, url: &str) -> Result<(), BridgeError> {
        self.request("page.goto", json!({ "pageId": page, "url": url }))
            .await?;
        Ok(())
    }

    async fn url(&self, page: &PageId) -> Result<String, BridgeError> {
        let result = self.request("page.url", json!({ "pageId": page })).await?;
        string_field(&result, "url")
    }

    async fn title(&self, page: &PageId) -> Result<String, BridgeError> {
        let result = self.request("page.title", json!({ "pageId": page })).await?;
        string_field(&result, "title")
    }

    async fn wait_for_load_state(
        &self,
        page: &PageId,
        state: LoadState,
        timeout_ms: Option<u64>,
    ) -> Result<(), BridgeError> {
        self.request(
            "page.waitForLoadState",
            json!({ "pageId": page, "state": state, "timeout": timeout_ms }),
        )
        .await?;
        Ok(())
    }

    async fn wait_for_timeout(&self, page: &PageId, ms: u64) -> Result<(), BridgeError> {
        self.request("page.waitForTimeout", json!({ "pageId": page, "timeout": ms }))
            .await?;
        Ok(())
    }

    async fn count(&self, query: &ElementQuery) -> Result<usize, BridgeError> {
        let result = self
            .request("locator.count", json!({ "query": query }))
            .await?;
        result["count"]
            .as_u64()
            .map(|c| c as usize)
            .ok_or_else(|| BridgeError::ServerError("No count returned".to_string()))
    }

    async fn wait_for(
        &self,
        query: &ElementQuery,
        state: ElementState,
        timeout_ms: u64,
    ) -> Result<(), BridgeError> {
        self.request(
            "locator.waitFor",
            json!({ "query": query, "state": state, "timeout": timeout_ms }),
        )
        .await?;
        Ok(())
    }

    async fn perform(
        &self,
        query: &ElementQuery,
        action: &ElementAction,
    ) -> Result<Value, BridgeError> {
        let result = self
            .request("locator.action", json!({ "query": query, "action": action }))
            .await?;
        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }

    async fn keyboard_press(&self, page: &PageId, key: &str) -> Result<(), BridgeError> {
        self.request("page.keyboardPress", json!({ "pageId": page, "key": key }))
            .await?;
        Ok(())
    }

    async fn keyboard_type(
        &self,
        page: &PageId,
        text: &str,
        delay_ms: u64,
    ) -> Result<(), BridgeError> {
        self.request(
            "page.keyboardType",
            json!({ "pageId": page, "text": text, "delay": delay_ms }),
        )
        .await?;
        Ok(())
    }

    async fn drag_and_drop(
        &self,
        source: &ElementQuery,
        target: &ElementQuery,
        force: bool,
    ) -> Result<(), BridgeError> {
        self.request(
            "page.dragAndDrop",
            json!({ "source": source, "target": target, "force": force }),
        )
        .await?;
        Ok(())
    }

    async fn wait_for_popup(
        &self,
        page: &PageId,
        timeout_ms: u64,
    ) -> Result<PageId, BridgeError> {
        let result = self
            .request(
                "page.waitForEvent",
                json!({ "pageId": page, "event": "popup", "timeout": timeout_ms }),
            )
            .await?;
        Ok(PageId::new(string_field(&result, "pageId")?))
    }

    async fn wait_for_download(
        &self,
        page: &PageId,
        timeout_ms: u64,
    ) -> Result<Download, BridgeError> {
        let result = self
            .request(
                "page.waitForEvent",
                json!({ "pageId": page, "event": "download", "timeout": timeout_ms }),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn save_download(&self, download: &Download, path: &Path) -> Result<(), BridgeError> {
        self.request(
            "download.saveAs",
            json!({ "downloadId": download.download_id, "path": path }),
        )
        .await?;
        Ok(())
    }

    async fn wait_for_response(
        &self,
        page: &PageId,
        url_glob: &str,
        timeout_ms: u64,
    ) -> Result<u16, BridgeError> {
        let result = self
            .request(
                "page.waitForResponse",
                json!({ "pageId": page, "url": url_glob, "timeout": timeout_ms }),
            )
            .await?;
        result["status"]
            .as_u64()
            .map(|s| s as u16)
            .ok_or_else(|| BridgeError::ServerError("No status returned".to_string()))
    }

    async fn clear_cache(&self, page: &PageId) -> Result<(), BridgeError> {
        self.request("page.clearCache", json!({ "pageId": page }))
            .await?;
        Ok(())
    }
}
