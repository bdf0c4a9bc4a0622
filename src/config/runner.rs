//! Runner configuration
//!
//! Settings for a suite run, loaded from `e2e.yaml`. Every field has a
//! default so an empty file (or no file at all) is a valid configuration:
//!
//! ```yaml
//! workers: 4
//! retries: 0
//! test_timeout_ms: 1200000
//! browser: chromium
//! headless: false
//! api_base_url: https://petstore.swagger.io
//!
//! logging:
//!   level: info
//!   output_dir: ./logs/Playwright
//!
//! sync:
//!   enabled: true
//!   concurrency: 4
//!   call_timeout_ms: 30000
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Browser types supported by the Playwright sidecar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserType::Chromium => "chromium",
            BrowserType::Firefox => "firefox",
            BrowserType::Webkit => "webkit",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum time one test (including retries of a single attempt) can run
    #[serde(default = "default_test_timeout")]
    pub test_timeout_ms: u64,

    /// Timeout used by assertion-style waits
    #[serde(default = "default_expect_timeout")]
    pub expect_timeout_ms: u64,

    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Maximum number of tests running at once in parallel suites
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default)]
    pub browser: BrowserType,

    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Base URL for the `request` fixture
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default)]
    pub logging: LogConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub sidecar: SidecarConfig,
}

fn default_test_timeout() -> u64 {
    1_200_000
}

fn default_expect_timeout() -> u64 {
    5000
}

fn default_retries() -> u32 {
    if running_on_ci() {
        2
    } else {
        0
    }
}

fn default_workers() -> usize {
    if running_on_ci() {
        1
    } else {
        4
    }
}

fn default_headless() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://petstore.swagger.io".to_string()
}

fn running_on_ci() -> bool {
    std::env::var("CI").map(|v| !v.is_empty()).unwrap_or(false)
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            test_timeout_ms: default_test_timeout(),
            expect_timeout_ms: default_expect_timeout(),
            retries: default_retries(),
            workers: default_workers(),
            browser: BrowserType::default(),
            headless: default_headless(),
            api_base_url: default_api_base_url(),
            logging: LogConfig::default(),
            sync: SyncConfig::default(),
            sidecar: SidecarConfig::default(),
        }
    }
}

impl RunnerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Log sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory that receives `tests.log`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./logs/Playwright")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output_dir: default_output_dir(),
        }
    }
}

/// Test plan outcome sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_sync_enabled")]
    pub enabled: bool,

    /// Upper bound on in-flight sync chains per test
    #[serde(default = "default_sync_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,
}

fn default_sync_enabled() -> bool {
    true
}

fn default_sync_concurrency() -> usize {
    4
}

fn default_call_timeout() -> u64 {
    30000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_sync_enabled(),
            concurrency: default_sync_concurrency(),
            call_timeout_ms: default_call_timeout(),
        }
    }
}

/// How to start the Playwright sidecar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarConfig {
    #[serde(default = "default_node")]
    pub node: String,

    #[serde(default = "default_script")]
    pub script: PathBuf,

    /// Extra arguments passed to the browser on launch
    #[serde(default)]
    pub launch_args: Vec<String>,
}

fn default_node() -> String {
    "node".to_string()
}

fn default_script() -> PathBuf {
    PathBuf::from("extensions/playwright/server.js")
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            script: default_script(),
            launch_args: Vec::new(),
        }
    }
}

/// HTTP client configuration shared by the API fixture and the sync client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub base_url: String,

    /// Default headers to include in all requests
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Default timeout in milliseconds
    #[serde(default = "default_web_timeout")]
    pub timeout: u64,

    pub auth: Option<WebAuthConfig>,

    pub retry: Option<WebRetryConfig>,
}

fn default_web_timeout() -> u64 {
    30000
}

impl WebConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: HashMap::new(),
            timeout: default_web_timeout(),
            auth: None,
            retry: None,
        }
    }

    pub fn with_auth(mut self, auth: WebAuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebAuthConfig {
    Bearer { token: String },
    /// Basic authentication (username and password or personal access token)
    Basic { username: String, password: String },
    ApiKey { header: String, key: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebRetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_attempts: u32,

    /// Initial delay between retries in milliseconds
    #[serde(default = "default_retry_initial_delay")]
    pub initial_delay: u64,

    #[serde(default = "default_retry_max_delay")]
    pub max_delay: u64,

    /// HTTP status codes that should trigger a retry
    #[serde(default = "default_retry_status_codes")]
    pub retry_on_status: Vec<u16>,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_initial_delay() -> u64 {
    1000
}

fn default_retry_max_delay() -> u64 {
    10000
}

fn default_retry_status_codes() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = RunnerConfig::from_yaml("").unwrap();
        assert_eq!(config.test_timeout_ms, 1_200_000);
        assert_eq!(config.expect_timeout_ms, 5000);
        assert_eq!(config.browser, BrowserType::Chromium);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.sync.concurrency, 4);
        assert_eq!(config.sync.call_timeout_ms, 30000);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
workers: 2
headless: false
browser: firefox
logging:
  level: debug
sync:
  enabled: false
"#;
        let config = RunnerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.workers, 2);
        assert!(!config.headless);
        assert_eq!(config.browser, BrowserType::Firefox);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.output_dir, PathBuf::from("./logs/Playwright"));
        assert!(!config.sync.enabled);
        assert_eq!(config.sync.concurrency, 4);
        assert_eq!(config.api_base_url, "https://petstore.swagger.io");
    }

    #[test]
    fn test_sidecar_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.sidecar.node, "node");
        assert_eq!(
            config.sidecar.script,
            PathBuf::from("extensions/playwright/server.js")
        );
    }

    #[test]
    fn test_web_auth_parse() {
        let yaml = r#"
base_url: https://dev.azure.com/org
auth:
  type: basic
  username: me
  password: pat
"#;
        let config: WebConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.timeout, 30000);
        match config.auth {
            Some(WebAuthConfig::Basic { username, password }) => {
                assert_eq!(username, "me");
                assert_eq!(password, "pat");
            }
            other => panic!("unexpected auth: {:?}", other),
        }
    }
}
