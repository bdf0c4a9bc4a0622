//! Web/HTTP Bridge - HTTP requests for API tests and outcome sync
//!
//! Executes requests directly with reqwest. It supports:
//! - GET, POST, PUT, PATCH, DELETE methods with JSON, form or raw bodies
//! - Authentication (Bearer, Basic, API Key)
//! - Retry with exponential backoff on configured status codes
//! - Default and per-request headers

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::BridgeError;
use crate::config::{WebAuthConfig, WebConfig};

/// Request payload variants
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(Value),
    Form(Vec<(String, String)>),
    Raw { content: String, content_type: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Value,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct WebBridge {
    config: WebConfig,
    client: reqwest::Client,
}

impl WebBridge {
    pub fn new(config: WebConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout))
            .build()
            .map_err(|e| BridgeError::StartupFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.config.base_url.trim_end_matches('/');
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        format!("{}{}", base, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth {
            Some(WebAuthConfig::Bearer { token }) => request.bearer_auth(token),
            Some(WebAuthConfig::Basic { username, password }) => {
                request.basic_auth(username, Some(password))
            }
            Some(WebAuthConfig::ApiKey { header, key }) => request.header(header, key),
            None => request,
        }
    }

    fn apply_headers(
        &self,
        mut request: reqwest::RequestBuilder,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> reqwest::RequestBuilder {
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        if let Some(headers) = extra_headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        request
    }

    fn apply_body(request: reqwest::RequestBuilder, body: &RequestBody) -> reqwest::RequestBuilder {
        match body {
            RequestBody::None => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Form(fields) => request.form(fields),
            RequestBody::Raw {
                content,
                content_type,
            } => request
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(content.clone()),
        }
    }

    fn should_retry(&self, status: u16, attempt: u32) -> bool {
        if let Some(ref retry) = self.config.retry {
            if attempt + 1 < retry.max_attempts {
                return retry.retry_on_status.contains(&status);
            }
        }
        false
    }

    fn get_retry_delay(&self, attempt: u32) -> Duration {
        if let Some(ref retry) = self.config.retry {
            let delay = retry.initial_delay * 2u64.pow(attempt.saturating_sub(1));
            let delay = delay.min(retry.max_delay);
            Duration::from_millis(delay)
        } else {
            Duration::from_millis(1000)
        }
    }

    async fn execute_with_retry(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &RequestBody,
        headers: Option<&HashMap<String, String>>,
        query: &[(&str, String)],
    ) -> Result<WebResponse, BridgeError> {
        let url = self.build_url(path);
        let max_attempts = self
            .config
            .retry
            .as_ref()
            .map(|r| r.max_attempts.max(1))
            .unwrap_or(1);

        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.get_retry_delay(attempt);
                warn!(
                    "Retrying request (attempt {}/{}) after {:?}",
                    attempt + 1,
                    max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            let start = std::time::Instant::now();

            let mut request = self.client.request(method.clone(), &url);
            if !query.is_empty() {
                request = request.query(query);
            }
            request = self.apply_auth(request);
            request = self.apply_headers(request, headers);
            request = Self::apply_body(request, body);

            debug!("Executing {} {}", method, url);

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let elapsed_ms = start.elapsed().as_millis() as u64;

                    let response_headers: HashMap<String, String> = response
                        .headers()
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                        .collect();

                    if self.should_retry(status, attempt) {
                        last_error = Some(BridgeError::HttpError {
                            status,
                            message: format!("Retryable status code: {}", status),
                        });
                        continue;
                    }

                    let body_text = response
                        .text()
                        .await
                        .map_err(|e| BridgeError::ServerError(e.to_string()))?;

                    let body: Value = if body_text.is_empty() {
                        Value::Null
                    } else {
                        serde_json::from_str(&body_text).unwrap_or(Value::String(body_text))
                    };

                    info!("{} {} -> {} ({}ms)", method, url, status, elapsed_ms);

                    return Ok(WebResponse {
                        status,
                        headers: response_headers,
                        body,
                        elapsed_ms,
                    });
                }
                Err(e) => {
                    warn!("Request failed: {}", e);
                    if e.is_timeout() {
                        last_error = Some(BridgeError::Timeout(format!("{} {}", method, url)));
                        continue;
                    }
                    last_error = Some(BridgeError::ServerError(e.to_string()));
                    if e.is_connect() {
                        continue;
                    }
                    return Err(BridgeError::ServerError(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| BridgeError::ServerError("Request failed".to_string())))
    }

    pub async fn get(&self, path: &str) -> Result<WebResponse, BridgeError> {
        self.execute_with_retry(reqwest::Method::GET, path, &RequestBody::None, None, &[])
            .await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<WebResponse, BridgeError> {
        self.execute_with_retry(reqwest::Method::GET, path, &RequestBody::None, None, query)
            .await
    }

    pub async fn post(&self, path: &str, body: RequestBody) -> Result<WebResponse, BridgeError> {
        self.execute_with_retry(reqwest::Method::POST, path, &body, None, &[])
            .await
    }

    pub async fn put(&self, path: &str, body: RequestBody) -> Result<WebResponse, BridgeError> {
        self.execute_with_retry(reqwest::Method::PUT, path, &body, None, &[])
            .await
    }

    pub async fn patch_with_query(
        &self,
        path: &str,
        body: RequestBody,
        query: &[(&str, String)],
    ) -> Result<WebResponse, BridgeError> {
        self.execute_with_retry(reqwest::Method::PATCH, path, &body, None, query)
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<WebResponse, BridgeError> {
        self.execute_with_retry(reqwest::Method::DELETE, path, &RequestBody::None, None, &[])
            .await
    }

    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: RequestBody,
        headers: Option<HashMap<String, String>>,
        query: &[(&str, String)],
    ) -> Result<WebResponse, BridgeError> {
        self.execute_with_retry(method, path, &body, headers.as_ref(), query)
            .await
    }
}

impl WebResponse {
    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Header lookup, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Deserialize the body into a typed value
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BridgeError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebRetryConfig;

    fn make_test_config() -> WebConfig {
        WebConfig::new("https://api.example.com")
    }

    fn response(status: u16) -> WebResponse {
        WebResponse {
            status,
            headers: HashMap::new(),
            body: Value::Null,
            elapsed_ms: 10,
        }
    }

    #[test]
    fn test_build_url() {
        let bridge = WebBridge::new(make_test_config()).unwrap();

        assert_eq!(bridge.build_url("/v2/pet"), "https://api.example.com/v2/pet");
        assert_eq!(bridge.build_url("v2/pet"), "https://api.example.com/v2/pet");
        assert_eq!(
            bridge.build_url("https://other.example.com/x"),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn test_build_url_with_trailing_slash() {
        let config = WebConfig::new("https://api.example.com/");
        let bridge = WebBridge::new(config).unwrap();

        assert_eq!(bridge.build_url("/users"), "https://api.example.com/users");
    }

    #[test]
    fn test_web_response_status_checks() {
        assert!(response(200).is_success());
        assert!(!response(200).is_client_error());
        assert!(response(404).is_client_error());
        assert!(!response(404).is_success());
        assert!(response(503).is_server_error());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut resp = response(200);
        resp.headers.insert(
            "Content-Type".to_string(),
            "application/json".to_string(),
        );
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("application/json"));
        assert!(resp.header("x-missing").is_none());
    }

    #[test]
    fn test_retry_only_on_listed_status_and_within_budget() {
        let mut config = make_test_config();
        config.retry = Some(WebRetryConfig {
            max_attempts: 3,
            initial_delay: 1000,
            max_delay: 10000,
            retry_on_status: vec![429, 500, 502, 503, 504],
        });
        let bridge = WebBridge::new(config).unwrap();

        assert!(bridge.should_retry(429, 0));
        assert!(bridge.should_retry(500, 1));
        assert!(!bridge.should_retry(500, 2));
        assert!(!bridge.should_retry(404, 0));
    }

    #[test]
    fn test_no_retry_without_config() {
        let bridge = WebBridge::new(make_test_config()).unwrap();
        assert!(!bridge.should_retry(503, 0));
    }

    #[test]
    fn test_retry_delay_exponential() {
        let mut config = make_test_config();
        config.retry = Some(WebRetryConfig {
            max_attempts: 5,
            initial_delay: 1000,
            max_delay: 10000,
            retry_on_status: vec![500],
        });
        let bridge = WebBridge::new(config).unwrap();

        assert_eq!(bridge.get_retry_delay(1), Duration::from_millis(1000));
        assert_eq!(bridge.get_retry_delay(2), Duration::from_millis(2000));
        assert_eq!(bridge.get_retry_delay(3), Duration::from_millis(4000));
        assert_eq!(bridge.get_retry_delay(5), Duration::from_millis(10000));
    }

    #[test]
    fn test_typed_body() {
        #[derive(Deserialize)]
        struct Item {
            id: u64,
        }
        let mut resp = response(200);
        resp.body = serde_json::json!({ "id": 42 });
        let item: Item = resp.json().unwrap();
        assert_eq!(item.id, 42);
    }
}
