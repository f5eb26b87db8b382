//! HTTP transport with bounded retries and a uniform response shape.
//!
//! Ordinary HTTP error statuses never become Rust errors here: every call
//! resolves to an [`ApiResponse`] carrying the status and parsed body, and
//! only a network-level failure that survives all retry attempts is
//! reported, as `status == 0`. Retries apply identically to reads and
//! writes; keeping a retried write idempotent is the job of the operation
//! layer, not this one.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ConfigError, Result};

use super::paths;
use super::types::extract_list;

/// Status codes worth retrying: rate limiting and transient server errors.
pub const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Uniform result of one API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub payload: Value,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the request never got an HTTP response at all.
    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }

    /// The server's error message, or a generic status line if the body
    /// carries none.
    pub fn error_text(&self) -> String {
        self.payload
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }

    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Self {
            status: 0,
            payload: json!({ "error": detail.into() }),
        }
    }
}

/// Seam between the protocol layer and the wire. The production
/// implementation is [`HttpTransport`]; tests substitute an in-memory fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResponse;
}

/// Authenticated reqwest transport. Holds no state between calls beyond the
/// base address and the bearer credential.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api_url",
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResponse {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                let delay = BACKOFF_BASE * 2u32.pow(attempt - 2);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying");
                tokio::time::sleep(delay).await;
            }

            let mut request = self
                .http
                .request(method.clone(), &url)
                .header("Accept", "application/json");
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(%method, %url, attempt, "sending request");
            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if TRANSIENT_STATUSES.contains(&status) && attempt < MAX_ATTEMPTS {
                        warn!(status, attempt, "transient status, will retry");
                        last_error = format!("HTTP {status}");
                        continue;
                    }
                    let text = response.text().await.unwrap_or_default();
                    let payload = serde_json::from_str(&text)
                        .unwrap_or_else(|_| json!({ "raw_response": text }));
                    debug!(status, "response received");
                    return ApiResponse { status, payload };
                }
                Err(e) => {
                    warn!(error = %e, attempt, "request failed");
                    last_error = e.to_string();
                }
            }
        }

        warn!(%url, "request failed after {} attempts", MAX_ATTEMPTS);
        ApiResponse::transport_failure(last_error)
    }
}

/// Thin client over a [`Transport`].
pub struct ApiClient {
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            transport: Box::new(HttpTransport::new(base_url, token, timeout)?),
        })
    }

    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get(&self, path: &str) -> ApiResponse {
        self.transport.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResponse {
        self.transport.send(Method::POST, path, Some(body)).await
    }

    /// Liveness probe; no body either way.
    pub async fn health(&self) -> bool {
        self.get(paths::HEALTH).await.ok()
    }

    /// List entities at `path`, accepting bare and wrapped array shapes.
    /// `None` means the listing itself failed.
    pub async fn list(&self, path: &str, wrapper: &str) -> Option<Vec<Value>> {
        let response = self.get(path).await;
        if !response.ok() {
            return None;
        }
        Some(extract_list(&response.payload, wrapper))
    }
}
