//! HTTP Data Client
//!
//! reqwest-based client for the weather-station REST API.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use super::WeatherApi;
use crate::config::{BackendConfig, ConfigError};
use crate::model::{HistoryWindow, Reading, ValidationError};

/// Configuration for the data client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Resolved backend base URL, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Resolve the base URL from the backend section of the app config
    pub fn from_backend(backend: &BackendConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: backend.resolve_base_url()?,
            request_timeout: backend.request_timeout(),
        })
    }
}

/// Weather-station REST API client
pub struct DataClient {
    client: Client,
    config: ClientConfig,
}

impl DataClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self { client, config })
    }

    /// Backend base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Issue a cache-bypassing GET and decode the JSON body
    async fn get_json(&self, url: &str, failure: &'static str) -> ClientResult<Value> {
        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache, no-store")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Request {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                message: failure,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::Validation(ValidationError::from(e)))
    }
}

/// Message of an explicit `error` field, if the body carries one
fn backend_error(body: &Value) -> Option<String> {
    let error = body.as_object()?.get("error")?;
    Some(match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    })
}

#[async_trait]
impl WeatherApi for DataClient {
    async fn fetch_latest(&self) -> ClientResult<Reading> {
        let url = format!("{}/latest", self.config.base_url);
        let body = self.get_json(&url, "Failed to fetch latest reading").await?;

        if let Some(message) = backend_error(&body) {
            return Err(ClientError::Backend(message));
        }

        let reading = Reading::from_value(&body)?;
        tracing::debug!(ts = %reading.ts, "Fetched latest reading");
        Ok(reading)
    }

    async fn fetch_history(&self, hours: u32) -> ClientResult<HistoryWindow> {
        let url = format!("{}/history?hours={}", self.config.base_url, hours);
        let body = self.get_json(&url, "Failed to fetch history").await?;

        // History is not critical: shape problems degrade to an empty window
        if let Some(message) = backend_error(&body) {
            tracing::warn!(hours, error = %message, "Backend returned error for history");
            return Ok(HistoryWindow::empty(hours));
        }

        match HistoryWindow::from_body(hours, body) {
            Some(window) => {
                tracing::debug!(hours, count = window.readings.len(), "Fetched history");
                Ok(window)
            }
            None => {
                tracing::error!(hours, "Invalid history data structure");
                Ok(HistoryWindow::empty(hours))
            }
        }
    }
}
