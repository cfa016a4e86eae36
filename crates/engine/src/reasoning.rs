//! Client for the external natural-language reasoning service.
//!
//! The service accepts a text prompt plus an opaque session identifier and
//! returns free text under one of several response fields. A lightweight
//! `/health` endpoint reports liveness and an identifying model label.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use freightwise_core::config::ReasoningConfig;

/// Liveness report from the reasoning service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub model: Option<String>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Pluggable reasoning backend. The engine treats any error from this trait
/// as a signal to take the deterministic fallback path.
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Submit an analysis prompt and return the free-text response.
    async fn analyze(&self, prompt: &str, session_id: &str) -> Result<String>;

    async fn health(&self) -> Result<ServiceHealth>;
}

/// HTTP implementation against the configured reasoning service.
pub struct HttpReasoningClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpReasoningClient {
    pub fn new(config: &ReasoningConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building reasoning http client")?;

        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl ReasoningClient for HttpReasoningClient {
    async fn analyze(&self, prompt: &str, session_id: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/analyze", self.base_url))
            .json(&json!({ "prompt": prompt, "session_id": session_id }))
            .send()
            .await
            .context("reasoning service request failed")?
            .error_for_status()
            .context("reasoning service returned an error status")?;

        let body: serde_json::Value =
            response.json().await.context("reasoning service returned a non-JSON body")?;

        extract_response_text(&body)
            .ok_or_else(|| anyhow!("reasoning response carried no recognizable text field"))
    }

    async fn health(&self) -> Result<ServiceHealth> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .context("reasoning health check failed")?
            .error_for_status()
            .context("reasoning health check returned an error status")?;

        response.json::<ServiceHealth>().await.context("reasoning health body was not JSON")
    }
}

/// The response text lives under `analysis`, `message`, or `response`,
/// whichever is present first.
fn extract_response_text(body: &serde_json::Value) -> Option<String> {
    ["analysis", "message", "response"]
        .iter()
        .find_map(|field| body.get(*field).and_then(|value| value.as_str()))
        .map(|text| text.to_string())
}
