//! Single-attempt forwarder for the quiz's LLM grading prompts.
//!
//! The browser cannot call the text-generation API directly (CORS), so it
//! posts `{apiKey, requestBody}` here and gets the upstream JSON back.
//! There is no retry: one upstream call per request.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::metrics;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("request body must not be empty")]
    EmptyBody,
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("missing API key")]
    MissingApiKey,
    #[error("missing request body")]
    MissingRequestBody,
    #[error("upstream API call failed: {status}")]
    Upstream { status: u16, details: String },
    #[error("upstream response has an unexpected format")]
    InvalidResponse(Value),
    #[error("cannot reach upstream API: {0}")]
    Unreachable(String),
    #[error("upstream API request timed out")]
    Timeout,
    #[error("proxy internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyRequest {
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
    #[serde(rename = "requestBody", default)]
    pub request_body: Option<Value>,
}

impl ProxyRequest {
    /// Parse and check the two required fields.
    pub fn parse(body: &[u8]) -> Result<(String, Value), ProxyError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ProxyError::EmptyBody);
        }
        let req: ProxyRequest =
            serde_json::from_slice(body).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;
        let api_key = match req.api_key {
            Some(k) if !k.trim().is_empty() => k,
            _ => return Err(ProxyError::MissingApiKey),
        };
        let request_body = match req.request_body {
            Some(Value::Null) | None => return Err(ProxyError::MissingRequestBody),
            Some(v) => v,
        };
        Ok((api_key, request_body))
    }
}

/// What `/api/apiconfig` advertises to the front-end.
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfigDescriptor {
    pub provider: String,
    pub url: String,
    pub model: String,
    pub key: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl ApiConfigDescriptor {
    pub fn new(url: &str, model: &str, key: &str) -> Self {
        Self {
            provider: "proxy".to_string(),
            url: url.to_string(),
            model: model.to_string(),
            key: key.to_string(),
            last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmForwarder {
    client: reqwest::Client,
    upstream_url: String,
}

impl LlmForwarder {
    pub fn new(upstream_url: impl Into<String>, timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Internal(e.to_string()))?;
        Ok(Self { client, upstream_url: upstream_url.into() })
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// One POST to the upstream. The response must carry a non-empty
    /// `output.text` to count as a success.
    pub async fn forward(&self, api_key: &str, request_body: &Value) -> Result<Value, ProxyError> {
        metrics::PROXY_FORWARDS_TOTAL.inc();
        let model = request_body.get("model").and_then(Value::as_str).unwrap_or("-");
        info!(%model, "forwarding prompt to LLM upstream");

        let result = self.send(api_key, request_body).await;
        if let Err(e) = &result {
            metrics::PROXY_ERRORS_TOTAL.inc();
            error!(error = %e, "LLM forward failed");
        }
        result
    }

    async fn send(&self, api_key: &str, request_body: &Value) -> Result<Value, ProxyError> {
        let resp = self
            .client
            .post(&self.upstream_url)
            .bearer_auth(api_key)
            .header("X-DashScope-SSE", "disable")
            .json(request_body)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            let details = resp.text().await.unwrap_or_default();
            return Err(ProxyError::Upstream { status: status.as_u16(), details });
        }

        let data: Value = resp.json().await.map_err(classify)?;
        let text_len = data
            .get("output")
            .and_then(|o| o.get("text"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(|t| t.chars().count());
        match text_len {
            Some(len) => {
                info!(len, "LLM forward succeeded");
                Ok(data)
            }
            None => Err(ProxyError::InvalidResponse(data)),
        }
    }
}

fn classify(e: reqwest::Error) -> ProxyError {
    if e.is_timeout() {
        ProxyError::Timeout
    } else if e.is_connect() {
        ProxyError::Unreachable(e.to_string())
    } else {
        ProxyError::Internal(e.to_string())
    }
}
