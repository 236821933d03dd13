// src/infrastructure/tana_api.rs
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tokio::time::Duration;
use tracing::{debug, info, instrument};

use super::config::ApiConfig;
use super::rate_limiter::RateLimiter;
use crate::application::PayloadSender;
use crate::domain::TransportError;
use crate::ports::Payload;

/// HTTPS client for the Tana Input API with bearer auth and a per-instance rate limit.
#[derive(Debug)]
pub struct TanaApiClient {
    http: Client,
    endpoint: Url,
    token: Option<String>,
    limiter: RateLimiter,
}

impl TanaApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            TransportError::Request(format!("invalid endpoint '{}': {e}", config.endpoint))
        })?;
        let limiter = RateLimiter::new(config.rate_limit)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        debug!(%endpoint, rate_limit = config.rate_limit, timeout = config.timeout, "Creating TanaApiClient");
        Ok(Self {
            http,
            endpoint,
            token: config.token.clone().filter(|t| !t.is_empty()),
            limiter,
        })
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

impl PayloadSender for TanaApiClient {
    #[instrument(level = "debug", skip(self, payload), fields(target_node = %payload.target_node_id, nodes = payload.nodes.len()))]
    async fn make_request(&mut self, payload: &Payload) -> Result<Value, TransportError> {
        let token = self.token.as_deref().ok_or(TransportError::AuthConfig)?;

        self.limiter.wait().await;

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::ApiStatus {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body = response.text().await.map_err(classify)?;

        info!(status = status.as_u16(), "Tana API call succeeded");
        Ok(parse_body(&body))
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::Request(error.to_string())
    } else if error.is_timeout() || error.is_connect() || error.is_request() {
        TransportError::Network(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

/// Server-provided `message` if the body carries one, else the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown status").to_string())
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
