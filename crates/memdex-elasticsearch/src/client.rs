//! Elasticsearch REST client wrapper

use std::time::Duration;

use memdex::MemoryError;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::ElasticsearchConfig;

/// Thin REST client over `reqwest`, cheap to clone and safe to share
#[derive(Clone)]
pub struct ElasticsearchClient {
    http: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

/// Status and decoded body of an engine response
#[derive(Debug, Clone)]
pub struct EngineResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl EngineResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `error.type` reported by the engine
    pub fn error_type(&self) -> Option<&str> {
        self.body.pointer("/error/type").and_then(Value::as_str)
    }

    pub fn is_index_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
            && self.error_type() == Some("index_not_found_exception")
    }

    /// Human readable diagnostic for a failed response
    pub fn error_reason(&self) -> String {
        match (
            self.error_type(),
            self.body.pointer("/error/reason").and_then(Value::as_str),
        ) {
            (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
            (Some(kind), None) => kind.to_string(),
            (None, Some(reason)) => reason.to_string(),
            (None, None) if self.body.is_null() => format!("HTTP {}", self.status),
            (None, None) => format!("HTTP {}: {}", self.status, self.body),
        }
    }
}

impl ElasticsearchClient {
    /// Build a client for the configured cluster
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, MemoryError> {
        let base_url = Url::parse(&config.server_address).map_err(|e| {
            MemoryError::invalid_argument(format!(
                "Invalid server address {}: {e}",
                config.server_address
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MemoryError::invalid_argument(format!(
                "Invalid server address {}",
                config.server_address
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| MemoryError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            username: config.username.clone().filter(|u| !u.is_empty()),
            password: config.password.clone(),
        })
    }

    /// URL for the given path segments, each percent-encoded on its own
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request with authentication applied
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let request = self.http.request(method, self.url(segments));
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }

    /// Send a request and decode the body as JSON (`Null` when empty)
    pub async fn send(&self, request: RequestBuilder) -> Result<EngineResponse, MemoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        debug!(status = %status, "Elasticsearch response");

        Ok(EngineResponse { status, body })
    }

    pub async fn head(&self, segments: &[&str]) -> Result<EngineResponse, MemoryError> {
        self.send(self.request(Method::HEAD, segments)).await
    }

    pub async fn get(&self, segments: &[&str]) -> Result<EngineResponse, MemoryError> {
        self.send(self.request(Method::GET, segments)).await
    }

    pub async fn delete(&self, segments: &[&str]) -> Result<EngineResponse, MemoryError> {
        self.send(self.request(Method::DELETE, segments)).await
    }

    pub async fn put_json(&self, segments: &[&str], body: &Value) -> Result<EngineResponse, MemoryError> {
        self.send(self.request(Method::PUT, segments).json(body)).await
    }

    pub async fn post_json(&self, segments: &[&str], body: &Value) -> Result<EngineResponse, MemoryError> {
        self.send(self.request(Method::POST, segments).json(body)).await
    }

    pub async fn post_empty(&self, segments: &[&str]) -> Result<EngineResponse, MemoryError> {
        self.send(self.request(Method::POST, segments)).await
    }

    /// POST a newline-delimited JSON body (bulk API)
    pub async fn post_ndjson(&self, segments: &[&str], body: String) -> Result<EngineResponse, MemoryError> {
        self.send(
            self.request(Method::POST, segments)
                .header("Content-Type", "application/x-ndjson")
                .body(body),
        )
        .await
    }
}
