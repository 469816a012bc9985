//! Upstream client — every outbound HTTP call to the job-board REST API (and
//! to this service's own proxy surface) goes through `ApiClient`.
//!
//! No retries and no explicit timeouts: the transport defaults apply.
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Keys searched, in order, for a human-readable message in an error body.
pub const ERROR_MESSAGE_KEYS: &[&str] = &["message", "error", "detail"];

/// Fallback shown when neither the JSON body nor the raw text carries a message.
pub const GENERIC_ERROR_MESSAGE: &str = "Não foi possível concluir a solicitação. Tente novamente.";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Message suitable for showing to a user.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            UpstreamError::Status { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// An upstream response captured verbatim so a proxy route can pass it through.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ProxiedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    async fn capture(response: Response) -> Result<Self, UpstreamError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }
}

/// Thin wrapper over `reqwest::Client` bound to one base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL, inserting the separating slash if missing.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET that returns whatever the upstream answered, success or not.
    pub async fn get_raw(&self, path: &str) -> Result<ProxiedResponse, UpstreamError> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        ProxiedResponse::capture(response).await
    }

    /// POST of an already-encoded JSON body, returned verbatim.
    pub async fn post_json_raw(
        &self,
        path: &str,
        body: Bytes,
    ) -> Result<ProxiedResponse, UpstreamError> {
        let url = self.url(path);
        debug!("POST {url} ({} bytes)", body.len());
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        ProxiedResponse::capture(response).await
    }

    /// GET and decode a JSON body. Non-2xx becomes `UpstreamError::Status`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let response = self.get_raw(path).await?.error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// POST a serializable body. Non-2xx becomes `UpstreamError::Status`.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ProxiedResponse, UpstreamError> {
        let encoded = Bytes::from(serde_json::to_vec(body)?);
        self.post_json_raw(path, encoded).await?.error_for_status()
    }
}

impl ProxiedResponse {
    fn error_for_status(self) -> Result<Self, UpstreamError> {
        if self.is_success() {
            return Ok(self);
        }
        let text = String::from_utf8_lossy(&self.body);
        Err(UpstreamError::Status {
            status: self.status,
            message: error_message_from_body(&text, ERROR_MESSAGE_KEYS, GENERIC_ERROR_MESSAGE),
        })
    }
}

/// Pulls a user-facing message out of an error body.
///
/// Order: first non-empty string under one of `keys` in a JSON object body,
/// then the raw text when the body is not JSON, then `fallback`.
pub fn error_message_from_body(body: &str, keys: &[&str], fallback: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => keys
            .iter()
            .find_map(|key| {
                map.get(*key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or(fallback)
            .to_string(),
        Ok(_) => fallback.to_string(),
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}
