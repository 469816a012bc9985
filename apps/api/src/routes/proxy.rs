//! Helpers shared by the same-origin proxy routes.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::upstream::ProxiedResponse;

/// Re-emits an upstream response: same status, same content-type
/// (`application/json` when the upstream sent none), same body.
pub fn passthrough(upstream: ProxiedResponse) -> Response {
    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    (
        status,
        [(header::CONTENT_TYPE, content_type)],
        Body::from(upstream.body),
    )
        .into_response()
}

/// Decodes a JSON request body, mapping any failure to a 400 with a message.
pub fn read_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Corpo da requisição inválido: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_keeps_status_and_type() {
        let response = passthrough(ProxiedResponse {
            status: 404,
            content_type: Some("text/plain".to_string()),
            body: Bytes::from_static(b"nope"),
        });
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"nope");
    }

    #[test]
    fn test_passthrough_defaults_content_type() {
        let response = passthrough(ProxiedResponse {
            status: 201,
            content_type: None,
            body: Bytes::new(),
        });
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
