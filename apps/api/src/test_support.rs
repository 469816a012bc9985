//! Shared fixtures for router-level tests: a throwaway upstream server and a
//! state pointed at it.

use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

/// Serves `app` on an ephemeral port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL whose port refuses connections.
pub async fn dead_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn config(api_base_url: &str) -> Config {
    Config {
        api_base_url: api_base_url.to_string(),
        public_base_url: "http://127.0.0.1:8080".to_string(),
        company_cnpj: Some("12345678000190".to_string()),
        port: 8080,
        rust_log: "info".to_string(),
    }
}

/// The full router, forwarding to `api_base_url`.
pub fn app(api_base_url: &str) -> Router {
    build_router(AppState::new(config(api_base_url)).unwrap())
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
