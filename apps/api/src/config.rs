use anyhow::{Context, Result};

/// Upstream REST API used when `API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

// Upstream paths, relative to `API_BASE_URL`.
pub const JOBS_PATH: &str = "/jobs";
pub const JOBS_LIST_QUERY: &str = "?limit=20";
pub const CANDIDATES_PATH: &str = "/candidates";
pub const ZIPS_PATH: &str = "/zips";
pub const APPLICATIONS_PATH: &str = "/applications";

// Same-origin proxy paths served by this service.
pub const CANDIDATES_PROXY_PATH: &str = "/api/candidates";
pub const ZIPS_PROXY_PATH: &str = "/api/zips";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Where this service's own proxy routes are reachable from clients.
    pub public_base_url: String,
    /// Sent as `cd_cnpj` with candidate submissions when set.
    pub company_cnpj: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            api_base_url: optional_env("API_BASE_URL")
                .and_then(|raw| sanitize_base_url(&raw))
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .and_then(|raw| sanitize_base_url(&raw))
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}")),
            company_cnpj: optional_env("COMPANY_CNPJ"),
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Drops any query string and trailing slashes; `None` when nothing is left.
pub fn sanitize_base_url(raw: &str) -> Option<String> {
    let without_query = raw.trim().split('?').next().unwrap_or_default();
    let trimmed = without_query.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
