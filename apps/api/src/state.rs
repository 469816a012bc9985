use anyhow::{Context, Result};

use crate::config::Config;
use crate::onboarding::OptionProvider;
use crate::upstream::ApiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Client bound to `API_BASE_URL`; every proxy route forwards through it.
    pub upstream: ApiClient,
    pub options: OptionProvider,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let upstream =
            ApiClient::new(&config.api_base_url).context("Failed to build upstream HTTP client")?;
        Ok(Self {
            options: OptionProvider::new(upstream.clone()),
            upstream,
            config,
        })
    }
}
