use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobboard_api::config::Config;
use jobboard_api::routes::build_router;
use jobboard_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "jobboard_api={level},tower_http={level}",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));
    info!("Forwarding to upstream API at {}", config.api_base_url);
    if config.company_cnpj.is_none() {
        info!("COMPANY_CNPJ not set; candidate profiles are forwarded without cd_cnpj");
    }

    let state = AppState::new(config.clone())?;

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
