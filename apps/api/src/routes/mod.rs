pub mod health;
pub mod proxy;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::jobs::handlers as jobs;
use crate::onboarding::handlers as onboarding;
use crate::state::AppState;

/// Every route answers cross-origin requests; preflights never reach a handler.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Company
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/jobs/featured", get(jobs::handle_featured_jobs))
        .route(
            "/api/company/applications",
            get(jobs::handle_company_applications),
        )
        // Candidate onboarding
        .route("/api/candidates", post(onboarding::handle_submit_candidate))
        .route("/api/zips/:zip", get(onboarding::handle_zip_lookup))
        .route("/api/onboarding", get(onboarding::handle_get_all_options))
        .route(
            "/api/onboarding/:category",
            get(onboarding::handle_get_options),
        )
        .layer(cors_layer())
        .with_state(state)
}
