use axum::{body::Bytes, extract::State, response::Response, Json};
use chrono::Local;
use tracing::info;

use super::draft::JobDraft;
use super::listings::{JobOpening, FEATURED_OPENINGS};
use super::pipeline::{group_into_board, CompanyApplication, PipelineBoard};
use crate::config::{APPLICATIONS_PATH, JOBS_LIST_QUERY, JOBS_PATH};
use crate::errors::AppError;
use crate::routes::proxy::{passthrough, read_json};
use crate::state::AppState;

const CREATE_JOB_UNAVAILABLE_MESSAGE: &str = "Não foi possível criar a vaga no momento.";
const LIST_JOBS_UNAVAILABLE_MESSAGE: &str = "Não foi possível carregar as vagas no momento.";
const APPLICATIONS_UNAVAILABLE_MESSAGE: &str =
    "Não foi possível carregar as candidaturas no momento.";

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let draft: JobDraft = read_json(&body)?;
    let payload = draft
        .into_payload(Local::now().date_naive())
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let encoded = serde_json::to_vec(&payload).map_err(|e| AppError::Internal(e.into()))?;
    let upstream = state
        .upstream
        .post_json_raw(JOBS_PATH, encoded.into())
        .await
        .map_err(|source| AppError::Upstream {
            message: CREATE_JOB_UNAVAILABLE_MESSAGE,
            source,
        })?;

    info!(
        "Job '{}' forwarded for client {} (status {})",
        payload.titulo, payload.client_id, upstream.status
    );
    Ok(passthrough(upstream))
}

/// GET /api/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Response, AppError> {
    let upstream = state
        .upstream
        .get_raw(&format!("{JOBS_PATH}{JOBS_LIST_QUERY}"))
        .await
        .map_err(|source| AppError::Upstream {
            message: LIST_JOBS_UNAVAILABLE_MESSAGE,
            source,
        })?;
    Ok(passthrough(upstream))
}

/// GET /api/jobs/featured
pub async fn handle_featured_jobs() -> Json<&'static [JobOpening]> {
    Json(FEATURED_OPENINGS.as_slice())
}

/// GET /api/company/applications
pub async fn handle_company_applications(
    State(state): State<AppState>,
) -> Result<Json<PipelineBoard>, AppError> {
    let applications: Vec<CompanyApplication> = state
        .upstream
        .get_json(APPLICATIONS_PATH)
        .await
        .map_err(|source| AppError::Upstream {
            message: APPLICATIONS_UNAVAILABLE_MESSAGE,
            source,
        })?;
    Ok(Json(group_into_board(applications)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app, body_json, dead_base, get, post_json, send, serve};

    use axum::{
        extract::RawQuery,
        http::StatusCode,
        routing::{get as get_route, post},
        Router,
    };
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_create_job_normalizes_before_forwarding() {
        let upstream = Router::new().route(
            "/jobs",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["titulo"], "Analista de Dados");
                assert_eq!(body["skills"], json!(["SQL", "Python"]));
                assert_eq!(body["orcamento"]["valor_inicial"], 6000.0);
                assert!(body["publicada_em"].is_string());
                (StatusCode::CREATED, Json(json!({ "id": "job_1" })))
            }),
        );
        let base = serve(upstream).await;

        let draft = json!({
            "client_id": "cliente_123",
            "titulo": "  Analista de Dados ",
            "descricao": "Dashboards e indicadores",
            "skills": "SQL,\nPython",
            "valor_inicial": "6.000",
            "valor_final": "9.000"
        });
        let response = send(app(&base), post_json("/api/jobs", &draft)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], "job_1");
    }

    #[tokio::test]
    async fn test_create_job_requires_title() {
        let draft = json!({ "client_id": "c", "descricao": "d" });
        let response = send(app(&dead_base().await), post_json("/api/jobs", &draft)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("titulo"));
    }

    #[tokio::test]
    async fn test_create_job_transport_failure_message() {
        let draft = json!({ "client_id": "c", "titulo": "t", "descricao": "d" });
        let response = send(app(&dead_base().await), post_json("/api/jobs", &draft)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], CREATE_JOB_UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_list_jobs_forwards_limit() {
        let upstream = Router::new().route(
            "/jobs",
            get_route(|RawQuery(query): RawQuery| async move {
                Json(json!({ "query": query }))
            }),
        );
        let base = serve(upstream).await;

        let response = send(app(&base), get("/api/jobs")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["query"], "limit=20");
    }

    #[tokio::test]
    async fn test_featured_jobs_are_static() {
        let response = send(app(&dead_base().await), get("/api/jobs/featured")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), FEATURED_OPENINGS.len());
        assert_eq!(body[0]["id"], "product-manager");
    }

    #[tokio::test]
    async fn test_company_applications_grouped() {
        let upstream = Router::new().route(
            "/applications",
            get_route(|| async {
                Json(json!([
                    { "id": "1", "status": "novos", "candidato": "Ana", "vaga": "UX" },
                    { "id": "2", "status": "proposta", "candidato": "Bruno", "vaga": "PM" },
                    { "id": "3", "status": "arquivado", "candidato": "Caio", "vaga": "PM" }
                ]))
            }),
        );
        let base = serve(upstream).await;

        let response = send(app(&base), get("/api/company/applications")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["columns"][0]["id"], "novos");
        assert_eq!(body["columns"][0]["candidaturas"][0]["candidato"], "Ana");
        assert_eq!(body["columns"][3]["candidaturas"][0]["id"], "2");
        assert_eq!(body["unassigned"][0]["id"], "3");
    }
}
