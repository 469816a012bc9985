use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
    Json,
};
use tracing::{info, warn};

use super::options::{OnboardingOption, OptionCategory, OptionSet};
use super::record::CandidateProfile;
use super::validation::{digits_only, ZIP_LENGTH};
use crate::config::{CANDIDATES_PATH, ZIPS_PATH};
use crate::errors::AppError;
use crate::routes::proxy::{passthrough, read_json};
use crate::state::AppState;

pub const INVALID_ZIP_MESSAGE: &str = "CEP inválido. Informe os 8 dígitos do CEP.";
const ZIP_UNAVAILABLE_MESSAGE: &str = "Não foi possível consultar o CEP no momento.";
const CANDIDATE_UNAVAILABLE_MESSAGE: &str = "Não foi possível enviar o cadastro no momento.";

/// GET /api/onboarding
pub async fn handle_get_all_options(State(state): State<AppState>) -> Json<OptionSet> {
    Json(state.options.load_all().await)
}

/// GET /api/onboarding/:category
pub async fn handle_get_options(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<OnboardingOption>>, AppError> {
    let category = OptionCategory::from_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown option category: {slug}")))?;
    Ok(Json(state.options.options(category).await))
}

/// POST /api/candidates
///
/// The body is decoded against the candidate contract and re-validated before
/// anything is forwarded; the upstream answer is passed through unchanged.
pub async fn handle_submit_candidate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let mut profile: CandidateProfile = read_json(&body)?;

    let errors = profile.candidate.field_errors();
    if !errors.is_clean() {
        return Err(AppError::UnprocessableEntity(errors.summary()));
    }
    if profile.cd_cnpj.is_none() {
        profile.cd_cnpj = state.config.company_cnpj.clone();
    }

    let encoded = serde_json::to_vec(&profile).map_err(|e| AppError::Internal(e.into()))?;
    let upstream = state
        .upstream
        .post_json_raw(CANDIDATES_PATH, encoded.into())
        .await
        .map_err(|source| AppError::Upstream {
            message: CANDIDATE_UNAVAILABLE_MESSAGE,
            source,
        })?;

    if upstream.is_success() {
        info!("Candidate forwarded (guid_id={})", profile.guid_id);
    } else {
        warn!(
            "Upstream rejected candidate {} with status {}",
            profile.guid_id, upstream.status
        );
    }
    Ok(passthrough(upstream))
}

/// GET /api/zips/:zip
pub async fn handle_zip_lookup(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Response, AppError> {
    let code = digits_only(&raw);
    if code.len() != ZIP_LENGTH {
        return Err(AppError::Validation(INVALID_ZIP_MESSAGE.to_string()));
    }

    let upstream = state
        .upstream
        .get_raw(&format!("{ZIPS_PATH}/{code}"))
        .await
        .map_err(|source| AppError::Upstream {
            message: ZIP_UNAVAILABLE_MESSAGE,
            source,
        })?;
    Ok(passthrough(upstream))
}
