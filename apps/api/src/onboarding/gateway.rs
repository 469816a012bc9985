//! Submission Gateway — one POST of the finished record to the candidates proxy.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::record::{CandidateProfile, CandidateSubmission};
use crate::config::{Config, CANDIDATES_PROXY_PATH};
use crate::upstream::{ApiClient, UpstreamError};

pub const SUBMISSION_FALLBACK: &str = "Não foi possível concluir seu cadastro. Tente novamente.";

/// A failed submission, already reduced to a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<UpstreamError> for SubmissionError {
    fn from(e: UpstreamError) -> Self {
        warn!("Candidate submission failed: {e}");
        Self::new(e.user_message(SUBMISSION_FALLBACK))
    }
}

#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, candidate: &CandidateSubmission) -> Result<(), SubmissionError>;
}

/// Posts to `{PUBLIC_BASE_URL}/api/candidates`. No retry.
#[derive(Clone)]
pub struct HttpSubmissionGateway {
    api: ApiClient,
    company_cnpj: Option<String>,
}

impl HttpSubmissionGateway {
    pub fn new(api: ApiClient, company_cnpj: Option<String>) -> Self {
        Self { api, company_cnpj }
    }

    /// Bound to `PUBLIC_BASE_URL`, stamping every profile with `COMPANY_CNPJ`.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Ok(Self::new(
            ApiClient::new(&config.public_base_url)?,
            config.company_cnpj.clone(),
        ))
    }

    /// Wraps the submission with a fresh correlation id.
    pub fn envelope(&self, candidate: &CandidateSubmission) -> CandidateProfile {
        CandidateProfile {
            candidate: candidate.clone(),
            guid_id: Uuid::new_v4(),
            cd_cnpj: self.company_cnpj.clone(),
        }
    }
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, candidate: &CandidateSubmission) -> Result<(), SubmissionError> {
        let profile = self.envelope(candidate);
        self.api.post_json(CANDIDATES_PROXY_PATH, &profile).await?;
        info!("Candidate submitted (guid_id={})", profile.guid_id);
        Ok(())
    }
}
