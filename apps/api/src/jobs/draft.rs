//! Job creation: the company form's string state normalized into the
//! upstream job document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::onboarding::currency::parse_currency_input;

/// Raw form state as the company's "create job" page submits it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobDraft {
    pub client_id: String,
    pub titulo: String,
    pub descricao: String,
    pub nivel: String,
    pub localizacao: String,
    /// `YYYY-MM-DD`; today when blank.
    pub publicada_em: String,
    pub status: String,
    /// Comma- or newline-separated.
    pub skills: String,
    pub valor_inicial: String,
    pub valor_final: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub valor_inicial: f64,
    pub valor_final: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub client_id: String,
    pub titulo: String,
    pub descricao: String,
    pub nivel: String,
    pub localizacao: String,
    pub publicada_em: NaiveDate,
    pub status: String,
    pub skills: Vec<String>,
    pub orcamento: Budget,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobDraftError {
    #[error("Preencha os campos obrigatórios: {}.", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Data de publicação inválida: {0}.")]
    InvalidDate(String),
}

pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl JobDraft {
    pub fn into_payload(self, today: NaiveDate) -> Result<JobPayload, JobDraftError> {
        let missing: Vec<&'static str> = [
            ("client_id", &self.client_id),
            ("titulo", &self.titulo),
            ("descricao", &self.descricao),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(JobDraftError::MissingFields(missing));
        }

        let published = self.publicada_em.trim();
        let publicada_em = if published.is_empty() {
            today
        } else {
            NaiveDate::parse_from_str(published, "%Y-%m-%d")
                .map_err(|_| JobDraftError::InvalidDate(published.to_string()))?
        };

        Ok(JobPayload {
            client_id: self.client_id.trim().to_string(),
            titulo: self.titulo.trim().to_string(),
            descricao: self.descricao.trim().to_string(),
            nivel: self.nivel.trim().to_string(),
            localizacao: self.localizacao.trim().to_string(),
            publicada_em,
            status: self.status.trim().to_string(),
            skills: parse_skills(&self.skills),
            orcamento: Budget {
                valor_inicial: parse_currency_input(&self.valor_inicial),
                valor_final: parse_currency_input(&self.valor_final),
            },
        })
    }
}
