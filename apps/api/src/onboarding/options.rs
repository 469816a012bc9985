//! Option Provider — choice lists for the onboarding selects.
//!
//! Each category starts from a static default list. A remote fetch may replace
//! it wholesale; any failure keeps the default. Callers never see an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::upstream::{ApiClient, UpstreamError};

/// A selectable `{value, label}` pair. Identity is `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingOption {
    pub value: String,
    pub label: String,
}

impl OnboardingOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionCategory {
    ExperienceLevels,
    Industries,
    WorkTypes,
    ContractTypes,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 4] = [
        OptionCategory::ExperienceLevels,
        OptionCategory::Industries,
        OptionCategory::WorkTypes,
        OptionCategory::ContractTypes,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::ExperienceLevels => "experience-levels",
            Self::Industries => "industries",
            Self::WorkTypes => "work-types",
            Self::ContractTypes => "contract-types",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }

    /// Upstream path, relative to the API base.
    pub fn endpoint(&self) -> String {
        format!("/onboarding/{}", self.slug())
    }

    pub fn defaults(&self) -> Vec<OnboardingOption> {
        let pairs: &[(&str, &str)] = match self {
            Self::ExperienceLevels => EXPERIENCE_LEVELS,
            Self::Industries => INDUSTRIES,
            Self::WorkTypes => WORK_TYPES,
            Self::ContractTypes => CONTRACT_TYPES,
        };
        pairs
            .iter()
            .map(|(value, label)| OnboardingOption::new(value, label))
            .collect()
    }
}

impl std::fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

const EXPERIENCE_LEVELS: &[(&str, &str)] = &[
    ("estagio", "Estágio"),
    ("junior", "1-3 anos"),
    ("pleno", "3-5 anos"),
    ("senior", "5+ anos"),
    ("especialista", "10-15 anos"),
    ("diretoria", "15+"),
];

const INDUSTRIES: &[(&str, &str)] = &[
    ("agronegocio", "Agronegócio"),
    ("alimentos-bebidas", "Alimentos e Bebidas"),
    ("biotecnologia", "Biotecnologia"),
    ("comercio-atacadista", "Comércio Atacadista"),
    ("comercio-varejista", "Comércio Varejista"),
    ("construcao-civil", "Construção Civil"),
    ("cosmeticos-higiene-pessoal", "Cosméticos e Higiene Pessoal"),
    ("desenvolvimento-software", "Desenvolvimento de Software"),
    ("educacao-ensino", "Educação e Ensino"),
    ("ecommerce-marketplaces", "E-commerce e Marketplaces"),
    ("energia", "Energia (elétrica, solar, eólica, petróleo e gás)"),
    ("engenharia-projetos-industriais", "Engenharia e Projetos Industriais"),
    ("financeiro-bancario", "Financeiro e Bancário"),
    ("imobiliario", "Imobiliário"),
    ("industria-automotiva", "Indústria Automotiva"),
    ("industria-farmaceutica", "Indústria Farmacêutica"),
    ("logistica-transporte", "Logística e Transporte"),
    ("meio-ambiente-sustentabilidade", "Meio Ambiente e Sustentabilidade"),
    ("mineracao", "Mineração"),
    ("moda-textil", "Moda e Têxtil"),
    ("papel-celulose", "Papel e Celulose"),
    ("quimica-petroquimica", "Química e Petroquímica"),
    ("saude-servicos-hospitalares", "Saúde e Serviços Hospitalares"),
    ("seguros-previdencia", "Seguros e Previdência"),
    ("siderurgia-metalurgia", "Siderurgia e Metalurgia"),
    ("tecnologia-informacao-ti", "Tecnologia da Informação (TI)"),
    ("telecomunicacoes", "Telecomunicações"),
];

const WORK_TYPES: &[(&str, &str)] = &[
    ("presencial", "Presencial"),
    ("remoto", "Remoto"),
    ("ambos", "Ambos"),
    ("hibrido", "Híbrido"),
];

const CONTRACT_TYPES: &[(&str, &str)] = &[
    ("clt", "CLT"),
    ("pj", "PJ"),
    ("estagio", "Estágio"),
    ("temporario", "Temporário"),
    ("freelancer", "Freelancer"),
];

/// Where remote option lists come from. `ApiClient` is the production source.
#[async_trait]
pub trait OptionSource: Send + Sync {
    async fn fetch(&self, category: OptionCategory) -> Result<Vec<OnboardingOption>, UpstreamError>;
}

#[async_trait]
impl OptionSource for ApiClient {
    async fn fetch(&self, category: OptionCategory) -> Result<Vec<OnboardingOption>, UpstreamError> {
        self.get_json(&category.endpoint()).await
    }
}

/// All four lists, as consumed by steps 2–4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    pub experience_levels: Vec<OnboardingOption>,
    pub industries: Vec<OnboardingOption>,
    pub work_types: Vec<OnboardingOption>,
    pub contract_types: Vec<OnboardingOption>,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            experience_levels: OptionCategory::ExperienceLevels.defaults(),
            industries: OptionCategory::Industries.defaults(),
            work_types: OptionCategory::WorkTypes.defaults(),
            contract_types: OptionCategory::ContractTypes.defaults(),
        }
    }
}

/// Resolves option lists, never failing. With no source configured every
/// category is served from its defaults.
#[derive(Clone)]
pub struct OptionProvider<S = ApiClient> {
    source: Option<S>,
}

impl<S: OptionSource> OptionProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
        }
    }

    pub fn defaults_only() -> Self {
        Self { source: None }
    }

    /// Remote list for `category`, or the static default on any failure.
    ///
    /// An empty remote list counts as a failure: a select with nothing in it
    /// would block the step.
    pub async fn options(&self, category: OptionCategory) -> Vec<OnboardingOption> {
        let Some(source) = &self.source else {
            return category.defaults();
        };

        match source.fetch(category).await {
            Ok(options) if !options.is_empty() => {
                debug!("Loaded {} remote options for {category}", options.len());
                options
            }
            Ok(_) => {
                warn!("Remote options for {category} were empty; using defaults");
                category.defaults()
            }
            Err(e) => {
                warn!("Failed to fetch options for {category}: {e}; using defaults");
                category.defaults()
            }
        }
    }

    /// Fetches every category concurrently.
    pub async fn load_all(&self) -> OptionSet {
        let (experience_levels, industries, work_types, contract_types) = tokio::join!(
            self.options(OptionCategory::ExperienceLevels),
            self.options(OptionCategory::Industries),
            self.options(OptionCategory::WorkTypes),
            self.options(OptionCategory::ContractTypes),
        );
        OptionSet {
            experience_levels,
            industries,
            work_types,
            contract_types,
        }
    }
}
