//! Candidate record — per-step values, the accumulating wizard record, and
//! the explicit submission contract sent through the proxy.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::parse_currency_input;
use super::form::StepValues;
use super::validation::{
    consent_error, digits_only, document_error, email_error, full_name_error, mobile_error,
    required_error, zip_code_error, zip_error, Field, FieldErrors, ZIP_LENGTH,
};
use super::zip::ZipLookupResult;

const LGPD_MESSAGE: &str = "Aceite os termos da LGPD para continuar.";
const SHARING_MESSAGE: &str = "Confirme o compartilhamento de dados para continuar.";
const ADDRESS_MESSAGE: &str = "Endereço não encontrado para o CEP informado.";
const EXPERIENCE_MESSAGE: &str = "Selecione seu nível de experiência.";
const INDUSTRY_MESSAGE: &str = "Selecione a indústria em que atua.";
const SALARY_MESSAGE: &str = "Informe sua pretensão salarial.";
const ROLE_MESSAGE: &str = "Informe o cargo de interesse.";
const INDUSTRY_INTEREST_MESSAGE: &str = "Selecione a indústria de interesse.";
const DETAILED_ROLE_MESSAGE: &str = "Descreva o cargo desejado.";
const WORK_TYPE_MESSAGE: &str = "Selecione o tipo de trabalho.";
const CONTRACT_TYPE_MESSAGE: &str = "Selecione o tipo de contratação.";

// ────────────────────────────────────────────────────────────────────────────
// Step 1: personal data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalData {
    #[serde(rename = "nome")]
    pub full_name: String,
    /// CPF or RG, digits only.
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "localResidencia")]
    pub zip_code: String,
    /// Derived from the zip lookup summary; read-only for the user.
    #[serde(rename = "endereco")]
    pub address: String,
    /// Echoed when known; the proxy contract does not require it.
    #[serde(rename = "cidade", default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(rename = "estado", default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(rename = "contatoCel")]
    pub mobile: String,
    #[serde(rename = "contato")]
    pub email: String,
    #[serde(rename = "lgpdAccepted")]
    pub lgpd_accepted: bool,
}

impl PersonalData {
    /// Stores the digits of `raw` (at most eight) and drops derived address
    /// fields whenever the code is no longer complete.
    pub fn set_zip_code(&mut self, raw: &str) {
        self.zip_code = digits_only(raw).chars().take(ZIP_LENGTH).collect();
        if self.zip_code.len() < ZIP_LENGTH {
            self.clear_zip_derived();
        }
    }

    pub fn apply_zip(&mut self, result: &ZipLookupResult) {
        self.address = result.summary();
        self.city = result.city.clone().unwrap_or_default();
        self.state = result.state.clone().unwrap_or_default();
    }

    pub fn clear_zip_derived(&mut self) {
        self.address.clear();
        self.city.clear();
        self.state.clear();
    }
}

impl StepValues for PersonalData {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.set(Field::FullName, full_name_error(&self.full_name));
        errors.set(Field::Document, document_error(&self.document));
        errors.set(Field::ZipCode, zip_error(&self.zip_code, &self.city, &self.state));
        errors.set(Field::Address, required_error(&self.address, ADDRESS_MESSAGE));
        errors.set(Field::Mobile, mobile_error(&self.mobile));
        errors.set(Field::Email, email_error(&self.email));
        errors.set(Field::LgpdAccepted, consent_error(self.lgpd_accepted, LGPD_MESSAGE));
        errors
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Step 2: professional data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalData {
    #[serde(rename = "experiencia")]
    pub experience: String,
    #[serde(rename = "industria")]
    pub industry: String,
    /// Display value as typed, e.g. `5.000`.
    #[serde(rename = "salario")]
    pub salary: String,
    #[serde(rename = "cargoInteresse")]
    pub desired_role: String,
}

impl StepValues for ProfessionalData {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.set(Field::Experience, required_error(&self.experience, EXPERIENCE_MESSAGE));
        errors.set(Field::Industry, required_error(&self.industry, INDUSTRY_MESSAGE));
        errors.set(Field::Salary, required_error(&self.salary, SALARY_MESSAGE));
        errors.set(Field::DesiredRole, required_error(&self.desired_role, ROLE_MESSAGE));
        errors
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Final step: professional interests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalInterests {
    #[serde(rename = "industriaInteresse")]
    pub industry_of_interest: String,
    #[serde(rename = "cargoInteresseDetalhado")]
    pub detailed_role: String,
    #[serde(rename = "tipoTrabalho")]
    pub work_type: String,
    #[serde(rename = "tipoContratacao")]
    pub contract_type: String,
    #[serde(rename = "compartilhamentoAccepted")]
    pub sharing_accepted: bool,
}

impl StepValues for ProfessionalInterests {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.set(
            Field::IndustryOfInterest,
            required_error(&self.industry_of_interest, INDUSTRY_INTEREST_MESSAGE),
        );
        errors.set(Field::DetailedRole, required_error(&self.detailed_role, DETAILED_ROLE_MESSAGE));
        errors.set(Field::WorkType, required_error(&self.work_type, WORK_TYPE_MESSAGE));
        errors.set(Field::ContractType, required_error(&self.contract_type, CONTRACT_TYPE_MESSAGE));
        errors.set(
            Field::SharingAccepted,
            consent_error(self.sharing_accepted, SHARING_MESSAGE),
        );
        errors
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Accumulated record
// ────────────────────────────────────────────────────────────────────────────

/// Partial record held by the wizard. A step's slot is filled only once that
/// step's values validated; later steps never revisit earlier slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub personal: Option<PersonalData>,
    pub professional: Option<ProfessionalData>,
    pub interests: Option<ProfessionalInterests>,
}

fn step_errors<T: StepValues + Default>(step: Option<&T>) -> FieldErrors {
    match step {
        Some(values) => values.validate(),
        None => T::default().validate(),
    }
}

impl CandidateRecord {
    /// Whole-record check: every field of every step present and valid, both
    /// consent flags exactly `true`.
    pub fn completeness_errors(&self) -> FieldErrors {
        let mut errors = step_errors(self.personal.as_ref());
        errors.extend_failures(&step_errors(self.professional.as_ref()));
        errors.extend_failures(&step_errors(self.interests.as_ref()));
        errors
    }

    pub fn is_complete(&self) -> bool {
        self.completeness_errors().is_clean()
    }

    /// Assembles the submission document, or the failing fields.
    pub fn to_submission(&self) -> Result<CandidateSubmission, FieldErrors> {
        let errors = self.completeness_errors();
        match (&self.personal, &self.professional, &self.interests) {
            (Some(personal), Some(professional), Some(interests)) if errors.is_clean() => {
                Ok(CandidateSubmission {
                    personal: personal.clone(),
                    professional: ProfessionalPayload::from(professional),
                    interests: interests.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Submission contract
// ────────────────────────────────────────────────────────────────────────────

/// Professional data as sent upstream: salary is a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalPayload {
    #[serde(rename = "experiencia")]
    pub experience: String,
    #[serde(rename = "industria")]
    pub industry: String,
    #[serde(rename = "salario")]
    pub salary: f64,
    #[serde(rename = "cargoInteresse")]
    pub desired_role: String,
}

impl From<&ProfessionalData> for ProfessionalPayload {
    fn from(data: &ProfessionalData) -> Self {
        Self {
            experience: data.experience.clone(),
            industry: data.industry.clone(),
            salary: parse_currency_input(&data.salary),
            desired_role: data.desired_role.clone(),
        }
    }
}

/// The final, flat candidate document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    #[serde(flatten)]
    pub personal: PersonalData,
    #[serde(flatten)]
    pub professional: ProfessionalPayload,
    #[serde(flatten)]
    pub interests: ProfessionalInterests,
}

impl CandidateSubmission {
    /// Same rules the wizard applies, re-run at the proxy boundary. City and
    /// state are optional on the wire, so the zip code is checked on its own.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = self.personal.validate();
        errors.set(Field::ZipCode, zip_code_error(&self.personal.zip_code));
        errors.extend_failures(&self.interests.validate());
        errors.set(
            Field::Experience,
            required_error(&self.professional.experience, EXPERIENCE_MESSAGE),
        );
        errors.set(
            Field::Industry,
            required_error(&self.professional.industry, INDUSTRY_MESSAGE),
        );
        errors.set(
            Field::DesiredRole,
            required_error(&self.professional.desired_role, ROLE_MESSAGE),
        );
        if !self.professional.salary.is_finite() || self.professional.salary < 0.0 {
            errors.set(Field::Salary, SALARY_MESSAGE);
        }
        errors
    }
}

/// What the proxy receives: the submission plus synthetic identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(flatten)]
    pub candidate: CandidateSubmission,
    pub guid_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd_cnpj: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_complete_steps_report_complete() {
        assert!(personal().is_complete());
        assert!(professional().is_complete());
        assert!(interests().is_complete());
    }

    #[test]
    fn test_removing_any_personal_field_flips_incomplete() {
        let clears: [fn(&mut PersonalData); 9] = [
            |p: &mut PersonalData| p.full_name.clear(),
            |p: &mut PersonalData| p.document.clear(),
            |p: &mut PersonalData| p.zip_code.clear(),
            |p: &mut PersonalData| p.address.clear(),
            |p: &mut PersonalData| p.city.clear(),
            |p: &mut PersonalData| p.state.clear(),
            |p: &mut PersonalData| p.mobile.clear(),
            |p: &mut PersonalData| p.email.clear(),
            |p: &mut PersonalData| p.lgpd_accepted = false,
        ];
        for clear in clears {
            let mut data = personal();
            clear(&mut data);
            assert!(!data.is_complete(), "{data:?} should be incomplete");
        }
    }

    #[test]
    fn test_removing_any_professional_or_interest_field_flips_incomplete() {
        let professional_clears: [fn(&mut ProfessionalData); 4] = [
            |p: &mut ProfessionalData| p.experience.clear(),
            |p: &mut ProfessionalData| p.industry.clear(),
            |p: &mut ProfessionalData| p.salary.clear(),
            |p: &mut ProfessionalData| p.desired_role.clear(),
        ];
        for clear in professional_clears {
            let mut data = professional();
            clear(&mut data);
            assert!(!data.is_complete());
        }

        let interest_clears: [fn(&mut ProfessionalInterests); 5] = [
            |i: &mut ProfessionalInterests| i.industry_of_interest.clear(),
            |i: &mut ProfessionalInterests| i.detailed_role.clear(),
            |i: &mut ProfessionalInterests| i.work_type.clear(),
            |i: &mut ProfessionalInterests| i.contract_type.clear(),
            |i: &mut ProfessionalInterests| i.sharing_accepted = false,
        ];
        for clear in interest_clears {
            let mut data = interests();
            clear(&mut data);
            assert!(!data.is_complete());
        }
    }

    #[test]
    fn test_set_zip_code_clears_derived_fields_when_incomplete() {
        let mut data = personal();
        data.set_zip_code("01001-00");
        assert_eq!(data.zip_code, "0100100");
        assert!(data.address.is_empty());
        assert!(data.city.is_empty());
        assert!(data.state.is_empty());

        data.set_zip_code("01310-100 extra 9");
        assert_eq!(data.zip_code, "01310100");
    }

    #[test]
    fn test_missing_step_reports_its_fields() {
        let record = CandidateRecord {
            personal: Some(personal()),
            professional: None,
            interests: Some(interests()),
        };
        let errors = record.to_submission().unwrap_err();
        assert_eq!(errors.get(Field::Experience), EXPERIENCE_MESSAGE);
        assert_eq!(errors.get(Field::FullName), "");
    }

    #[test]
    fn test_submission_serializes_flat_wire_keys() {
        let submission = complete_record().to_submission().unwrap();
        let json = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["nome"], "Maria Souza");
        assert_eq!(json["localResidencia"], "01001000");
        assert_eq!(json["salario"], 8500.0);
        assert_eq!(json["tipoContratacao"], "clt");
        assert_eq!(json["lgpdAccepted"], true);
        assert_eq!(json["compartilhamentoAccepted"], true);
        assert!(submission.field_errors().is_clean());
    }

    #[test]
    fn test_profile_round_trips_through_proxy_contract() {
        let profile = CandidateProfile {
            candidate: complete_record().to_submission().unwrap(),
            guid_id: Uuid::new_v4(),
            cd_cnpj: None,
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("cd_cnpj"));

        let parsed: CandidateProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn test_submission_without_city_and_state_is_valid() {
        let json = serde_json::json!({
            "nome": "Maria Souza",
            "documento": "52998224725",
            "localResidencia": "01001000",
            "endereco": "Praça da Sé - Sé - São Paulo/SP",
            "contatoCel": "11988887777",
            "contato": "maria@souza.dev",
            "lgpdAccepted": true,
            "experiencia": "pleno",
            "industria": "desenvolvimento-software",
            "salario": 8500.0,
            "cargoInteresse": "Desenvolvedora Back-end",
            "industriaInteresse": "financeiro-bancario",
            "cargoInteresseDetalhado": "Engenheira de Software",
            "tipoTrabalho": "remoto",
            "tipoContratacao": "clt",
            "compartilhamentoAccepted": true
        });
        let submission: CandidateSubmission = serde_json::from_value(json).unwrap();
        assert!(submission.personal.city.is_empty());
        assert!(submission.field_errors().is_clean());

        let mut short_zip = submission.clone();
        short_zip.personal.zip_code = "0100100".to_string();
        assert_eq!(
            short_zip.field_errors().get(Field::ZipCode),
            "Informe os 8 dígitos do CEP."
        );

        let echoed = serde_json::to_value(&submission).unwrap();
        assert!(echoed.get("cidade").is_none());
    }
}
