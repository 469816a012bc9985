//! Step validators — pure functions from field values to error messages.
//!
//! Every validator returns an empty string when the value is acceptable, so a
//! `FieldErrors` set can be recomputed wholesale on each edit.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

pub const CPF_LENGTH: usize = 11;
pub const RG_MIN_LENGTH: usize = 7;
pub const RG_MAX_LENGTH: usize = 10;
pub const ZIP_LENGTH: usize = 8;
pub const MOBILE_MIN_LENGTH: usize = 10;
pub const MOBILE_MAX_LENGTH: usize = 11;

/// Every field the onboarding wizard collects. Serializes to its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Field {
    #[serde(rename = "nome")]
    FullName,
    #[serde(rename = "documento")]
    Document,
    #[serde(rename = "localResidencia")]
    ZipCode,
    #[serde(rename = "endereco")]
    Address,
    #[serde(rename = "contatoCel")]
    Mobile,
    #[serde(rename = "contato")]
    Email,
    #[serde(rename = "lgpdAccepted")]
    LgpdAccepted,
    #[serde(rename = "experiencia")]
    Experience,
    #[serde(rename = "industria")]
    Industry,
    #[serde(rename = "salario")]
    Salary,
    #[serde(rename = "cargoInteresse")]
    DesiredRole,
    #[serde(rename = "industriaInteresse")]
    IndustryOfInterest,
    #[serde(rename = "cargoInteresseDetalhado")]
    DetailedRole,
    #[serde(rename = "tipoTrabalho")]
    WorkType,
    #[serde(rename = "tipoContratacao")]
    ContractType,
    #[serde(rename = "compartilhamentoAccepted")]
    SharingAccepted,
}

/// Per-step mapping from field to message; an empty message means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message for `field`, or `""` when valid or never checked.
    pub fn get(&self, field: Field) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn is_clean(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    /// Fields currently carrying a non-empty message.
    pub fn failing(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    /// Copies every non-empty message from `other` over this set.
    pub fn extend_failures(&mut self, other: &FieldErrors) {
        for (field, message) in other.failing() {
            self.set(field, message);
        }
    }

    /// Keeps only the entries whose field satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(Field) -> bool) {
        self.0.retain(|field, _| keep(*field));
    }

    /// All failing messages joined into one line.
    pub fn summary(&self) -> String {
        self.failing()
            .map(|(_, message)| message)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn has_full_name(value: &str) -> bool {
    value.split_whitespace().count() >= 2
}

pub fn full_name_error(value: &str) -> String {
    if has_full_name(value) {
        String::new()
    } else {
        "Informe nome e sobrenome.".to_string()
    }
}

fn cpf_check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let total: u32 = digits
        .iter()
        .zip((2..=first_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();
    let remainder = total % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// CPF checksum: two check digits over descending weights (10.. then 11..),
/// rejecting sequences of one repeated digit.
pub fn is_valid_cpf(value: &str) -> bool {
    if value.len() != CPF_LENGTH {
        return false;
    }
    let Some(digits) = value
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let first = cpf_check_digit(&digits[..9], 10);
    let mut with_first = digits[..9].to_vec();
    with_first.push(first);
    let second = cpf_check_digit(&with_first, 11);
    digits[9] == first && digits[10] == second
}

/// CPF (11 digits, checksummed) or RG (7–10 digits, accepted as-is).
pub fn document_error(value: &str) -> String {
    let digits = digits_only(value);
    if digits.is_empty() {
        return "Informe seu CPF ou RG.".to_string();
    }
    if digits.len() == CPF_LENGTH {
        return if is_valid_cpf(&digits) {
            String::new()
        } else {
            "Informe um CPF válido.".to_string()
        };
    }
    if (RG_MIN_LENGTH..=RG_MAX_LENGTH).contains(&digits.len()) {
        return String::new();
    }
    format!(
        "Informe um CPF com {CPF_LENGTH} dígitos ou um RG entre {RG_MIN_LENGTH} e {RG_MAX_LENGTH} dígitos."
    )
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

/// Permissive shape check, not RFC 5322.
pub fn is_valid_email(value: &str) -> bool {
    !value.is_empty() && email_regex().is_match(value)
}

pub fn email_error(value: &str) -> String {
    if is_valid_email(value) {
        String::new()
    } else {
        "Digite um e-mail válido.".to_string()
    }
}

pub fn is_valid_mobile(value: &str) -> bool {
    (MOBILE_MIN_LENGTH..=MOBILE_MAX_LENGTH).contains(&digits_only(value).len())
}

pub fn mobile_error(value: &str) -> String {
    if is_valid_mobile(value) {
        String::new()
    } else {
        format!("Informe um celular com {MOBILE_MIN_LENGTH} a {MOBILE_MAX_LENGTH} dígitos.")
    }
}

/// Zip code on its own: present and exactly eight digits.
pub fn zip_code_error(code: &str) -> String {
    let digits = digits_only(code);
    if digits.is_empty() {
        "Informe o CEP.".to_string()
    } else if digits.len() < ZIP_LENGTH {
        format!("Informe os {ZIP_LENGTH} dígitos do CEP.")
    } else if digits.len() > ZIP_LENGTH {
        "Informe um CEP válido.".to_string()
    } else {
        String::new()
    }
}

/// Zip field: present, complete, and resolved to a city and state.
pub fn zip_error(code: &str, city: &str, state: &str) -> String {
    let code_error = zip_code_error(code);
    if !code_error.is_empty() {
        code_error
    } else if city.trim().is_empty() || state.trim().is_empty() {
        "Informe um CEP válido.".to_string()
    } else {
        String::new()
    }
}

/// Non-empty text input or select.
pub fn required_error(value: &str, message: &str) -> String {
    if value.trim().is_empty() {
        message.to_string()
    } else {
        String::new()
    }
}

/// Consent flags must be exactly `true`.
pub fn consent_error(accepted: bool, message: &str) -> String {
    if accepted {
        String::new()
    } else {
        message.to_string()
    }
}
