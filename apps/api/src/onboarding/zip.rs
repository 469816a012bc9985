//! Postal-code payload normalization.
//!
//! The lookup collaborator answers with one of several naming conventions and
//! sometimes wraps the address in a `data` object. `normalize_zip_payload` is
//! the single place those shapes are reconciled.
//!
//! Priority per field (first non-empty trimmed string wins):
//!
//! | field        | keys                               |
//! |--------------|------------------------------------|
//! | street       | `logradouro`, `street`, `address`  |
//! | neighborhood | `bairro`, `neighborhood`           |
//! | city         | `localidade`, `cidade`, `city`     |
//! | state        | `uf`, `estado`, `state`            |
//! | code         | `cep`                              |
//!
//! Top-level keys are searched before the nested `data` object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const STREET_KEYS: &[&str] = &["logradouro", "street", "address"];
const NEIGHBORHOOD_KEYS: &[&str] = &["bairro", "neighborhood"];
const CITY_KEYS: &[&str] = &["localidade", "cidade", "city"];
const STATE_KEYS: &[&str] = &["uf", "estado", "state"];
const CODE_KEYS: &[&str] = &["cep"];
const NESTED_KEY: &str = "data";

/// Canonical address resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipLookupResult {
    pub code: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl ZipLookupResult {
    pub fn has_city_and_state(&self) -> bool {
        self.city.is_some() && self.state.is_some()
    }

    /// One-line address, e.g. `Praça da Sé - Sé - São Paulo/SP`.
    /// Falls back to the code when no address part resolved.
    pub fn summary(&self) -> String {
        let mut segments: Vec<String> = Vec::new();
        if let Some(street) = &self.street {
            segments.push(street.clone());
        }
        if let Some(neighborhood) = &self.neighborhood {
            segments.push(neighborhood.clone());
        }
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => segments.push(format!("{city}/{state}")),
            (Some(city), None) => segments.push(city.clone()),
            (None, Some(state)) => segments.push(state.clone()),
            (None, None) => {}
        }

        if segments.is_empty() {
            return self.code.clone().unwrap_or_default();
        }
        segments.join(" - ")
    }
}

fn pick_first(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Maps any accepted payload shape to a `ZipLookupResult`. Non-object
/// payloads resolve to just the requested code.
pub fn normalize_zip_payload(payload: &Value, requested_code: &str) -> ZipLookupResult {
    let empty = Map::new();
    let top = payload.as_object().unwrap_or(&empty);
    let nested = top
        .get(NESTED_KEY)
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let field = |keys: &[&str]| pick_first(top, keys).or_else(|| pick_first(nested, keys));

    let code = field(CODE_KEYS).or_else(|| {
        let requested = requested_code.trim();
        (!requested.is_empty()).then(|| requested.to_string())
    });

    ZipLookupResult {
        code,
        street: field(STREET_KEYS),
        neighborhood: field(NEIGHBORHOOD_KEYS),
        city: field(CITY_KEYS),
        state: field(STATE_KEYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_viacep_shape() {
        let payload = json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP"
        });
        let result = normalize_zip_payload(&payload, "01001000");
        assert_eq!(result.code.as_deref(), Some("01001-000"));
        assert_eq!(result.city.as_deref(), Some("São Paulo"));
        assert_eq!(result.state.as_deref(), Some("SP"));
        assert_eq!(result.summary(), "Praça da Sé - Sé - São Paulo/SP");
    }

    #[test]
    fn test_english_keys_and_priority() {
        let payload = json!({
            "city": "Campinas",
            "cidade": "  ",
            "state": "SP",
            "street": "Av. Brasil"
        });
        let result = normalize_zip_payload(&payload, "13010000");
        assert_eq!(result.city.as_deref(), Some("Campinas"));
        assert_eq!(result.street.as_deref(), Some("Av. Brasil"));
        assert_eq!(result.code.as_deref(), Some("13010000"));
    }

    #[test]
    fn test_nested_data_is_fallback_source() {
        let payload = json!({
            "status": "ok",
            "cidade": "Recife",
            "data": { "localidade": "Olinda", "estado": "PE", "bairro": "Boa Viagem" }
        });
        let result = normalize_zip_payload(&payload, "51020000");
        assert_eq!(result.city.as_deref(), Some("Recife"));
        assert_eq!(result.state.as_deref(), Some("PE"));
        assert_eq!(result.neighborhood.as_deref(), Some("Boa Viagem"));
        assert!(result.has_city_and_state());
    }

    #[test]
    fn test_non_string_values_ignored() {
        let payload = json!({ "localidade": 42, "cidade": null, "city": "Natal", "uf": ["RN"] });
        let result = normalize_zip_payload(&payload, "59000000");
        assert_eq!(result.city.as_deref(), Some("Natal"));
        assert_eq!(result.state, None);
        assert_eq!(result.summary(), "Natal");
    }

    #[test]
    fn test_summary_falls_back_to_code() {
        let result = normalize_zip_payload(&Value::Null, "70040010");
        assert_eq!(result.summary(), "70040010");

        let only_state = normalize_zip_payload(&json!({ "uf": "DF" }), "70040010");
        assert_eq!(only_state.summary(), "DF");
    }
}
