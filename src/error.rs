//! Error taxonomy.
//!
//! Two enums, split by lifetime:
//!
//! - [`PartNumberError`]: request-time failures raised while looking up a
//!   model, parsing a code string, or (never) resolving text. One variant per
//!   taxonomy entry, each carrying machine-readable fields so callers can
//!   build precise messages without string inspection.
//! - [`CatalogError`]: startup-time failures raised while building catalogs,
//!   rule tables, or the registry. These indicate a broken product definition
//!   and are surfaced once, during process initialization.
//!
//! Collaborators (HTTP layer, PDF renderer) receive [`PartNumberError`] and
//! map it to status codes/JSON themselves; this crate knows nothing about
//! transports. [`PartNumberError::to_payload`] produces the flat, serializable
//! shape they forward.

use serde::Serialize;
use thiserror::Error;

/// Request-time error: a part number or model lookup that cannot succeed.
///
/// Parsing fails fast: the first offending segment is reported and no partial
/// result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartNumberError {
    #[error("empty part number")]
    EmptyInput,

    #[error("expected {expected} hyphen-separated tokens including the model, got {actual}")]
    Structure { expected: usize, actual: usize },

    #[error("model prefix [{got}] does not match [{expected}]")]
    ModelMismatch { got: String, expected: String },

    #[error("invalid code [{invalid_code}] for segment [{segment_label}]; valid options are: {}", valid_codes.join(", "))]
    InvalidCode {
        segment_key: String,
        segment_label: String,
        invalid_code: String,
        /// Full, sorted list of codes accepted by the failing segment.
        valid_codes: Vec<String>,
    },

    #[error("unknown model [{got}]; known models are: {}", known_models.join(", "))]
    UnknownModel {
        got: String,
        /// Sorted list of every registered model id.
        known_models: Vec<String>,
    },
}

/// Flat error shape crossing the collaborator boundary.
///
/// Fields that don't apply to a variant are `None`/empty rather than absent,
/// so downstream consumers see a stable schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub message: String,
    pub segment: Option<String>,
    pub invalid_code: Option<String>,
    pub valid_codes: Vec<String>,
}

impl PartNumberError {
    pub fn to_payload(&self) -> ErrorPayload {
        let (segment, invalid_code, valid_codes) = match self {
            Self::EmptyInput | Self::Structure { .. } => (None, None, Vec::new()),
            Self::ModelMismatch { got, expected } => {
                (Some("model".to_string()), Some(got.clone()), vec![expected.clone()])
            }
            Self::InvalidCode { segment_key, invalid_code, valid_codes, .. } => {
                (Some(segment_key.clone()), Some(invalid_code.clone()), valid_codes.clone())
            }
            Self::UnknownModel { got, known_models } => {
                (Some("model".to_string()), Some(got.clone()), known_models.clone())
            }
        };

        ErrorPayload { message: self.to_string(), segment, invalid_code, valid_codes }
    }
}

/// Startup-time error: an invalid product definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("model id must not be empty")]
    EmptyModelId,

    #[error("base price {0} is negative")]
    NegativeBasePrice(rust_decimal::Decimal),

    #[error("segment [{0}] declares no codes")]
    EmptySegment(String),

    #[error("segment [{segment_key}] declares empty or duplicate code [{code}]")]
    BadCode { segment_key: String, code: String },

    #[error("segment positions are not contiguous from 1: segment [{segment_key}] declares position {position}, expected {expected}")]
    BadPosition { segment_key: String, position: usize, expected: usize },

    #[error("duplicate segment key [{0}]")]
    DuplicateSegment(String),

    #[error("baseline code string does not parse: {0}")]
    BadBaseline(PartNumberError),

    #[error("rule targets unknown segment [{0}]")]
    RuleUnknownSegment(String),

    #[error("rule for segment [{segment_key}] targets code [{target_code}] absent from the catalog")]
    RuleUnknownCode { segment_key: String, target_code: String },

    #[error("segment [{0}] has no default code")]
    MissingDefault(String),

    #[error("default code [{code}] for segment [{segment_key}] is absent from the catalog")]
    BadDefault { segment_key: String, code: String },

    #[error("numeric inference targets segment [{segment_key}]: {problem}")]
    BadNumericInference { segment_key: String, problem: String },

    #[error("model [{0}] is already registered")]
    DuplicateModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_code_message_lists_valid_options() {
        let err = PartNumberError::InvalidCode {
            segment_key: "sig".to_string(),
            segment_label: "Output signal".to_string(),
            invalid_code: "Z".to_string(),
            valid_codes: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        };
        assert_eq!(err.to_string(), "invalid code [Z] for segment [Output signal]; valid options are: A, B, C");
    }

    #[test]
    fn invalid_code_payload_keeps_fields() {
        let err = PartNumberError::InvalidCode {
            segment_key: "sig".to_string(),
            segment_label: "Output signal".to_string(),
            invalid_code: "Z".to_string(),
            valid_codes: vec!["A".to_string(), "B".to_string()],
        };
        let payload = err.to_payload();
        assert_eq!(payload.segment.as_deref(), Some("sig"));
        assert_eq!(payload.invalid_code.as_deref(), Some("Z"));
        assert_eq!(payload.valid_codes, vec!["A", "B"]);
    }

    #[test]
    fn unknown_model_payload_carries_known_models() {
        let err = PartNumberError::UnknownModel {
            got: "NOPE".to_string(),
            known_models: vec!["QPMAG".to_string(), "QPSAH200S".to_string()],
        };
        let payload = err.to_payload();
        assert_eq!(payload.segment.as_deref(), Some("model"));
        assert_eq!(payload.valid_codes, vec!["QPMAG", "QPSAH200S"]);
    }

    #[test]
    fn empty_input_payload_is_bare() {
        let payload = PartNumberError::EmptyInput.to_payload();
        assert_eq!(payload.segment, None);
        assert_eq!(payload.invalid_code, None);
        assert!(payload.valid_codes.is_empty());
    }

    #[test]
    fn payload_serializes_with_stable_schema() {
        let json = serde_json::to_value(PartNumberError::EmptyInput.to_payload()).unwrap();
        assert_eq!(json["message"], "empty part number");
        assert!(json["segment"].is_null());
        assert!(json["valid_codes"].as_array().unwrap().is_empty());
    }
}
