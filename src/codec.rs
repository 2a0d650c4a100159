//! Segment codec: positional parsing and serialization of part numbers.
//!
//! The wire format is terse and stable:
//!
//! ```text
//! MODEL-<code1>-<code2>-...-<codeN>
//! ```
//!
//! uppercase, hyphen-delimited, fixed arity per model. All semantic metadata
//! (labels, descriptions, adders) lives in the [`Catalog`]; the codec itself
//! is generic positional validation, which is why one codec serves every
//! product family.
//!
//! Parsing fails fast with the first structured error encountered: no
//! partial results, no aggregation. Serialization of a parsed part number
//! reproduces the canonical input exactly (round-trip property).

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::PartNumberError;

/// One validated segment of a parsed part number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSegment {
    pub key: String,
    pub label: String,
    pub code: String,
    pub description: String,
    pub adder: rust_decimal::Decimal,
}

/// A fully validated part number, one entry per catalog segment in position
/// order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPartNumber {
    pub model_id: String,
    pub segments: Vec<ParsedSegment>,
}

impl ParsedPartNumber {
    /// Re-serialize to the canonical code string.
    pub fn code_string(&self) -> String {
        let mut out = self.model_id.clone();
        for segment in &self.segments {
            out.push('-');
            out.push_str(&segment.code);
        }
        out
    }
}

/// Serialize a parsed part number back to its canonical code string.
///
/// Inverse of [`parse`]: `serialize(&parse(s)?) == s` for canonical `s`.
pub fn serialize(parsed: &ParsedPartNumber) -> String {
    parsed.code_string()
}

/// Parse and validate `raw` against `catalog`.
///
/// ```text
/// raw ── trim/uppercase ── split('-') ── arity check ── model check
///                                             │
///                                             ▼
///                            per-segment code lookup (position order)
///                                             │
///                  first miss ── InvalidCode { valid_codes: sorted }
///                                             │
///                                             ▼
///                                      ParsedPartNumber
/// ```
pub fn parse(raw: &str, catalog: &Catalog) -> Result<ParsedPartNumber, PartNumberError> {
    let normalized = raw.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(PartNumberError::EmptyInput);
    }

    let tokens: Vec<&str> = normalized.split('-').collect();
    let expected = 1 + catalog.segments().len();
    if tokens.len() != expected {
        return Err(PartNumberError::Structure { expected, actual: tokens.len() });
    }

    if tokens[0] != catalog.model_id() {
        return Err(PartNumberError::ModelMismatch {
            got: tokens[0].to_string(),
            expected: catalog.model_id().to_string(),
        });
    }

    let mut segments = Vec::with_capacity(catalog.segments().len());
    for (schema, &token) in catalog.segments().iter().zip(&tokens[1..]) {
        let code = match schema.zero_pad() {
            Some(width) if token.len() < width => {
                format!("{}{}", "0".repeat(width - token.len()), token)
            }
            _ => token.to_string(),
        };

        let Some(option) = schema.option(&code) else {
            return Err(PartNumberError::InvalidCode {
                segment_key: schema.key().to_string(),
                segment_label: schema.label().to_string(),
                invalid_code: code,
                valid_codes: schema.valid_codes(),
            });
        };

        segments.push(ParsedSegment {
            key: schema.key().to_string(),
            label: schema.label().to_string(),
            code: option.code.clone(),
            description: option.description.clone(),
            adder: option.adder,
        });
    }

    tracing::debug!(model = %catalog.model_id(), code = %normalized, "parsed part number");
    Ok(ParsedPartNumber { model_id: catalog.model_id().to_string(), segments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn catalog() -> Catalog {
        Catalog::builder("MODEL", Decimal::from(1000))
            .segment(segment! {
                key: "sig",
                label: "Signal",
                position: 1,
                codes: { "A" => ("Analog", 0), "B" => ("Bus", 150), "C" => ("Custom", 150) },
            })
            .segment(segment! {
                key: "span",
                label: "Span",
                position: 2,
                codes: { "M" => ("Medium", 0), "H" => ("High", 200) },
            })
            .segment(segment! {
                key: "opts",
                label: "Options",
                position: 3,
                pad: 2,
                codes: { "01" => ("Cable", 50), "02" => ("Memory card", 0) },
            })
            .build()
            .unwrap()
    }

    #[test]
    fn parses_valid_code_in_position_order() {
        let parsed = parse("MODEL-A-H-01", &catalog()).unwrap();
        assert_eq!(parsed.model_id, "MODEL");
        let keys: Vec<&str> = parsed.segments.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["sig", "span", "opts"]);
        assert_eq!(parsed.segments[1].code, "H");
        assert_eq!(parsed.segments[1].adder, Decimal::from(200));
    }

    #[test]
    fn round_trips_exactly() {
        for code in ["MODEL-A-M-02", "MODEL-C-H-01", "MODEL-B-M-01"] {
            let parsed = parse(code, &catalog()).unwrap();
            assert_eq!(serialize(&parsed), code);
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let parsed = parse("  model-a-h-02 ", &catalog()).unwrap();
        assert_eq!(parsed.code_string(), "MODEL-A-H-02");
    }

    #[test]
    fn zero_pads_fixed_width_segments() {
        let parsed = parse("MODEL-A-M-2", &catalog()).unwrap();
        assert_eq!(parsed.segments[2].code, "02");
        assert_eq!(parsed.code_string(), "MODEL-A-M-02");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse("   ", &catalog()).unwrap_err(), PartNumberError::EmptyInput);
    }

    #[test]
    fn enforces_arity() {
        assert_eq!(
            parse("MODEL-A-H", &catalog()).unwrap_err(),
            PartNumberError::Structure { expected: 4, actual: 3 }
        );
        assert_eq!(
            parse("MODEL-A-H-01-99", &catalog()).unwrap_err(),
            PartNumberError::Structure { expected: 4, actual: 5 }
        );
    }

    #[test]
    fn rejects_model_mismatch() {
        assert_eq!(
            parse("OTHER-A-H-01", &catalog()).unwrap_err(),
            PartNumberError::ModelMismatch { got: "OTHER".to_string(), expected: "MODEL".to_string() }
        );
    }

    #[test]
    fn fails_fast_on_first_invalid_segment_with_sorted_codes() {
        // Both the first and second segment are wrong; only the first is reported.
        let err = parse("MODEL-Z-X-01", &catalog()).unwrap_err();
        assert_eq!(
            err,
            PartNumberError::InvalidCode {
                segment_key: "sig".to_string(),
                segment_label: "Signal".to_string(),
                invalid_code: "Z".to_string(),
                valid_codes: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            }
        );
    }

    #[test]
    fn reports_later_segment_when_earlier_ones_pass() {
        let err = parse("MODEL-A-X-01", &catalog()).unwrap_err();
        assert!(matches!(err, PartNumberError::InvalidCode { ref segment_key, .. } if segment_key == "span"));
    }
}
