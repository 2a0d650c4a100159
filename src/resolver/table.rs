//! Rule tables: the per-product configuration the resolver runs against.
//!
//! A [`RuleTable`] is an ordered list of [`SegmentRule`]s plus a default code
//! per segment, a baseline code string, and the numeric-inference specs for
//! size/span segments. Tables are built through [`RuleTableBuilder`], which
//! validates the whole configuration against its [`Catalog`] once at startup:
//! a rule can never target a code the codec would later reject.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::resolver::numeric::NumericInference;

/// A pattern-to-code mapping used to infer a segment's code from free text.
///
/// Patterns are tried in order; the first hit wins for this rule. `priority`
/// is the tie-breaking weight when several rules match the same segment
/// (higher wins; see the module docs in `resolver.rs` for tie semantics).
#[derive(Debug, Clone)]
pub struct SegmentRule {
    pub segment_key: String,
    pub target_code: String,
    pub patterns: Vec<Regex>,
    pub priority: u16,
}

/// Where a resolved segment code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    MatchedPattern,
    NumericInference,
    Default,
}

/// Resolver-internal candidate: one segment's current best choice.
///
/// Produced and discarded within a single resolution pass.
#[derive(Debug, Clone)]
pub(crate) struct SegmentChoice {
    pub segment_key: String,
    pub code: String,
    pub reason: String,
    pub priority: u16,
    pub provenance: Provenance,
}

/// Ordered rules + defaults + numeric inference for one product line.
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub(crate) rules: Vec<SegmentRule>,
    pub(crate) defaults: BTreeMap<String, String>,
    pub(crate) baseline_code_string: String,
    pub(crate) numerics: Vec<NumericInference>,
}

impl RuleTable {
    pub fn baseline_code_string(&self) -> &str {
        &self.baseline_code_string
    }

    pub fn default_code(&self, segment_key: &str) -> Option<&str> {
        self.defaults.get(segment_key).map(String::as_str)
    }
}

/// Validating builder for [`RuleTable`].
#[derive(Debug)]
pub struct RuleTableBuilder {
    rules: Vec<SegmentRule>,
    defaults: BTreeMap<String, String>,
    baseline_code_string: String,
    numerics: Vec<NumericInference>,
}

impl RuleTableBuilder {
    pub fn new(baseline_code_string: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            defaults: BTreeMap::new(),
            baseline_code_string: baseline_code_string.into(),
            numerics: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: SegmentRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = SegmentRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn default(mut self, segment_key: impl Into<String>, code: impl Into<String>) -> Self {
        self.defaults.insert(segment_key.into(), code.into().to_uppercase());
        self
    }

    pub fn numeric(mut self, inference: NumericInference) -> Self {
        self.numerics.push(inference);
        self
    }

    /// Validate the configuration against `catalog` and freeze it.
    ///
    /// Checks, in order: every rule targets an existing segment and code;
    /// every catalog segment has a default and the default code exists; every
    /// numeric-inference spec targets an existing segment with ascending
    /// breakpoints whose codes exist; the baseline parses.
    pub fn build(self, catalog: &Catalog) -> Result<RuleTable, CatalogError> {
        for rule in &self.rules {
            let Some(schema) = catalog.segment(&rule.segment_key) else {
                return Err(CatalogError::RuleUnknownSegment(rule.segment_key.clone()));
            };
            if schema.option(&rule.target_code.to_uppercase()).is_none() {
                return Err(CatalogError::RuleUnknownCode {
                    segment_key: rule.segment_key.clone(),
                    target_code: rule.target_code.clone(),
                });
            }
        }

        for schema in catalog.segments() {
            let Some(code) = self.defaults.get(schema.key()) else {
                return Err(CatalogError::MissingDefault(schema.key().to_string()));
            };
            if schema.option(code).is_none() {
                return Err(CatalogError::BadDefault {
                    segment_key: schema.key().to_string(),
                    code: code.clone(),
                });
            }
        }

        for inference in &self.numerics {
            let Some(schema) = catalog.segment(&inference.segment_key) else {
                return Err(CatalogError::RuleUnknownSegment(inference.segment_key.clone()));
            };
            if inference.breakpoints.is_empty() {
                return Err(CatalogError::BadNumericInference {
                    segment_key: inference.segment_key.clone(),
                    problem: "no breakpoints".to_string(),
                });
            }
            let mut previous = f64::NEG_INFINITY;
            for breakpoint in &inference.breakpoints {
                if breakpoint.value <= previous {
                    return Err(CatalogError::BadNumericInference {
                        segment_key: inference.segment_key.clone(),
                        problem: format!("breakpoints not ascending at {}", breakpoint.value),
                    });
                }
                previous = breakpoint.value;
                if schema.option(&breakpoint.code.to_uppercase()).is_none() {
                    return Err(CatalogError::BadNumericInference {
                        segment_key: inference.segment_key.clone(),
                        problem: format!("breakpoint code [{}] absent from the catalog", breakpoint.code),
                    });
                }
            }
        }

        if let Err(err) = crate::codec::parse(&self.baseline_code_string, catalog) {
            return Err(CatalogError::BadBaseline(err));
        }

        Ok(RuleTable {
            rules: self.rules,
            defaults: self.defaults,
            baseline_code_string: self.baseline_code_string.trim().to_uppercase(),
            numerics: self.numerics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::numeric::{Breakpoint, Policy, Quantity};
    use rust_decimal::Decimal;

    fn catalog() -> Catalog {
        Catalog::builder("MODEL", Decimal::from(1000))
            .segment(segment! {
                key: "sig",
                label: "Signal",
                position: 1,
                codes: { "A" => ("Analog", 0), "B" => ("Bus", 150) },
            })
            .build()
            .unwrap()
    }

    #[test]
    fn rejects_rule_with_unknown_code() {
        let err = RuleTableBuilder::new("MODEL-A")
            .rule(rule! { segment: "sig", code: "Z", patterns: [r"\bfieldbus\b"] })
            .default("sig", "A")
            .build(&catalog())
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::RuleUnknownCode { segment_key: "sig".to_string(), target_code: "Z".to_string() }
        );
    }

    #[test]
    fn rejects_rule_with_unknown_segment() {
        let err = RuleTableBuilder::new("MODEL-A")
            .rule(rule! { segment: "nope", code: "A", patterns: [r"\bx\b"] })
            .default("sig", "A")
            .build(&catalog())
            .unwrap_err();
        assert_eq!(err, CatalogError::RuleUnknownSegment("nope".to_string()));
    }

    #[test]
    fn rejects_missing_default() {
        let err = RuleTableBuilder::new("MODEL-A").build(&catalog()).unwrap_err();
        assert_eq!(err, CatalogError::MissingDefault("sig".to_string()));
    }

    #[test]
    fn rejects_default_absent_from_catalog() {
        let err = RuleTableBuilder::new("MODEL-A").default("sig", "Z").build(&catalog()).unwrap_err();
        assert_eq!(err, CatalogError::BadDefault { segment_key: "sig".to_string(), code: "Z".to_string() });
    }

    #[test]
    fn rejects_unordered_breakpoints() {
        let err = RuleTableBuilder::new("MODEL-A")
            .default("sig", "A")
            .numeric(NumericInference {
                segment_key: "sig".to_string(),
                label: "span".to_string(),
                unit: "inWC".to_string(),
                quantity: Quantity::SpanInchesWater,
                policy: Policy::CeilingRange,
                floor: Some(0.0),
                breakpoints: vec![
                    Breakpoint { value: 400.0, code: "A".to_string() },
                    Breakpoint { value: 100.0, code: "B".to_string() },
                ],
            })
            .build(&catalog())
            .unwrap_err();
        assert!(matches!(err, CatalogError::BadNumericInference { .. }));
    }

    #[test]
    fn rejects_bad_baseline() {
        let err = RuleTableBuilder::new("MODEL-Z").default("sig", "A").build(&catalog()).unwrap_err();
        assert!(matches!(err, CatalogError::BadBaseline(_)));
    }

    #[test]
    fn builds_a_valid_table() {
        let table = RuleTableBuilder::new("MODEL-A")
            .rule(rule! { segment: "sig", code: "B", patterns: [r"\bfieldbus\b"], priority: 10 })
            .default("sig", "A")
            .build(&catalog())
            .unwrap();
        assert_eq!(table.baseline_code_string(), "MODEL-A");
        assert_eq!(table.default_code("sig"), Some("A"));
    }
}
