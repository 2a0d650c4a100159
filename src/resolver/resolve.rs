//! The resolution pipeline.
//!
//! ```text
//! text ─ normalize ─ trigger scan ─ rule pass ─ numeric pass ─ defaults ─ code string
//! ```
//!
//! See the module docs in `resolver.rs` for the full picture. This file owns
//! the pipeline itself plus [`offer`], the single conflict-resolution site
//! every candidate goes through.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::resolver::numeric;
use crate::resolver::table::{Provenance, RuleTable, SegmentChoice};
use crate::resolver::trigger::TriggerInfo;

/// Per-segment outcome of a resolution pass: the winning code, a
/// human-readable reason, and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentExplanation {
    pub segment_key: String,
    pub code: String,
    pub reason: String,
    pub provenance: Provenance,
}

/// Result of resolving free text against one product line.
///
/// `code_string` is a best-effort guess and always full arity; hard
/// validation happens downstream in the codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub model_id: String,
    pub code_string: String,
    /// One entry per catalog segment, in position order.
    pub explanations: Vec<SegmentExplanation>,
    /// Advisory only (clamped values, rounded sizes); never fatal.
    pub warnings: Vec<String>,
}

/// Lowercase, collapse whitespace runs to single spaces, trim.
fn normalize(text: &str) -> String {
    regex!(r"\s+").replace_all(text.trim(), " ").to_lowercase()
}

/// The one conflict-resolution site.
///
/// A candidate replaces the current best for its segment when its priority is
/// **greater than or equal** to the best's. Candidates arrive in declaration
/// order (rules first, then numeric inference), so a priority tie goes to the
/// later arrival: the last-declared rule wins. Numeric priorities sit above
/// every pattern rule's, which is what makes quantities override keywords.
pub(crate) fn offer(choices: &mut BTreeMap<String, SegmentChoice>, candidate: SegmentChoice) {
    match choices.get(&candidate.segment_key) {
        Some(best) if candidate.priority < best.priority => {
            tracing::debug!(
                segment = %candidate.segment_key,
                code = %candidate.code,
                lost_to = %best.code,
                "candidate discarded by priority"
            );
        }
        _ => {
            tracing::debug!(segment = %candidate.segment_key, code = %candidate.code, priority = candidate.priority, "candidate accepted");
            choices.insert(candidate.segment_key.clone(), candidate);
        }
    }
}

/// Test every rule's patterns against the normalized text; first match wins
/// per rule, then the per-segment reduction in [`offer`] picks the winner.
fn apply_rule_table(text: &str, table: &RuleTable, choices: &mut BTreeMap<String, SegmentChoice>) {
    for rule in &table.rules {
        for pattern in &rule.patterns {
            if pattern.is_match(text) {
                offer(
                    choices,
                    SegmentChoice {
                        segment_key: rule.segment_key.clone(),
                        code: rule.target_code.clone(),
                        reason: format!("Matched pattern '{}' for segment '{}'.", pattern.as_str(), rule.segment_key),
                        priority: rule.priority,
                        provenance: Provenance::MatchedPattern,
                    },
                );
                break;
            }
        }
    }
}

/// Resolve free text into a code string plus explanations and warnings.
///
/// This never fails: empty text maps entirely to defaults, and unparseable
/// quantities simply don't contribute. The caller is expected to feed the
/// produced code string through the codec for hard validation.
pub fn resolve(text: &str, table: &RuleTable, catalog: &Catalog) -> Resolution {
    let normalized = normalize(text);
    let mut choices: BTreeMap<String, SegmentChoice> = BTreeMap::new();
    let mut warnings: Vec<String> = Vec::new();

    if !normalized.is_empty() {
        let trigger = TriggerInfo::scan(&normalized);
        apply_rule_table(&normalized, table, &mut choices);
        for inference in &table.numerics {
            numeric::apply(inference, &normalized, &trigger, &mut choices, &mut warnings);
        }
    }

    let mut code_string = catalog.model_id().to_string();
    let mut explanations = Vec::with_capacity(catalog.segments().len());

    for schema in catalog.segments() {
        let (code, reason, provenance) = match choices.remove(schema.key()) {
            Some(choice) => (choice.code, choice.reason, choice.provenance),
            None => {
                // A table built against a different catalog surfaces
                // downstream in the codec, not here.
                let code = table.defaults.get(schema.key()).cloned().unwrap_or_default();
                let reason = format!("No match; using default code '{code}'.");
                (code, reason, Provenance::Default)
            }
        };
        code_string.push('-');
        code_string.push_str(&code);
        explanations.push(SegmentExplanation {
            segment_key: schema.key().to_string(),
            code,
            reason,
            provenance,
        });
    }

    tracing::debug!(model = %catalog.model_id(), code = %code_string, warnings = warnings.len(), "resolved text");
    Resolution { model_id: catalog.model_id().to_string(), code_string, explanations, warnings }
}
