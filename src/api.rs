use once_cell::sync::Lazy;
use serde::Serialize;

use crate::catalog::Registry;
use crate::codec;
use crate::error::PartNumberError;
use crate::pricing::{self, PricingResult};
use crate::resolver::{self, Resolution, SegmentExplanation};

static BUILTIN: Lazy<Registry> = Lazy::new(crate::models::builtin);

/// A priced configuration produced from free text: the pricing breakdown plus
/// the resolver's per-segment explanations and advisory warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub pricing: PricingResult,
    /// One entry per segment, in position order.
    pub explanations: Vec<SegmentExplanation>,
    /// Advisory only (clamped spans, rounded sizes); never fatal.
    pub warnings: Vec<String>,
}

/// Parse and price `code_string` against the built-in registry.
///
/// # Example
/// ```
/// use partling::price_code;
///
/// let result = price_code("QPMAG", "QPMAG-08-PT-SS-F1-C-1-1-C-00").unwrap();
/// assert_eq!(result.final_price.to_string(), "1900");
/// ```
pub fn price_code(model_id: &str, code_string: &str) -> Result<PricingResult, PartNumberError> {
    price_code_with(&BUILTIN, model_id, code_string)
}

/// Parse and price `code_string` against an explicitly constructed registry.
///
/// Use this when the application owns its own product lines instead of the
/// built-in set.
pub fn price_code_with(
    registry: &Registry,
    model_id: &str,
    code_string: &str,
) -> Result<PricingResult, PartNumberError> {
    let line = registry.lookup(model_id)?;
    let parsed = codec::parse(code_string, &line.catalog)?;
    Ok(pricing::price(&parsed, &line.catalog))
}

/// Resolve free text into a code string and explanations, without pricing.
///
/// The only failure mode is an unknown model: resolution itself is
/// best-effort and never fails.
pub fn resolve_text(model_id: &str, text: &str) -> Result<Resolution, PartNumberError> {
    resolve_text_with(&BUILTIN, model_id, text)
}

/// Like [`resolve_text`], against an explicitly constructed registry.
pub fn resolve_text_with(registry: &Registry, model_id: &str, text: &str) -> Result<Resolution, PartNumberError> {
    let line = registry.lookup(model_id)?;
    Ok(resolver::resolve(text, &line.rules, &line.catalog))
}

/// Resolve free text into a part number and price it, against the built-in
/// registry.
///
/// Internally: resolve → parse → price. The resolved code string is always
/// re-validated by the codec, keeping "guessing" and "validating" separate.
///
/// # Example
/// ```
/// use partling::price_text;
///
/// let quote = price_text("QPSAH200S", "explosion proof, 0-800 inches of water").unwrap();
/// assert_eq!(quote.pricing.code_string, "QPSAH200S-A-H-G-3-C-3-1-1-C-2-02");
/// ```
pub fn price_text(model_id: &str, text: &str) -> Result<Quote, PartNumberError> {
    price_text_with(&BUILTIN, model_id, text)
}

/// Like [`price_text`], against an explicitly constructed registry.
pub fn price_text_with(registry: &Registry, model_id: &str, text: &str) -> Result<Quote, PartNumberError> {
    let line = registry.lookup(model_id)?;
    let resolution = resolver::resolve(text, &line.rules, &line.catalog);
    let parsed = codec::parse(&resolution.code_string, &line.catalog)?;
    let pricing = pricing::price(&parsed, &line.catalog);

    tracing::info!(
        model = %pricing.model_id,
        code = %pricing.code_string,
        price = %pricing.final_price,
        "quoted text request"
    );
    Ok(Quote { pricing, explanations: resolution.explanations, warnings: resolution.warnings })
}
