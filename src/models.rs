//! Built-in product lines.
//!
//! Each submodule defines one product family: its catalog (segments, codes,
//! adders, base price) and the rule table that resolves free text against it.
//! [`builtin`] assembles them into the registry the default API entry points
//! use; applications that want a different set construct their own
//! [`Registry`](crate::Registry) and use the `_with` entry points.
//!
//! The catalog data is process-lifetime configuration, validated by the
//! builders at startup. Adding a product line means adding a submodule with a
//! `product_line()` constructor and registering it in [`try_builtin`].

#[path = "models/qpmag.rs"]
mod qpmag;
#[path = "models/qpsah200s.rs"]
mod qpsah200s;

use crate::catalog::Registry;
use crate::error::CatalogError;

/// Build the registry of built-in product lines.
pub fn try_builtin() -> Result<Registry, CatalogError> {
    let mut registry = Registry::new();
    registry.register(qpsah200s::product_line()?)?;
    registry.register(qpmag::product_line()?)?;
    Ok(registry)
}

/// Like [`try_builtin`], for contexts where a broken built-in definition is
/// unrecoverable anyway (the default API registry). Built-in data is covered
/// by tests; a failure here is a programming error.
pub fn builtin() -> Registry {
    match try_builtin() {
        Ok(registry) => registry,
        Err(err) => panic!("built-in product line failed validation: {err}"),
    }
}

/// Keyword-based model selection for callers that don't name one.
///
/// Deliberately crude: the first product family whose keywords appear wins,
/// and the differential-pressure transmitter is the fallback.
pub fn detect_model(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    const DP_KEYWORDS: &[&str] = &["dp", "differential pressure", "pressure transmitter"];
    if DP_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return qpsah200s::MODEL_ID;
    }

    const MAG_KEYWORDS: &[&str] = &["magmeter", "mag meter", "magnetic flow", "mag flow", "mag"];
    if MAG_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return qpmag::MODEL_ID;
    }

    qpsah200s::MODEL_ID
}
