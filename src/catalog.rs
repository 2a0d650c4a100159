//! Product catalogs and the model registry.
//!
//! A [`Catalog`] is the full schema + pricing table for one product family:
//! an ordered list of [`SegmentSchema`]s (each a closed set of valid codes
//! with descriptions and price adders) plus a base price. Catalogs are built
//! once at process start through [`CatalogBuilder`], which validates every
//! structural invariant up front so the codec and pricing engine can trust
//! them unconditionally at request time:
//!
//! - segment positions contiguous from 1, keys unique
//! - every segment has a non-empty, duplicate-free code set
//! - base price non-negative
//! - the baseline code string (when given) parses against the finished catalog
//!
//! A [`ProductLine`] couples a catalog with its natural-language
//! [`RuleTable`](crate::RuleTable); the [`Registry`] maps model ids to product
//! lines. Registration happens during initialization only; afterwards the
//! registry is read-only and safe for unsynchronized concurrent reads.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{CatalogError, PartNumberError};
use crate::resolver::RuleTable;

/// One valid choice for a segment: its code, display text, and price delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOption {
    pub code: String,
    pub description: String,
    pub adder: Decimal,
}

/// One positional slot in a part number.
///
/// The `position` is 1-based and defines code-string order; the option map is
/// keyed by canonical (uppercase) code. `zero_pad` marks fixed-width digit
/// segments whose tokens are left-padded before lookup (e.g. `2` -> `02`).
#[derive(Debug, Clone)]
pub struct SegmentSchema {
    key: String,
    label: String,
    position: usize,
    zero_pad: Option<usize>,
    options: BTreeMap<String, CatalogOption>,
}

impl SegmentSchema {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn zero_pad(&self) -> Option<usize> {
        self.zero_pad
    }

    pub fn option(&self, code: &str) -> Option<&CatalogOption> {
        self.options.get(code)
    }

    /// All codes accepted by this segment, sorted.
    ///
    /// This is the list carried verbatim by
    /// [`PartNumberError::InvalidCode`](crate::PartNumberError) so callers can
    /// display "valid options are: ..." without re-deriving it.
    pub fn valid_codes(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }
}

/// Immutable schema + pricing table for one product family.
#[derive(Debug, Clone)]
pub struct Catalog {
    model_id: String,
    base_price: Decimal,
    segments: Vec<SegmentSchema>,
    baseline_code_string: Option<String>,
}

impl Catalog {
    pub fn builder(model_id: impl Into<String>, base_price: Decimal) -> CatalogBuilder {
        CatalogBuilder {
            model_id: model_id.into(),
            base_price,
            segments: Vec::new(),
            baseline_code_string: None,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Segments in position order.
    pub fn segments(&self) -> &[SegmentSchema] {
        &self.segments
    }

    pub fn segment(&self, key: &str) -> Option<&SegmentSchema> {
        self.segments.iter().find(|s| s.key == key)
    }

    pub fn baseline_code_string(&self) -> Option<&str> {
        self.baseline_code_string.as_deref()
    }
}

/// Raw segment definition consumed by [`CatalogBuilder::segment`].
///
/// Usually produced by the [`segment!`](crate::segment) macro.
#[derive(Debug, Clone)]
pub struct SegmentDef {
    pub key: String,
    pub label: String,
    pub position: usize,
    pub zero_pad: Option<usize>,
    /// `(code, description, adder)` triples, declaration order.
    pub codes: Vec<(String, String, Decimal)>,
}

/// Validating builder for [`Catalog`].
///
/// All structural checks happen in [`build`](CatalogBuilder::build); a
/// returned `Catalog` is guaranteed well-formed.
#[derive(Debug)]
pub struct CatalogBuilder {
    model_id: String,
    base_price: Decimal,
    segments: Vec<SegmentDef>,
    baseline_code_string: Option<String>,
}

impl CatalogBuilder {
    pub fn segment(mut self, def: SegmentDef) -> Self {
        self.segments.push(def);
        self
    }

    pub fn baseline(mut self, code_string: impl Into<String>) -> Self {
        self.baseline_code_string = Some(code_string.into());
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.model_id.trim().is_empty() {
            return Err(CatalogError::EmptyModelId);
        }
        if self.base_price < Decimal::ZERO {
            return Err(CatalogError::NegativeBasePrice(self.base_price));
        }

        let mut segments = Vec::with_capacity(self.segments.len());
        for (index, def) in self.segments.into_iter().enumerate() {
            let expected = index + 1;
            if def.position != expected {
                return Err(CatalogError::BadPosition {
                    segment_key: def.key,
                    position: def.position,
                    expected,
                });
            }
            if segments.iter().any(|s: &SegmentSchema| s.key == def.key) {
                return Err(CatalogError::DuplicateSegment(def.key));
            }
            if def.codes.is_empty() {
                return Err(CatalogError::EmptySegment(def.key));
            }

            let mut options = BTreeMap::new();
            for (code, description, adder) in def.codes {
                if code.trim().is_empty() {
                    return Err(CatalogError::BadCode { segment_key: def.key, code });
                }
                let canonical = code.to_uppercase();
                let previous = options.insert(
                    canonical.clone(),
                    CatalogOption { code: canonical.clone(), description, adder },
                );
                if previous.is_some() {
                    return Err(CatalogError::BadCode { segment_key: def.key, code: canonical });
                }
            }

            segments.push(SegmentSchema {
                key: def.key,
                label: def.label,
                position: def.position,
                zero_pad: def.zero_pad,
                options,
            });
        }

        let catalog = Catalog {
            model_id: self.model_id.to_uppercase(),
            base_price: self.base_price,
            segments,
            baseline_code_string: None,
        };

        // The baseline must survive the codec it will later be fed through.
        match self.baseline_code_string {
            None => Ok(catalog),
            Some(baseline) => match crate::codec::parse(&baseline, &catalog) {
                Ok(parsed) => Ok(Catalog { baseline_code_string: Some(parsed.code_string()), ..catalog }),
                Err(err) => Err(CatalogError::BadBaseline(err)),
            },
        }
    }
}

/// A catalog plus the rule table that resolves free text against it.
#[derive(Debug, Clone)]
pub struct ProductLine {
    pub catalog: Catalog,
    pub rules: RuleTable,
}

/// Read-only mapping from model id to [`ProductLine`].
///
/// Populated once during process initialization; `lookup` is the only
/// operation used at request time.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    lines: BTreeMap<String, ProductLine>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, line: ProductLine) -> Result<(), CatalogError> {
        let model_id = line.catalog.model_id().to_string();
        if self.lines.contains_key(&model_id) {
            return Err(CatalogError::DuplicateModel(model_id));
        }
        tracing::debug!(model = %model_id, segments = line.catalog.segments().len(), "registered product line");
        self.lines.insert(model_id, line);
        Ok(())
    }

    pub fn lookup(&self, model_id: &str) -> Result<&ProductLine, PartNumberError> {
        let canonical = model_id.trim().to_uppercase();
        self.lines.get(&canonical).ok_or_else(|| PartNumberError::UnknownModel {
            got: model_id.to_string(),
            known_models: self.known_models(),
        })
    }

    /// Sorted ids of every registered model.
    pub fn known_models(&self) -> Vec<String> {
        self.lines.keys().cloned().collect()
    }
}
