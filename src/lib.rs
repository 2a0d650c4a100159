extern crate self as partling;

#[macro_use]
mod macros;
mod api;
mod catalog;
mod codec;
mod error;
mod models;
mod pricing;
mod resolver;

pub use api::{
    Quote, price_code, price_code_with, price_text, price_text_with, resolve_text, resolve_text_with,
};
pub use catalog::{Catalog, CatalogBuilder, CatalogOption, ProductLine, Registry, SegmentDef, SegmentSchema};
pub use codec::{ParsedPartNumber, ParsedSegment, parse, serialize};
pub use error::{CatalogError, ErrorPayload, PartNumberError};
pub use models::{builtin, detect_model, try_builtin};
pub use pricing::{PricingResult, price};
pub use resolver::{
    Breakpoint, NumericInference, Policy, Provenance, Quantity, Resolution, RuleTable, RuleTableBuilder,
    SegmentExplanation, SegmentRule, resolve,
};
