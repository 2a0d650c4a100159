//! Natural-language resolution engine.
//!
//! This module is the entry point for turning a free-text product request
//! into a code string the segment codec can validate. It is deliberately not
//! an NLP system: text understanding is literal/regex keyword spotting plus
//! numeric-range heuristics, nothing more.
//!
//! ## How the parts work together
//!
//! Resolving an input string is a pipeline:
//!
//! ```text
//! input text ── normalize (lowercase, collapse whitespace)
//!                    │
//!                    ▼
//!          TriggerInfo::scan          (trigger.rs)
//!            coarse buckets gating the passes below
//!                    │
//!                    ▼
//!          apply_rule_table           (resolve.rs)
//!            - first matching pattern wins per rule
//!            - per-segment conflict reduction by priority
//!                    │
//!                    ▼
//!          numeric inference          (numeric.rs)
//!            - strip unrelated numerics (4-20mA, volts, class/div)
//!            - extract span / line-size values
//!            - nearest breakpoint, clamp + warning at the edges
//!            - overrides any pattern match for the same segment
//!                    │
//!                    ▼
//!          defaulting + serialization (resolve.rs)
//!            - unmatched segments take the table default
//!            - emit code string + per-segment explanations
//! ```
//!
//! The resolver never fails on its own: empty text maps entirely to defaults
//! and out-of-range numerics produce warnings, not errors. Hard validation is
//! the codec's job, and the produced code string is always passed through it
//! downstream. This separation keeps "guessing" and "validating" independent
//! and independently testable.
//!
//! ## Responsibilities by module
//!
//! - `table.rs`: rule/table types and the validating [`RuleTableBuilder`]
//!   (every target code must exist in the catalog, every segment must have a
//!   default).
//! - `trigger.rs`: cheap bucket scan of the input; numeric passes only run
//!   when their buckets are present.
//! - `numeric.rs`: unit-aware numeric extraction and breakpoint selection
//!   with the clamping/rounding policy.
//! - `resolve.rs`: the pipeline above, producing a [`Resolution`].
//!
//! ## Conflict resolution
//!
//! When multiple rules for the same segment match, the candidate with
//! priority **greater than or equal to** the current best replaces it,
//! evaluated in declaration order; on a priority tie the later-declared rule
//! wins. Numeric-inference choices carry priorities above any pattern rule,
//! so they always override a textual guess for the same segment.

#[path = "resolver/numeric.rs"]
mod numeric;
#[path = "resolver/resolve.rs"]
mod resolve;
#[path = "resolver/table.rs"]
mod table;
#[path = "resolver/trigger.rs"]
mod trigger;

pub use numeric::{Breakpoint, NumericInference, Policy, Quantity};
pub use resolve::{Resolution, SegmentExplanation, resolve};
pub use table::{Provenance, RuleTable, RuleTableBuilder, SegmentRule};
#[allow(unused_imports)]
pub(crate) use table::SegmentChoice;
#[allow(unused_imports)]
pub(crate) use trigger::{BucketMask, TriggerInfo};
