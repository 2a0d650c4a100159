//! Trigger scanning (input pre-classification).
//!
//! This inspects the normalized input once and produces coarse buckets that
//! let the resolver skip whole passes cheaply: numeric inference only runs
//! when the input can possibly contain the quantities it looks for.
//!
//! This is a *heuristic* scan. False positives are acceptable (the numeric
//! extractors still have to match their full patterns) but false negatives
//! are not, so the checks err on the permissive side.

use bitflags::bitflags;

bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct BucketMask: u32 {
        /// Input contains at least one ASCII digit.
        const HAS_DIGITS = 1 << 0;
        /// Input mentions a length unit: `in`/`inch`/`inches`, a `"` mark,
        /// or DN pipe notation.
        const LENGTH_UNITISH = 1 << 1;
    }
}

/// Input characteristics detected from the normalized input.
#[derive(Debug, Clone)]
pub(crate) struct TriggerInfo {
    pub buckets: BucketMask,
}

impl TriggerInfo {
    /// Scan `input` (already lowercased by the resolver) for coarse buckets.
    pub fn scan(input: &str) -> Self {
        let mut buckets = BucketMask::empty();

        if input.bytes().any(|b| b.is_ascii_digit()) {
            buckets |= BucketMask::HAS_DIGITS;
        }

        if input.contains('"') {
            buckets |= BucketMask::LENGTH_UNITISH;
        } else {
            for word in input.split_whitespace() {
                let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
                // "2in", "dn50" arrive glued to their digits.
                let lengthish = matches!(trimmed.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.'), "in" | "inch" | "inches")
                    || (trimmed.starts_with("dn") && trimmed[2..].bytes().all(|b| b.is_ascii_digit()) && trimmed.len() > 2);
                if lengthish {
                    buckets |= BucketMask::LENGTH_UNITISH;
                    break;
                }
            }
        }

        TriggerInfo { buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_digits() {
        assert!(TriggerInfo::scan("span 0-400").buckets.contains(BucketMask::HAS_DIGITS));
        assert!(!TriggerInfo::scan("stainless housing").buckets.contains(BucketMask::HAS_DIGITS));
    }

    #[test]
    fn detects_length_units() {
        for input in ["2 inch meter", "2in line", "dn50 flow", "a 3\" line"] {
            assert!(
                TriggerInfo::scan(input).buckets.contains(BucketMask::LENGTH_UNITISH),
                "expected length unit in {input:?}"
            );
        }
    }

    #[test]
    fn stainless_does_not_count_as_inches() {
        let info = TriggerInfo::scan("stainless steel wetted parts");
        assert!(!info.buckets.contains(BucketMask::LENGTH_UNITISH));
    }

    #[test]
    fn dn_without_digits_is_not_a_unit() {
        let info = TriggerInfo::scan("dn rating unknown");
        assert!(!info.buckets.contains(BucketMask::LENGTH_UNITISH));
    }
}
