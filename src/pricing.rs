//! Pricing engine.
//!
//! Purely additive: the final price is the catalog base price plus the sum of
//! the adders of every chosen segment option. Adders may be negative
//! (discount options) and the total may legitimately land below the base
//! price. Decimal arithmetic throughout; no rounding.
//!
//! There are no error conditions here: a [`ParsedPartNumber`] only ever
//! contains options the codec validated against the same catalog.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::codec::{ParsedPartNumber, ParsedSegment};

/// A priced configuration. Created fresh per request; not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingResult {
    pub model_id: String,
    pub code_string: String,
    pub base_price: Decimal,
    pub total_adders: Decimal,
    pub final_price: Decimal,
    pub segments: Vec<ParsedSegment>,
}

/// Price a parsed part number against its catalog.
pub fn price(parsed: &ParsedPartNumber, catalog: &Catalog) -> PricingResult {
    let total_adders: Decimal = parsed.segments.iter().map(|s| s.adder).sum();
    let base_price = catalog.base_price();

    PricingResult {
        model_id: parsed.model_id.clone(),
        code_string: parsed.code_string(),
        base_price,
        total_adders,
        final_price: base_price + total_adders,
        segments: parsed.segments.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

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
            .build()
            .unwrap()
    }

    #[test]
    fn sums_base_price_and_adders() {
        let catalog = catalog();
        let parsed = codec::parse("MODEL-A-H", &catalog).unwrap();
        let result = price(&parsed, &catalog);
        assert_eq!(result.base_price, Decimal::from(1000));
        assert_eq!(result.total_adders, Decimal::from(200));
        assert_eq!(result.final_price, Decimal::from(1200));
        assert_eq!(result.code_string, "MODEL-A-H");
    }

    #[test]
    fn additivity_holds_for_every_combination() {
        let catalog = catalog();
        for sig in ["A", "B", "C"] {
            for span in ["M", "H"] {
                let parsed = codec::parse(&format!("MODEL-{sig}-{span}"), &catalog).unwrap();
                let result = price(&parsed, &catalog);
                let expected: Decimal = catalog.base_price() + parsed.segments.iter().map(|s| s.adder).sum::<Decimal>();
                assert_eq!(result.final_price, expected);
            }
        }
    }

    #[test]
    fn negative_adders_can_undercut_base_price() {
        let catalog = Catalog::builder("MODEL", Decimal::from(100))
            .segment(segment! {
                key: "liner",
                label: "Liner",
                position: 1,
                codes: { "HR" => ("Hard rubber", -50), "PT" => ("PTFE", 0) },
            })
            .build()
            .unwrap();
        let parsed = codec::parse("MODEL-HR", &catalog).unwrap();
        let result = price(&parsed, &catalog);
        assert_eq!(result.final_price, Decimal::from(50));
    }
}
