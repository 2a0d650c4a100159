//! QPMAG magnetic flowmeter.
//!
//! Part number structure (segments separated by `-`):
//!
//! ```text
//! QPMAG - [1] - [2] - [3] - [4] - [5] - [6] - [7] - [8] - [9]
//!
//! 1  line_size              6  output_signal
//! 2  liner_material         7  power_supply
//! 3  electrode_material     8  area_classification
//! 4  process_connection     9  options
//! 5  housing_material
//! ```
//!
//! Baseline configuration: `QPMAG-04-PT-SS-F1-C-1-1-C-00`.
//!
//! Line size is inferred numerically from inches (`2"`, `1.5 inch`) or DN
//! notation (`DN50`), rounding to the nearest catalog size with a warning
//! when the request isn't an exact match.

use rust_decimal::Decimal;

use crate::catalog::{Catalog, ProductLine};
use crate::error::CatalogError;
use crate::resolver::{Breakpoint, NumericInference, Policy, Quantity, RuleTableBuilder, SegmentRule};

pub(crate) const MODEL_ID: &str = "QPMAG";

const BASE_PRICE: i64 = 1800;
const BASELINE: &str = "QPMAG-04-PT-SS-F1-C-1-1-C-00";

fn catalog() -> Result<Catalog, CatalogError> {
    Catalog::builder(MODEL_ID, Decimal::from(BASE_PRICE))
        .segment(segment! {
            key: "line_size",
            label: "Line size",
            position: 1,
            codes: {
                "04" => ("1\" (DN25)", 0),
                "06" => ("1.5\" (DN40)", 50),
                "08" => ("2\" (DN50)", 100),
                "10" => ("3\" (DN80)", 150),
                "12" => ("4\" (DN100)", 250),
            },
        })
        .segment(segment! {
            key: "liner_material",
            label: "Liner material",
            position: 2,
            codes: {
                "PT" => ("PTFE liner", 0),
                "HR" => ("Hard rubber liner", -50),
                "PU" => ("Polyurethane liner", -25),
                "PP" => ("Polypropylene liner", -25),
            },
        })
        .segment(segment! {
            key: "electrode_material",
            label: "Electrode material",
            position: 3,
            codes: {
                "SS" => ("316 stainless steel electrodes", 0),
                "HC" => ("Hastelloy C electrodes", 150),
                "TI" => ("Titanium electrodes", 200),
            },
        })
        .segment(segment! {
            key: "process_connection",
            label: "Process connection",
            position: 4,
            codes: {
                "F1" => ("Wafer style, 150 class", 0),
                "F2" => ("Flanged, 150 class", 150),
                "F3" => ("Flanged, 300 class", 250),
            },
        })
        .segment(segment! {
            key: "housing_material",
            label: "Transmitter housing material",
            position: 5,
            codes: {
                "C" => ("Coated aluminum housing", 0),
                "S" => ("Stainless steel housing", 200),
            },
        })
        .segment(segment! {
            key: "output_signal",
            label: "Output signal",
            position: 6,
            codes: {
                "1" => ("4-20 mA with HART", 0),
                "2" => ("4-20 mA with HART + pulse output", 75),
                "3" => ("Digital (Modbus/fieldbus) output", 100),
            },
        })
        .segment(segment! {
            key: "power_supply",
            label: "Power supply",
            position: 7,
            codes: {
                "1" => ("24 VDC power", 0),
                "2" => ("Universal AC power (85-264 VAC)", 75),
            },
        })
        .segment(segment! {
            key: "area_classification",
            label: "Area classification / approvals",
            position: 8,
            codes: {
                "C" => ("General purpose (non-hazardous)", 0),
                "D" => ("Division 2 / Zone 2 approvals", 125),
                "E" => ("Explosion-proof / flameproof approvals", 250),
            },
        })
        .segment(segment! {
            key: "options",
            label: "Options",
            position: 9,
            codes: {
                "00" => ("No extra options", 0),
                "01" => ("Grounding rings", 80),
                "02" => ("Grounding electrodes", 100),
                "03" => ("Grounding rings + grounding electrodes", 150),
            },
        })
        .baseline(BASELINE)
        .build()
}

fn rules() -> Vec<SegmentRule> {
    vec![
        // Liner material
        rule! { segment: "liner_material", code: "PT", patterns: [r"\bptfe\b", r"\bteflon\b"], priority: 8 },
        rule! { segment: "liner_material", code: "HR", patterns: [r"\bhard rubber\b", r"\brubber liner\b"], priority: 7 },
        rule! { segment: "liner_material", code: "PU", patterns: [r"\bpolyurethane\b", r"\bpu liner\b"], priority: 6 },
        rule! { segment: "liner_material", code: "PP", patterns: [r"\bpolypropylene\b", r"\bpp liner\b"], priority: 6 },
        // Electrode material
        rule! { segment: "electrode_material", code: "SS", patterns: [r"\bstainless\b", r"\b316\b"], priority: 5 },
        rule! { segment: "electrode_material", code: "HC", patterns: [r"\bhastelloy\b"], priority: 7 },
        rule! { segment: "electrode_material", code: "TI", patterns: [r"\btitanium\b"], priority: 8 },
        // Process connection
        rule! { segment: "process_connection", code: "F1", patterns: [r"\bwafer\b"], priority: 7 },
        rule! { segment: "process_connection", code: "F2", patterns: [r"\bflange", r"\b150\s*class\b"], priority: 7 },
        rule! { segment: "process_connection", code: "F3", patterns: [r"\b300\s*class\b"], priority: 8 },
        // Housing
        rule! { segment: "housing_material", code: "S", patterns: [r"\bstainless housing\b", r"\bss housing\b"], priority: 8 },
        rule! { segment: "housing_material", code: "C", patterns: [r"\bcoated aluminum\b", r"\baluminum housing\b"], priority: 6 },
        // Output signal
        rule! {
            segment: "output_signal",
            code: "1",
            patterns: [r"\b4\s*-\s*20\s*m?a?\b", r"\b4\s*to\s*20\s*m?a?\b", r"\bhart\b"],
            priority: 7,
        },
        rule! { segment: "output_signal", code: "2", patterns: [r"\bpulse\b", r"\bfrequency output\b"], priority: 8 },
        rule! {
            segment: "output_signal",
            code: "3",
            patterns: [r"\bmodbus\b", r"\bfieldbus\b", r"\bdigital output\b"],
            priority: 9,
        },
        // Power supply
        rule! {
            segment: "power_supply",
            code: "1",
            patterns: [r"\b24\s*v\s*dc\b", r"\b24vdc\b", r"\bdc power\b"],
            priority: 7,
        },
        rule! {
            segment: "power_supply",
            code: "2",
            patterns: [r"\bac power\b", r"\b110v\b", r"\b120v\b", r"\b230v\b"],
            priority: 8,
        },
        // Area classification
        rule! {
            segment: "area_classification",
            code: "C",
            patterns: [r"\bgeneral purpose\b", r"\bnon[- ]hazardous\b", r"\bsafe area\b"],
            priority: 4,
        },
        rule! {
            segment: "area_classification",
            code: "D",
            patterns: [r"\bdivision\s*2\b", r"\bdiv\s*2\b", r"\bzone\s*2\b"],
            priority: 7,
        },
        rule! {
            segment: "area_classification",
            code: "E",
            patterns: [r"\bexplosion[\s-]*proof\b", r"\bxp\b", r"\bflameproof\b"],
            priority: 9,
        },
        // Options; both-grounding is declared last and outranks the singles.
        rule! { segment: "options", code: "01", patterns: [r"\bgrounding rings\b"], priority: 6 },
        rule! { segment: "options", code: "02", patterns: [r"\bgrounding electrodes\b"], priority: 6 },
        rule! {
            segment: "options",
            code: "03",
            patterns: [r"\bgrounding rings\b.*\bgrounding electrodes\b"],
            priority: 8,
        },
    ]
}

fn line_size_inference() -> NumericInference {
    NumericInference {
        segment_key: "line_size".to_string(),
        label: "line size".to_string(),
        unit: "inch".to_string(),
        quantity: Quantity::LineSizeInches,
        policy: Policy::NearestNominal,
        floor: None,
        breakpoints: vec![
            Breakpoint { value: 1.0, code: "04".to_string() },
            Breakpoint { value: 1.5, code: "06".to_string() },
            Breakpoint { value: 2.0, code: "08".to_string() },
            Breakpoint { value: 3.0, code: "10".to_string() },
            Breakpoint { value: 4.0, code: "12".to_string() },
        ],
    }
}

pub(crate) fn product_line() -> Result<ProductLine, CatalogError> {
    let catalog = catalog()?;
    let rules = RuleTableBuilder::new(BASELINE)
        .rules(rules())
        .default("line_size", "04")
        .default("liner_material", "PT")
        .default("electrode_material", "SS")
        .default("process_connection", "F1")
        .default("housing_material", "C")
        .default("output_signal", "1")
        .default("power_supply", "1")
        .default("area_classification", "C")
        .default("options", "00")
        .numeric(line_size_inference())
        .build(&catalog)?;
    Ok(ProductLine { catalog, rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec, pricing, resolver};
    use rust_decimal::Decimal;

    fn line() -> ProductLine {
        product_line().unwrap()
    }

    #[test]
    fn baseline_prices_at_base() {
        let line = line();
        let parsed = codec::parse(BASELINE, &line.catalog).unwrap();
        let result = pricing::price(&parsed, &line.catalog);
        assert_eq!(result.final_price, Decimal::from(BASE_PRICE));
    }

    #[test]
    fn resolves_two_inch_hazardous_request() {
        let line = line();
        let resolution = resolver::resolve(
            "2 inch mag meter, PTFE liner, hastelloy electrodes, 300 class flanges, explosion proof",
            &line.rules,
            &line.catalog,
        );
        assert_eq!(resolution.code_string, "QPMAG-08-PT-HC-F3-C-1-1-E-00");
        assert!(resolution.warnings.is_empty(), "2\" is an exact catalog size: {:?}", resolution.warnings);

        let parsed = codec::parse(&resolution.code_string, &line.catalog).unwrap();
        let result = pricing::price(&parsed, &line.catalog);
        assert_eq!(result.final_price, Decimal::from(2550));
    }

    #[test]
    fn dn_notation_selects_line_size() {
        let line = line();
        let resolution = resolver::resolve("dn50 magmeter with grounding rings", &line.rules, &line.catalog);
        assert_eq!(resolution.code_string, "QPMAG-08-PT-SS-F1-C-1-1-C-01");
    }

    #[test]
    fn oversize_line_rounds_down_with_warning() {
        let line = line();
        let resolution = resolver::resolve("6 inch magnetic flow meter", &line.rules, &line.catalog);
        let size = resolution.explanations.iter().find(|e| e.segment_key == "line_size").unwrap();
        assert_eq!(size.code, "12");
        assert_eq!(resolution.warnings.len(), 1);
        assert!(resolution.warnings[0].contains("catalog range is 1 to 4 inch"), "{}", resolution.warnings[0]);
    }

    #[test]
    fn discount_liner_reduces_the_price() {
        let line = line();
        let resolution = resolver::resolve("1 inch mag with hard rubber liner", &line.rules, &line.catalog);
        assert_eq!(resolution.code_string, "QPMAG-04-HR-SS-F1-C-1-1-C-00");
        let parsed = codec::parse(&resolution.code_string, &line.catalog).unwrap();
        let result = pricing::price(&parsed, &line.catalog);
        assert_eq!(result.final_price, Decimal::from(1750));
    }

    #[test]
    fn both_grounding_options_outrank_the_singles() {
        let line = line();
        let resolution =
            resolver::resolve("grounding rings and grounding electrodes please", &line.rules, &line.catalog);
        let options = resolution.explanations.iter().find(|e| e.segment_key == "options").unwrap();
        assert_eq!(options.code, "03");
    }
}
