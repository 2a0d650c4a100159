//! QPSAH200S differential-pressure transmitter.
//!
//! Part number structure (segments separated by `-`):
//!
//! ```text
//! QPSAH200S - [1] - [2] - [3] - [4] - [5] - [6] - [7] - [8] - [9] - [10] - [11]
//!
//! 1  output_signal_type        7  electrical_connection
//! 2  span_range                8  display
//! 3  wetted_parts_material     9  mounting_bracket
//! 4  process_connection        10 area_classification
//! 5  housing_material          11 optional_features (two digits)
//! 6  installation_orientation
//! ```
//!
//! Baseline configuration: `QPSAH200S-A-M-G-3-C-3-1-1-C-1-02`.
//!
//! Span is inferred numerically in inches of water column: anything up to
//! 400 inWC lands in the medium range (M), above that the high range (H),
//! and requests beyond 1000 inWC clamp to H with a warning.

use rust_decimal::Decimal;

use crate::catalog::{Catalog, ProductLine};
use crate::error::CatalogError;
use crate::resolver::{Breakpoint, NumericInference, Policy, Quantity, RuleTableBuilder, SegmentRule};

pub(crate) const MODEL_ID: &str = "QPSAH200S";

const BASE_PRICE: i64 = 1000;
const BASELINE: &str = "QPSAH200S-A-M-G-3-C-3-1-1-C-1-02";

fn catalog() -> Result<Catalog, CatalogError> {
    Catalog::builder(MODEL_ID, Decimal::from(BASE_PRICE))
        .segment(segment! {
            key: "output_signal_type",
            label: "Output signal type",
            position: 1,
            codes: {
                "A" => ("HART with 4-20 mA analog signal", 0),
                "B" => ("Fieldbus digital communication", 150),
                "C" => ("Profibus digital communication", 150),
            },
        })
        .segment(segment! {
            key: "span_range",
            label: "Span range",
            position: 2,
            codes: {
                "D" => ("2-20 inWC span", 150),
                "L" => ("2-40 inWC span", 100),
                "M" => ("4-400 inWC span", 0),
                "H" => ("400-1000 inWC span", 200),
            },
        })
        .segment(segment! {
            key: "wetted_parts_material",
            label: "Wetted parts material",
            position: 3,
            codes: {
                "G" => ("316 stainless steel wetted parts", 0),
                "A" => ("Hastelloy C wetted parts", 200),
                "B" => ("Cover flange material wetted parts", 50),
                "D" => ("Titanium wetted parts", 300),
            },
        })
        .segment(segment! {
            key: "process_connection",
            label: "Process connection",
            position: 4,
            codes: {
                "1" => ("No process connection", 0),
                "2" => ("1/4\" NPT female process connection", 0),
                "3" => ("1/2\" NPT female process connection", 0),
            },
        })
        .segment(segment! {
            key: "housing_material",
            label: "Housing material",
            position: 5,
            codes: {
                "A" => ("Cast aluminum housing", 0),
                "B" => ("Cast aluminum housing, corrosion-resistant coating", 100),
                "C" => ("316 stainless steel housing", 0),
            },
        })
        .segment(segment! {
            key: "installation_orientation",
            label: "Installation orientation",
            position: 6,
            codes: {
                "1" => ("Horizontal installation", 0),
                "2" => ("Vertical installation", 0),
                "3" => ("Universal flange installation", 0),
                "4" => ("Vertical installation, high-pressure side left", 50),
            },
        })
        .segment(segment! {
            key: "electrical_connection",
            label: "Electrical connection",
            position: 7,
            codes: {
                "1" => ("1/2\" NPT female electrical connection", 0),
                "2" => ("G 1/2\" female electrical connection", 50),
                "3" => ("1/4\" NPT female electrical connection", 0),
            },
        })
        .segment(segment! {
            key: "display",
            label: "Display",
            position: 8,
            codes: {
                "1" => ("With display", 0),
                "0" => ("Without display", 0),
            },
        })
        .segment(segment! {
            key: "mounting_bracket",
            label: "Mounting bracket",
            position: 9,
            codes: {
                "A" => ("304 stainless mounting bracket", 0),
                "B" => ("316 stainless mounting bracket", 50),
                "C" => ("Universal mounting bracket", 0),
            },
        })
        .segment(segment! {
            key: "area_classification",
            label: "Area classification",
            position: 10,
            codes: {
                "1" => ("General purpose", 0),
                "2" => ("Explosion proof", 200),
                "3" => ("Class I Division 2", 150),
                "4" => ("Canadian specifications (CSA)", 100),
            },
        })
        .segment(segment! {
            key: "optional_features",
            label: "Optional features",
            position: 11,
            pad: 2,
            codes: {
                "01" => ("Signal cable", 50),
                "02" => ("Memory card", 0),
                "03" => ("High corrosion resistance coating", 150),
                "04" => ("Unlimited software updates", 200),
            },
        })
        .baseline(BASELINE)
        .build()
}

fn rules() -> Vec<SegmentRule> {
    vec![
        // Output signal type (A/B/C)
        rule! {
            segment: "output_signal_type",
            code: "A",
            patterns: [
                r"\b4\s*-\s*20\s*m?a?\b",
                r"\b4\s*to\s*20\s*m?a?\b",
                r"\banalog\b",
                r"\bcurrent loop\b",
                r"\bhart\b",
            ],
            priority: 5,
        },
        rule! {
            segment: "output_signal_type",
            code: "B",
            patterns: [r"\bfieldbus\b", r"\bfoundation\b.*\bfieldbus\b"],
            priority: 10,
        },
        rule! {
            segment: "output_signal_type",
            code: "C",
            patterns: [r"\bprofibus\b"],
            priority: 10,
        },
        // Span range (M/H) - textual hints only; numbers are handled by the
        // span inference and override these.
        rule! {
            segment: "span_range",
            code: "M",
            patterns: [r"\blow(?:\s+range|\s+pressure)?\b", r"\bmedium(?:\s+range|\s+pressure)?\b"],
            priority: 5,
        },
        rule! {
            segment: "span_range",
            code: "H",
            patterns: [r"\bhigh(?:\s+range|\s+pressure)?\b", r"\bwide\s+range\b"],
            priority: 6,
        },
        // Wetted parts (G/A/D)
        rule! {
            segment: "wetted_parts_material",
            code: "G",
            patterns: [r"\bstainless\b", r"\b316\b", r"\bss\s+wetted\b"],
            priority: 5,
        },
        rule! {
            segment: "wetted_parts_material",
            code: "A",
            patterns: [r"\bhastelloy\b", r"\bhc\s+wetted\b"],
            priority: 6,
        },
        rule! {
            segment: "wetted_parts_material",
            code: "D",
            patterns: [r"\btitanium\b", r"\bti\s+wetted\b"],
            priority: 7,
        },
        // Housing (C/B/A)
        rule! {
            segment: "housing_material",
            code: "C",
            patterns: [r"\bstainless housing\b", r"\b316\s+housing\b", r"\bss housing\b"],
            priority: 7,
        },
        rule! {
            segment: "housing_material",
            code: "B",
            patterns: [r"\bcorrosion[- ]?resistant\b", r"\bcoated aluminum housing\b"],
            priority: 6,
        },
        rule! {
            segment: "housing_material",
            code: "A",
            patterns: [r"\baluminum housing\b", r"\bcast aluminum\b"],
            priority: 5,
        },
        // Display (1 = with, 0 = without)
        rule! {
            segment: "display",
            code: "1",
            patterns: [
                r"\bdisplay\b",
                r"\blocal indicator\b",
                r"\bdigital readout\b",
                r"\bgauge face\b",
                r"\bwith local\b",
            ],
            priority: 5,
        },
        rule! {
            segment: "display",
            code: "0",
            patterns: [
                r"\bno\s+display\b",
                r"\bwithout display\b",
                r"\bblind\b",
                r"\bhead only\b",
                r"\bremote\s+mount\b",
            ],
            priority: 6,
        },
        // Mounting bracket (C/A/B)
        rule! {
            segment: "mounting_bracket",
            code: "C",
            patterns: [r"\buniversal bracket\b", r"\bpipe\b.*\bmount\b", r"\bwall\b.*\bmount\b"],
            priority: 4,
        },
        rule! {
            segment: "mounting_bracket",
            code: "A",
            patterns: [r"\b304\b.*\bbracket\b"],
            priority: 5,
        },
        rule! {
            segment: "mounting_bracket",
            code: "B",
            patterns: [r"\b316\b.*\bbracket\b"],
            priority: 6,
        },
        // Area classification (1/2/3/4)
        rule! {
            segment: "area_classification",
            code: "1",
            patterns: [r"\bgeneral purpose\b", r"\bnon[- ]hazardous\b", r"\bsafe area\b"],
            priority: 3,
        },
        rule! {
            segment: "area_classification",
            code: "2",
            patterns: [r"\bexplosion[\s-]*proof\b", r"\bxp\b", r"\bflameproof\b"],
            priority: 10,
        },
        rule! {
            segment: "area_classification",
            code: "3",
            patterns: [
                r"\bclass\s*(?:i|1)\b.*\bdiv(?:ision)?\s*2\b",
                r"\bcl\s*1\s*div\s*2\b",
                r"\bzone\s*2\b",
            ],
            priority: 9,
        },
        rule! {
            segment: "area_classification",
            code: "4",
            patterns: [r"\bcanadian\b", r"\bcsa\b"],
            priority: 8,
        },
    ]
}

fn span_inference() -> NumericInference {
    NumericInference {
        segment_key: "span_range".to_string(),
        label: "span".to_string(),
        unit: "inWC".to_string(),
        quantity: Quantity::SpanInchesWater,
        policy: Policy::CeilingRange,
        floor: Some(4.0),
        breakpoints: vec![
            Breakpoint { value: 400.0, code: "M".to_string() },
            Breakpoint { value: 1000.0, code: "H".to_string() },
        ],
    }
}

pub(crate) fn product_line() -> Result<ProductLine, CatalogError> {
    let catalog = catalog()?;
    let rules = RuleTableBuilder::new(BASELINE)
        .rules(rules())
        .default("output_signal_type", "A")
        .default("span_range", "M")
        .default("wetted_parts_material", "G")
        .default("process_connection", "3")
        .default("housing_material", "C")
        .default("installation_orientation", "3")
        .default("electrical_connection", "1")
        .default("display", "1")
        .default("mounting_bracket", "C")
        .default("area_classification", "1")
        .default("optional_features", "02")
        .numeric(span_inference())
        .build(&catalog)?;
    Ok(ProductLine { catalog, rules })
}
