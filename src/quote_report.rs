use partling::{PricingResult, Provenance, Quote};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_pricing(result: &PricingResult, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  {}", result.code_string), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Segments ━━━", ansi::GRAY));
    for segment in &result.segments {
        let adder = if segment.adder.is_zero() {
            palette.dim("      -".to_string())
        } else {
            let signed = if segment.adder.is_sign_positive() {
                format!("+{}", segment.adder)
            } else {
                segment.adder.to_string()
            };
            palette.paint(format!("{signed:>7}"), ansi::GREEN)
        };
        println!("  {:<4} {}  {}", segment.code, adder, palette.dim(format!("{} ({})", segment.description, segment.label)));
    }

    println!("\n{}", palette.paint("━━━ Pricing ━━━", ansi::GRAY));
    println!("  Base price:   {}", result.base_price);
    println!("  Total adders: {}", result.total_adders);
    println!("  {}", palette.bold(palette.paint(format!("Final price:  {}", result.final_price), ansi::GREEN)));
    println!();
}

pub fn print_quote(quote: &Quote, color: bool) {
    let palette = ansi::Palette::new(color);

    println!("\n{}", palette.paint("━━━ Resolution ━━━", ansi::GRAY));
    for explanation in &quote.explanations {
        let marker = match explanation.provenance {
            Provenance::MatchedPattern => palette.paint("text   ", ansi::CYAN),
            Provenance::NumericInference => palette.paint("numeric", ansi::GREEN),
            Provenance::Default => palette.dim("default"),
        };
        println!("  {marker}  {:<24} {:<4} {}", explanation.segment_key, explanation.code, palette.dim(&explanation.reason));
    }

    if !quote.warnings.is_empty() {
        println!("\n{}", palette.paint("━━━ Warnings ━━━", ansi::GRAY));
        for warning in &quote.warnings {
            println!("  {}", palette.paint(format!("⚠ {warning}"), ansi::YELLOW));
        }
    }

    print_pricing(&quote.pricing, color);
}
