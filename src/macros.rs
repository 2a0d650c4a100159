#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a [`SegmentRule`](crate::SegmentRule): one target code for one
/// segment, matched by any of the listed patterns, with an optional priority
/// (defaults to 0; higher wins a conflict).
#[macro_export]
macro_rules! rule {
    (
        segment: $segment:literal,
        code: $code:literal,
        patterns: [ $($pat:literal),* $(,)? ]
        $(, priority: $priority:expr)?
        $(,)?
    ) => {{
        $crate::SegmentRule {
            segment_key: $segment.to_string(),
            target_code: $code.to_string(),
            patterns: vec![ $($crate::regex!($pat).clone()),* ],
            priority: { 0 $(+ $priority)? },
        }
    }};
}

/// Declare a catalog segment: a stable key, a display label, a 1-based
/// position, and the closed `code => (description, adder)` map. The optional
/// `pad:` field gives a fixed digit width; the codec left-pads shorter tokens
/// with zeros before lookup.
#[macro_export]
macro_rules! segment {
    (
        key: $key:literal,
        label: $label:literal,
        position: $position:expr,
        $(pad: $pad:expr,)?
        codes: { $($code:literal => ($desc:literal, $adder:expr)),* $(,)? }
        $(,)?
    ) => {{
        $crate::SegmentDef {
            key: $key.to_string(),
            label: $label.to_string(),
            position: $position,
            zero_pad: { let pad: Option<usize> = None $(.or(Some($pad)))?; pad },
            codes: vec![
                $(($code.to_string(), $desc.to_string(), rust_decimal::Decimal::from($adder as i64))),*
            ],
        }
    }};
}
