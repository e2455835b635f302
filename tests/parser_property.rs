// tests/parser_property.rs

//! Property tests for the output parser.
//!
//! The parser sees completely untrusted text (whatever a benchmark script
//! happened to print), so the properties worth pinning down are: it never
//! panics, it is a pure function of its input, and the bottom-up scan really
//! does prefer the most recent timing line.

use proptest::prelude::*;

use langbench::runner::parser::{parse_output, ParsedOutput};

proptest! {
    #[test]
    fn parsing_never_panics_and_is_deterministic(raw in ".{0,2000}") {
        let first = parse_output(&raw);
        let second = parse_output(&raw);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn whitespace_only_output_parses_to_nothing(raw in "[ \t\n]{0,200}") {
        prop_assert_eq!(parse_output(&raw), ParsedOutput::default());
    }

    #[test]
    fn most_recent_real_time_line_wins(
        warm_min in 0u32..10,
        warm_tenths in 0u32..600,
        final_min in 0u32..10,
        final_tenths in 0u32..600,
        filler in "[a-zA-Z ]{0,40}",
    ) {
        let warm_secs = f64::from(warm_tenths) / 10.0;
        let final_secs = f64::from(final_tenths) / 10.0;
        let raw = format!(
            "real {warm_min}m{warm_secs}s\n{filler}\nreal {final_min}m{final_secs}s"
        );

        let parsed = parse_output(&raw);
        let expected_ms = (f64::from(final_min) * 60.0 + final_secs) * 1000.0;
        prop_assert_eq!(parsed.time_ms, Some(expected_ms));
    }

    #[test]
    fn version_banners_alone_never_produce_a_duration(
        name in "[A-Za-z]{1,12}",
        major in 0u32..20,
        minor in 0u32..30,
        patch in 0u32..30,
    ) {
        let raw = format!("{name} version {major}.{minor}.{patch}");
        prop_assert_eq!(parse_output(&raw).time_ms, None);
    }
}
