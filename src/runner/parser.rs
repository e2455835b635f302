// src/runner/parser.rs

//! Extracts timing information from raw benchmark output.
//!
//! The benchmark scripts are independently authored and print whatever they
//! like; there is no machine-readable protocol. Instead, a small set of
//! pattern strategies is applied to the accumulated stdout, scanning from the
//! **last** line backwards so that the most recent timing line wins (scripts
//! often print a warm-up run before the real one):
//!
//! 1. `real 0m3.123s` — standard `time` command output.
//! 2. A bare `3.123s` / `3.123 seconds`, skipping any line that mentions
//!    "version" (so `Python 3.10.12` is never misread as a duration).
//! 3. Independently of timing, `prime...: <n>` yields a secondary metric.
//!
//! Parsing never fails; strategies that match nothing simply leave the
//! corresponding field unset.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::language::Language;

static TIME_PATTERN_REAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"real\s+(\d+)m(\d+\.?\d*)s").unwrap());

static TIME_PATTERN_GENERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+\.?\d*)\s*s(?:econds)?").unwrap());

static PRIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)prime.*?:\s*(\d+)").unwrap());

/// What the strategies extracted from one blob of output.
///
/// Pure data; [`parse_output`] on identical input always yields an identical
/// `ParsedOutput`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedOutput {
    /// Wall-clock duration in milliseconds.
    pub time_ms: Option<f64>,
    /// The duration as the script printed it, e.g. `0m3.5s`.
    pub time_formatted: Option<String>,
    /// Secondary metric (the prime count most scripts report).
    pub prime_count: Option<u64>,
}

/// The immutable record of a successfully completed job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchResult {
    pub language: Language,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(rename = "timeFormatted", skip_serializing_if = "Option::is_none")]
    pub time_formatted: Option<String>,
    #[serde(rename = "primeCount", skip_serializing_if = "Option::is_none")]
    pub prime_count: Option<u64>,
}

impl BenchResult {
    /// Stamp a parsed output with the language and completion time.
    pub fn new(language: Language, parsed: ParsedOutput) -> Self {
        Self {
            language,
            timestamp: Utc::now(),
            time: parsed.time_ms,
            time_formatted: parsed.time_formatted,
            prime_count: parsed.prime_count,
        }
    }
}

/// Parse raw benchmark output.
///
/// Never fails; absent matches leave the optional fields unset.
pub fn parse_output(raw: &str) -> ParsedOutput {
    // Most recent result wins: blank lines out, then bottom-up.
    let lines: Vec<&str> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .rev()
        .collect();

    let mut result = ParsedOutput::default();

    // Strategy 1: `real 0m3.123s` from the `time` command.
    for line in &lines {
        if let Some(caps) = TIME_PATTERN_REAL.captures(line) {
            let minutes: u32 = caps[1].parse().unwrap_or(0);
            let seconds: f64 = caps[2].parse().unwrap_or(0.0);
            result.time_ms = Some((f64::from(minutes) * 60.0 + seconds) * 1000.0);
            result.time_formatted = Some(format!("{minutes}m{seconds}s"));
            break;
        }
    }

    // Strategy 2: a bare `3.123s` / `3.123 seconds`, only if strategy 1
    // found nothing. Lines mentioning "version" are skipped so a language
    // banner like `Python 3.10.12` is not misread as a duration.
    if result.time_ms.is_none() {
        for line in &lines {
            if line.to_lowercase().contains("version") {
                continue;
            }
            if let Some(caps) = TIME_PATTERN_GENERIC.captures(line) {
                let seconds: f64 = caps[1].parse().unwrap_or(0.0);
                result.time_ms = Some(seconds * 1000.0);
                result.time_formatted = Some(format!("{}s", &caps[1]));
                break;
            }
        }
    }

    // Strategy 3: `prime count: 42` (or any "prime...: n" phrasing),
    // independent of whether a duration was found.
    for line in &lines {
        if let Some(caps) = PRIME_PATTERN.captures(line) {
            result.prime_count = caps[1].parse().ok();
            break;
        }
    }

    result
}
