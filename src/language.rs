// src/language.rs

//! The fixed whitelist of benchmarkable languages.
//!
//! A [`Language`] is the only piece of request data that ever reaches the
//! process layer, and it can only be obtained by parsing against this closed
//! set. Anything else is rejected at the HTTP boundary with
//! `LangbenchError::InvalidLanguage` before a process is ever considered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::LangbenchError;

/// A whitelisted language token.
///
/// Serializes as the lowercase token used by the benchmark scripts
/// (e.g. `python_codon`), which is also the SSE wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Assembly,
    C,
    Cpp,
    Rust,
    Go,
    Julia,
    Java,
    Nodejs,
    Csharp,
    Dart,
    PythonCodon,
    Pascal,
    Python,
    Php,
    R,
    Ruby,
    Chap,
    Zig,
    Fortran,
    Nim,
}

impl Language {
    /// All supported languages, in the order they appear on the site.
    pub const ALL: [Language; 20] = [
        Language::Assembly,
        Language::C,
        Language::Cpp,
        Language::Rust,
        Language::Go,
        Language::Julia,
        Language::Java,
        Language::Nodejs,
        Language::Csharp,
        Language::Dart,
        Language::PythonCodon,
        Language::Pascal,
        Language::Python,
        Language::Php,
        Language::R,
        Language::Ruby,
        Language::Chap,
        Language::Zig,
        Language::Fortran,
        Language::Nim,
    ];

    /// The token passed to the benchmark script as its sole argument.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Assembly => "assembly",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Julia => "julia",
            Language::Java => "java",
            Language::Nodejs => "nodejs",
            Language::Csharp => "csharp",
            Language::Dart => "dart",
            Language::PythonCodon => "python_codon",
            Language::Pascal => "pascal",
            Language::Python => "python",
            Language::Php => "php",
            Language::R => "r",
            Language::Ruby => "ruby",
            Language::Chap => "chap",
            Language::Zig => "zig",
            Language::Fortran => "fortran",
            Language::Nim => "nim",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = LangbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str() == s)
            .ok_or_else(|| LangbenchError::InvalidLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.as_str().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert!("brainfuck".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
        // Tokens are case-sensitive, matching the HTTP route contract.
        assert!("Rust".parse::<Language>().is_err());
    }

    #[test]
    fn serde_representation_matches_token() {
        let json = serde_json::to_string(&Language::PythonCodon).unwrap();
        assert_eq!(json, "\"python_codon\"");
        let back: Language = serde_json::from_str("\"cpp\"").unwrap();
        assert_eq!(back, Language::Cpp);
    }
}
