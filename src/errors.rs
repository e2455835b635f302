// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::language::Language;

#[derive(Error, Debug)]
pub enum LangbenchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid language: {0}")]
    InvalidLanguage(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a single benchmark job failed.
///
/// Every variant is terminal for that job: there is no retry, and the
/// admission slot is released regardless (the slot guard takes care of that).
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The launcher process could not be started at all.
    #[error("failed to spawn benchmark process for {language}: {source}")]
    Spawn {
        language: Language,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited non-zero; carries whatever it wrote to
    /// stderr (or a generic message when stderr was empty).
    #[error("{message}")]
    NonZeroExit {
        language: Language,
        code: Option<i32>,
        message: String,
    },

    /// The process outlived the time budget and was killed.
    #[error("Benchmark timeout ({0:?} exceeded)")]
    Timeout(std::time::Duration),

    /// Waiting on the child process itself failed.
    #[error("failed waiting for benchmark process for {language}: {source}")]
    Wait {
        language: Language,
        #[source]
        source: std::io::Error,
    },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LangbenchError>;
