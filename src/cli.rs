// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `langbench`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "langbench",
    version,
    about = "Benchmark-showcase server: runs language benchmarks on demand and streams their progress.",
    long_about = None
)]
pub struct CliArgs {
    /// Port to listen on.
    ///
    /// If omitted, the `PORT` environment variable is used, then 3000.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Directory containing the benchmark launcher scripts
    /// (`run.sh` / `run.ps1`).
    #[arg(long, value_name = "DIR", default_value = "scripts")]
    pub scripts_dir: String,

    /// Maximum number of benchmarks executing at once.
    #[arg(long, value_name = "N", default_value_t = crate::runner::MAX_CONCURRENT_BENCHMARKS)]
    pub max_concurrent: usize,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LANGBENCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
