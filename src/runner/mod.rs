// src/runner/mod.rs

//! Benchmark execution core.
//!
//! This module owns everything between "a validated language token arrived"
//! and "the caller's progress stream saw a terminal event":
//!
//! - [`admission`] — bounded concurrency with a FIFO wait queue.
//! - [`launcher`] — the one platform-conditional seam (bash vs powershell).
//! - [`executor`] — process spawn, output streaming, timeout, heartbeat.
//! - [`parser`] — extracting timing/metrics from unstructured script output.
//!
//! [`run_benchmark`] is the entry point the HTTP layer calls once per
//! request.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ExecutionError;
use crate::events::ProgressSender;
use crate::language::Language;

pub mod admission;
pub mod executor;
pub mod launcher;
pub mod parser;

pub use admission::{AdmissionQueue, QueueStatus, SlotGuard};
pub use parser::BenchResult;

/// How many benchmarks may execute at once.
pub const MAX_CONCURRENT_BENCHMARKS: usize = 3;

/// Per-job wall-clock budget.
pub const BENCHMARK_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How often a silent-but-alive job emits a keep-alive event.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Knobs for the execution core.
///
/// Production uses the defaults; tests shrink the timers to keep runs fast.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding `run.sh` / `run.ps1`.
    pub scripts_dir: PathBuf,
    pub timeout: Duration,
    pub heartbeat_interval: Duration,
}

impl RunnerConfig {
    pub fn new(scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
            timeout: BENCHMARK_TIMEOUT,
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}

/// Run one benchmark end to end: admit (possibly queueing), execute, release.
///
/// The slot guard is held across the execution and dropped on every exit
/// path, so a failed or timed-out job still lets the next waiter in.
pub async fn run_benchmark(
    queue: &Arc<AdmissionQueue>,
    config: &RunnerConfig,
    language: Language,
    progress: &ProgressSender,
) -> Result<BenchResult, ExecutionError> {
    let slot = queue.admit(language, progress).await;
    let result = executor::execute(config, language, progress).await;
    drop(slot);
    result
}
