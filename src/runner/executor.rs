// src/runner/executor.rs

//! Runs one benchmark script as a child process.
//!
//! Exactly one external process per call, and no process, reader, or timer
//! survives the call on any path:
//!
//! - stdout is read incrementally; every chunk is accumulated *and* forwarded
//!   at once as a `running` event (streaming is the point).
//! - stderr is accumulated on a side task and only surfaces in error
//!   diagnostics.
//! - a heartbeat tick emits a content-free event while the process is alive,
//!   so proxies don't idle out long or silent benchmarks.
//! - the timeout starts at spawn; if it fires first, the process is killed
//!   and the job fails with `ExecutionError::Timeout`.
//!
//! Whatever happens, the caller's progress stream receives exactly one
//! terminal `success` or `error` event.

use std::process::Stdio;

use tokio::io::{AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{Instant, interval_at, sleep};
use tracing::{debug, info, warn};

use crate::errors::ExecutionError;
use crate::events::{ProgressEvent, ProgressSender};
use crate::language::Language;
use crate::runner::RunnerConfig;
use crate::runner::launcher::resolve_launcher;
use crate::runner::parser::{BenchResult, parse_output};

const STDOUT_CHUNK_SIZE: usize = 4096;

/// Spawn the benchmark script for `language`, stream its output, and resolve
/// with the parsed result.
///
/// Emits the terminal `success`/`error` event itself, so the caller only has
/// to deal with the returned `Result`.
pub async fn execute(
    config: &RunnerConfig,
    language: Language,
    progress: &ProgressSender,
) -> Result<BenchResult, ExecutionError> {
    match run_process(config, language, progress).await {
        Ok((result, full_output)) => {
            info!(
                language = %language,
                time_ms = ?result.time,
                prime_count = ?result.prime_count,
                "benchmark succeeded"
            );
            progress
                .emit(ProgressEvent::Success {
                    language,
                    result: result.clone(),
                    full_output,
                })
                .await;
            Ok(result)
        }
        Err(err) => {
            warn!(language = %language, error = %err, "benchmark failed");
            progress
                .emit(ProgressEvent::Error {
                    language,
                    message: err.to_string(),
                })
                .await;
            Err(err)
        }
    }
}

async fn run_process(
    config: &RunnerConfig,
    language: Language,
    progress: &ProgressSender,
) -> Result<(BenchResult, String), ExecutionError> {
    let launcher = resolve_launcher(&config.scripts_dir, language);
    debug!(
        language = %language,
        program = launcher.program,
        args = ?launcher.args,
        "spawning benchmark process"
    );

    let mut child = Command::new(launcher.program)
        .args(&launcher.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Backstop: if this future is dropped mid-run, the OS process must
        // not outlive it.
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExecutionError::Spawn { language, source })?;

    // Both pipes exist because we asked for them above.
    let mut stdout = child
        .stdout
        .take()
        .expect("child stdout was configured as piped");
    let stderr = child
        .stderr
        .take()
        .expect("child stderr was configured as piped");

    progress.emit(ProgressEvent::starting(language)).await;

    // stderr is not streamed live; drain it on the side so the pipe can't
    // fill up, and keep it for diagnostics.
    let stderr_task = tokio::spawn(async move {
        let mut buf = String::new();
        let _ = BufReader::new(stderr).read_to_string(&mut buf).await;
        buf
    });

    // Timeout clock starts at spawn; the first heartbeat fires one full
    // interval in.
    let deadline = sleep(config.timeout);
    tokio::pin!(deadline);
    let mut heartbeat = interval_at(
        Instant::now() + config.heartbeat_interval,
        config.heartbeat_interval,
    );

    let mut full_output = String::new();
    let mut chunk = [0u8; STDOUT_CHUNK_SIZE];
    let mut stdout_open = true;

    let status = loop {
        tokio::select! {
            read = stdout.read(&mut chunk), if stdout_open => match read {
                Ok(0) => stdout_open = false,
                Ok(n) => {
                    let text = String::from_utf8_lossy(&chunk[..n]).into_owned();
                    full_output.push_str(&text);
                    progress
                        .emit(ProgressEvent::Running { language, output: text })
                        .await;
                }
                Err(err) => {
                    warn!(language = %language, error = %err, "stdout read failed");
                    stdout_open = false;
                }
            },

            status = child.wait(), if !stdout_open => {
                break status.map_err(|source| ExecutionError::Wait { language, source })?;
            }

            _ = heartbeat.tick() => {
                progress.emit(ProgressEvent::heartbeat_now()).await;
            }

            _ = &mut deadline => {
                warn!(
                    language = %language,
                    timeout = ?config.timeout,
                    "benchmark exceeded time budget; killing process"
                );
                if let Err(err) = child.kill().await {
                    warn!(language = %language, error = %err, "failed to kill timed-out process");
                }
                return Err(ExecutionError::Timeout(config.timeout));
            }
        }
    };
    // Dropping the timers here cancels them; nothing ticks past this point.

    let stderr_output = stderr_task.await.unwrap_or_default();

    if status.success() {
        let parsed = parse_output(&full_output);
        Ok((BenchResult::new(language, parsed), full_output))
    } else {
        let message = if stderr_output.trim().is_empty() {
            "Benchmark failed".to_string()
        } else {
            stderr_output
        };
        Err(ExecutionError::NonZeroExit {
            language,
            code: status.code(),
            message,
        })
    }
}
