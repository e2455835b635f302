// src/events.rs

//! Progress channel between a running job and the caller that requested it.
//!
//! Each benchmark job gets its own [`ProgressSender`]; the HTTP layer holds
//! the receiving end and forwards every event as a server-sent message. The
//! core makes no assumption about the transport beyond "serialize this tagged
//! event".
//!
//! Ordering contract per job: at most one `queued`, then one `starting`,
//! then zero or more `running` / `heartbeat` interleaved in real time, then
//! exactly one terminal `success` or `error`.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::language::Language;
use crate::runner::parser::BenchResult;

/// A single lifecycle event for one benchmark job.
///
/// The serde representation is the SSE wire format: a `status` tag plus
/// camelCase payload fields, e.g.
/// `{"status":"running","language":"rust","output":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// The job could not start immediately; `position` is a 1-based snapshot
    /// of its place in the wait queue at enqueue time.
    Queued { position: usize },

    /// The benchmark process has been spawned.
    Starting { language: Language, message: String },

    /// A chunk of the process's stdout, forwarded as soon as it was read.
    Running { language: Language, output: String },

    /// Synthetic keep-alive tick; carries nothing but an epoch-ms timestamp
    /// and must not be mistaken for real output.
    Heartbeat { timestamp: i64 },

    /// Terminal: the process exited zero. Carries the parsed result and the
    /// full accumulated stdout.
    Success {
        language: Language,
        result: BenchResult,
        #[serde(rename = "fullOutput")]
        full_output: String,
    },

    /// Terminal: the job failed (spawn failure, non-zero exit, or timeout).
    Error { language: Language, message: String },
}

impl ProgressEvent {
    pub fn starting(language: Language) -> Self {
        ProgressEvent::Starting {
            language,
            message: format!("Starting {language} benchmark..."),
        }
    }

    pub fn heartbeat_now() -> Self {
        ProgressEvent::Heartbeat {
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// True for `success` and `error`, the two events that end a job's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Success { .. } | ProgressEvent::Error { .. }
        )
    }
}

/// Sending half of a job's progress channel.
///
/// A gone receiver (client disconnected mid-stream) is not an error for the
/// job: the event is dropped and the benchmark runs to completion anyway.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressSender {
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Create a sender together with its receiving end (mainly for tests;
    /// the HTTP layer builds its own channel with a transport-sized buffer).
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    pub async fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("progress receiver gone; dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_matches_sse_payloads() {
        let queued = ProgressEvent::Queued { position: 2 };
        assert_eq!(
            serde_json::to_string(&queued).unwrap(),
            r#"{"status":"queued","position":2}"#
        );

        let starting = ProgressEvent::starting(Language::Go);
        assert_eq!(
            serde_json::to_string(&starting).unwrap(),
            r#"{"status":"starting","language":"go","message":"Starting go benchmark..."}"#
        );

        let running = ProgressEvent::Running {
            language: Language::Rust,
            output: "prime count: 42\n".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&running).unwrap(),
            r#"{"status":"running","language":"rust","output":"prime count: 42\n"}"#
        );

        let error = ProgressEvent::Error {
            language: Language::C,
            message: "Benchmark failed".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&error).unwrap(),
            r#"{"status":"error","language":"c","message":"Benchmark failed"}"#
        );
    }

    #[test]
    fn heartbeat_serializes_with_timestamp_only() {
        let hb = ProgressEvent::Heartbeat { timestamp: 1700000000000 };
        assert_eq!(
            serde_json::to_string(&hb).unwrap(),
            r#"{"status":"heartbeat","timestamp":1700000000000}"#
        );
    }

    #[test]
    fn terminal_classification() {
        assert!(ProgressEvent::Error {
            language: Language::C,
            message: String::new()
        }
        .is_terminal());
        assert!(!ProgressEvent::Queued { position: 1 }.is_terminal());
        assert!(!ProgressEvent::heartbeat_now().is_terminal());
    }
}
