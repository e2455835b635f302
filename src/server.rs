// src/server.rs

//! HTTP boundary: axum router exposing the execution core.
//!
//! - `GET /api/run/{language}` — run a benchmark, streaming progress events
//!   over Server-Sent Events. The language path segment is validated against
//!   the whitelist *before* anything reaches the process layer.
//! - `GET /api/status` — point-in-time queue snapshot as JSON.
//!
//! A client that disconnects mid-stream does not cancel its benchmark: the
//! job keeps running, its events are dropped, and the slot is released
//! normally when it finishes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::events::{ProgressEvent, ProgressSender};
use crate::language::Language;
use crate::runner::{run_benchmark, AdmissionQueue, QueueStatus, RunnerConfig};

/// How many events may pile up between the job and the SSE writer before the
/// job's sends await.
const EVENT_BUFFER: usize = 32;

#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<AdmissionQueue>,
    pub config: Arc<RunnerConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/run/{language}", get(run_language))
        .route("/api/status", get(queue_status))
        .with_state(state)
}

/// GET /api/status
async fn queue_status(State(state): State<AppState>) -> Json<QueueStatus> {
    Json(state.queue.status())
}

/// GET /api/run/{language}
async fn run_language(State(state): State<AppState>, Path(language): Path<String>) -> Response {
    let language: Language = match language.parse() {
        Ok(lang) => lang,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid language" })),
            )
                .into_response();
        }
    };

    let (progress, mut events) = ProgressSender::channel(EVENT_BUFFER);

    // The job runs detached from the connection on purpose: a dropped SSE
    // stream must not kill a benchmark that is already executing.
    let queue = Arc::clone(&state.queue);
    let config = Arc::clone(&state.config);
    tokio::spawn(async move {
        let _ = run_benchmark(&queue, &config, language, &progress).await;
    });

    // Bridge progress events onto the SSE stream, closing with the
    // transport-level `completed` marker after a successful run.
    let (sse_tx, sse_rx) = mpsc::channel::<Result<Event, Infallible>>(EVENT_BUFFER);
    tokio::spawn(async move {
        let mut succeeded = false;
        while let Some(event) = events.recv().await {
            if matches!(event, ProgressEvent::Success { .. }) {
                succeeded = true;
            }
            let sse_event = match Event::default().json_data(&event) {
                Ok(ev) => ev,
                Err(err) => {
                    warn!(error = %err, "failed to serialize progress event");
                    continue;
                }
            };
            if sse_tx.send(Ok(sse_event)).await.is_err() {
                debug!(language = %language, "SSE client gone; job continues unattached");
                return;
            }
        }
        if succeeded {
            let _ = sse_tx
                .send(Ok(Event::default().data(r#"{"status":"completed"}"#)))
                .await;
        }
    });

    Sse::new(ReceiverStream::new(sse_rx)).into_response()
}
