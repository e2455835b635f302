//! Helpers for collecting progress events in tests.

use tokio::sync::mpsc;

use langbench::events::ProgressEvent;

/// Drain a progress channel until the sender side closes, returning every
/// event in delivery order.
pub async fn collect_events(mut rx: mpsc::Receiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// Event-kind summary, handy for asserting ordering without matching on
/// payloads.
pub fn kinds(events: &[ProgressEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|e| match e {
            ProgressEvent::Queued { .. } => "queued",
            ProgressEvent::Starting { .. } => "starting",
            ProgressEvent::Running { .. } => "running",
            ProgressEvent::Heartbeat { .. } => "heartbeat",
            ProgressEvent::Success { .. } => "success",
            ProgressEvent::Error { .. } => "error",
        })
        .collect()
}
