// src/runner/admission.rs

//! Bounded-concurrency admission for benchmark jobs.
//!
//! At most `limit` jobs execute at once; everyone else waits in strict FIFO
//! order. The shared counters live behind a single mutex, and the freed slot
//! is handed directly from the releasing job to the longest-waiting caller
//! (pop head, transfer, wake) so the running count never exceeds the limit
//! and never two waiters wake for one release.
//!
//! Admission is expressed as an RAII [`SlotGuard`]: dropping the guard *is*
//! the release, so queue progression happens on every exit path of a job,
//! including panics and timeouts. The guard itself travels through the wakeup
//! channel; if a queued caller disappeared while waiting (client disconnect),
//! the send fails, the slot is reclaimed on the spot and re-offered to the
//! next waiter instead of leaking.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::oneshot;
use tracing::debug;

use crate::events::{ProgressEvent, ProgressSender};
use crate::language::Language;

/// Shared admission state for all benchmark jobs.
#[derive(Debug)]
pub struct AdmissionQueue {
    limit: usize,
    state: Mutex<AdmissionState>,
}

#[derive(Debug)]
struct AdmissionState {
    /// Languages currently executing; `running.len()` is the running count.
    running: Vec<Language>,
    /// Blocked callers, head = longest waiting.
    waiters: VecDeque<Waiter>,
}

#[derive(Debug)]
struct Waiter {
    language: Language,
    slot_tx: oneshot::Sender<SlotGuard>,
}

/// Point-in-time snapshot of the queue, served by `/api/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStatus {
    pub running: Vec<Language>,
    pub queued: usize,
    #[serde(rename = "maxConcurrent")]
    pub max_concurrent: usize,
    pub available: usize,
}

impl AdmissionQueue {
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "concurrency limit must be at least 1");
        Self {
            limit,
            state: Mutex::new(AdmissionState {
                running: Vec::new(),
                waiters: VecDeque::new(),
            }),
        }
    }

    /// Admit a job, blocking while all slots are taken.
    ///
    /// If no slot is free, a `queued` event with the 1-based queue position
    /// (a snapshot at enqueue time, not updated later) is emitted before
    /// waiting. The returned guard releases the slot on drop.
    pub async fn admit(self: &Arc<Self>, language: Language, progress: &ProgressSender) -> SlotGuard {
        let (position, slot_rx) = {
            let mut state = self.state.lock().expect("admission state poisoned");

            if state.running.len() < self.limit {
                state.running.push(language);
                return SlotGuard::new(Arc::clone(self), language);
            }

            let (slot_tx, slot_rx) = oneshot::channel();
            state.waiters.push_back(Waiter { language, slot_tx });
            (state.waiters.len(), slot_rx)
        };

        debug!(language = %language, position, "all slots taken; queueing job");
        progress.emit(ProgressEvent::Queued { position }).await;

        // The sender lives in our own state until a release hands the slot
        // over, and we keep the queue alive through the Arc, so the channel
        // cannot close without a value.
        slot_rx
            .await
            .expect("admission queue dropped a waiter without handing over a slot")
    }

    /// Current queue snapshot; no side effects.
    pub fn status(&self) -> QueueStatus {
        let state = self.state.lock().expect("admission state poisoned");
        QueueStatus {
            running: state.running.clone(),
            queued: state.waiters.len(),
            max_concurrent: self.limit,
            available: self.limit - state.running.len(),
        }
    }

    /// Release one slot and hand it to the longest-waiting caller, if any.
    ///
    /// Only called from `SlotGuard::drop`.
    fn release(self: &Arc<Self>, language: Language) {
        let mut state = self.state.lock().expect("admission state poisoned");
        remove_one(&mut state.running, language);

        while let Some(waiter) = state.waiters.pop_front() {
            // Atomic handoff: the slot is re-taken before the waiter wakes,
            // so the running count never dips while a wakeup is in flight.
            state.running.push(waiter.language);
            let guard = SlotGuard::new(Arc::clone(self), waiter.language);

            match waiter.slot_tx.send(guard) {
                Ok(()) => {
                    debug!(language = %waiter.language, "slot handed to next waiter");
                    return;
                }
                Err(mut unclaimed) => {
                    // The waiting caller is gone; take the slot back and try
                    // the next one. Disarm first: dropping an armed guard
                    // here would re-enter release under the lock.
                    unclaimed.armed = false;
                    remove_one(&mut state.running, unclaimed.language);
                    debug!(
                        language = %unclaimed.language,
                        "queued caller gone before wakeup; offering slot to next waiter"
                    );
                }
            }
        }
    }
}

fn remove_one(running: &mut Vec<Language>, language: Language) {
    if let Some(idx) = running.iter().position(|l| *l == language) {
        running.remove(idx);
    }
}

/// An admitted job's hold on one concurrency slot.
///
/// Dropping the guard decrements the running count and wakes the next waiter.
#[derive(Debug)]
pub struct SlotGuard {
    queue: Arc<AdmissionQueue>,
    language: Language,
    armed: bool,
}

impl SlotGuard {
    fn new(queue: Arc<AdmissionQueue>, language: Language) -> Self {
        Self {
            queue,
            language,
            armed: true,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if self.armed {
            self.queue.release(self.language);
        }
    }
}
