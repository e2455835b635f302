// tests/queue_progression.rs

//! End-to-end admission tests: real scripts, bounded slots, FIFO wakeups.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use langbench::events::{ProgressEvent, ProgressSender};
use langbench::language::Language;
use langbench::runner::{run_benchmark, AdmissionQueue, RunnerConfig};
use langbench_test_utils::events::{collect_events, kinds};
use langbench_test_utils::scripts::{sleeping_script, success_script, ScriptFixture};
use langbench_test_utils::{init_tracing, with_timeout};

const EVENT_BUFFER: usize = 256;

/// Spawn `run_benchmark` as its own task, returning the progress receiver
/// and the join handle — the shape the HTTP layer uses.
fn spawn_job(
    queue: &Arc<AdmissionQueue>,
    config: &RunnerConfig,
    language: Language,
) -> (
    mpsc::Receiver<ProgressEvent>,
    tokio::task::JoinHandle<bool>,
) {
    let (progress, rx) = ProgressSender::channel(EVENT_BUFFER);
    let queue = Arc::clone(queue);
    let config = config.clone();
    let handle = tokio::spawn(async move {
        run_benchmark(&queue, &config, language, &progress)
            .await
            .is_ok()
    });
    (rx, handle)
}

#[tokio::test]
async fn second_job_queues_and_runs_after_first() {
    init_tracing();

    let slow = sleeping_script(0.5);
    let fast = success_script();
    let slow_config = RunnerConfig::new(slow.dir());
    let fast_config = RunnerConfig::new(fast.dir());
    let queue = Arc::new(AdmissionQueue::new(1));

    let (rx1, job1) = spawn_job(&queue, &slow_config, Language::Rust);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let status = queue.status();
    assert_eq!(status.running, vec![Language::Rust]);
    assert_eq!(status.available, 0);
    assert_eq!(status.queued, 0);

    let (rx2, job2) = spawn_job(&queue, &fast_config, Language::Python);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.status().queued, 1);

    assert!(with_timeout(job1).await.unwrap());
    assert!(with_timeout(job2).await.unwrap());

    let events1 = collect_events(rx1).await;
    let events2 = collect_events(rx2).await;

    // Job 1 never queued; job 2 observed position 1, then ran to success.
    assert_eq!(kinds(&events1), vec!["starting", "success"]);
    assert_eq!(events2.first(), Some(&ProgressEvent::Queued { position: 1 }));
    assert_eq!(kinds(&events2).last(), Some(&"success"));

    let status = queue.status();
    assert!(status.running.is_empty());
    assert_eq!(status.available, 1);
}

#[tokio::test]
async fn failed_job_still_releases_its_slot() {
    init_tracing();

    let slow_failure = ScriptFixture::new("sleep 0.3\necho \"doomed\" >&2\nexit 2");
    let fast = success_script();
    let fail_config = RunnerConfig::new(slow_failure.dir());
    let fast_config = RunnerConfig::new(fast.dir());
    let queue = Arc::new(AdmissionQueue::new(1));

    let (rx1, job1) = spawn_job(&queue, &fail_config, Language::Java);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let (rx2, job2) = spawn_job(&queue, &fast_config, Language::Go);

    assert!(!with_timeout(job1).await.unwrap(), "job 1 must fail");
    assert!(
        with_timeout(job2).await.unwrap(),
        "a failed job must not starve the queue"
    );

    let events1 = collect_events(rx1).await;
    let events2 = collect_events(rx2).await;

    assert!(matches!(events1.last(), Some(ProgressEvent::Error { .. })));
    assert_eq!(events2.first(), Some(&ProgressEvent::Queued { position: 1 }));
    assert!(matches!(events2.last(), Some(ProgressEvent::Success { .. })));
}

#[tokio::test]
async fn concurrency_never_exceeds_limit_and_positions_follow_arrival() {
    init_tracing();

    const LIMIT: usize = 2;
    const JOBS: usize = 4;

    let script = sleeping_script(0.3);
    let config = RunnerConfig::new(script.dir());
    let queue = Arc::new(AdmissionQueue::new(LIMIT));

    // All jobs share one progress channel, so the collected sequence is the
    // true emission order across the whole run.
    let (progress, rx) = ProgressSender::channel(1024);
    let languages = [Language::C, Language::Cpp, Language::Rust, Language::Go];

    let mut jobs = Vec::new();
    for language in languages {
        let queue = Arc::clone(&queue);
        let config = config.clone();
        let progress = progress.clone();
        jobs.push(tokio::spawn(async move {
            run_benchmark(&queue, &config, language, &progress)
                .await
                .is_ok()
        }));
        // Deterministic arrival order.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    for job in jobs {
        assert!(with_timeout(job).await.unwrap());
    }
    drop(progress);
    let events = collect_events(rx).await;

    // Replay the log: the number of jobs between `starting` and a terminal
    // event must never exceed the slot count.
    let mut running = 0usize;
    let mut peak = 0usize;
    let mut queued_positions = Vec::new();
    for event in &events {
        match event {
            ProgressEvent::Starting { .. } => {
                running += 1;
                peak = peak.max(running);
            }
            ProgressEvent::Success { .. } | ProgressEvent::Error { .. } => running -= 1,
            ProgressEvent::Queued { position } => queued_positions.push(*position),
            _ => {}
        }
    }
    assert!(
        peak <= LIMIT,
        "observed {peak} concurrent jobs with a limit of {LIMIT}"
    );

    // Jobs beyond the limit queue with strictly increasing positions in
    // arrival order.
    assert_eq!(queued_positions, vec![1, 2]);
    assert_eq!(queue.status().available, LIMIT);
}
