// src/lib.rs

pub mod cli;
pub mod errors;
pub mod events;
pub mod language;
pub mod logging;
pub mod runner;
pub mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::runner::{AdmissionQueue, RunnerConfig};
use crate::server::AppState;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the admission queue and runner configuration
/// - the axum router (SSE run endpoint + status endpoint)
/// - Ctrl-C handling for graceful shutdown
pub async fn run(args: CliArgs) -> Result<()> {
    if args.max_concurrent == 0 {
        anyhow::bail!("--max-concurrent must be at least 1");
    }

    let port = resolve_port(&args);
    let scripts_dir = PathBuf::from(&args.scripts_dir);

    let state = AppState {
        queue: Arc::new(AdmissionQueue::new(args.max_concurrent)),
        config: Arc::new(RunnerConfig::new(scripts_dir)),
    };

    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding to port {port}"))?;

    info!(port, max_concurrent = args.max_concurrent, "langbench server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("server exiting");
    Ok(())
}

/// Port resolution: `--port`, then the `PORT` env var, then 3000.
fn resolve_port(args: &CliArgs) -> u16 {
    args.port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(3000)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for Ctrl+C: {e}");
        return;
    }
    info!("shutdown requested");
}
