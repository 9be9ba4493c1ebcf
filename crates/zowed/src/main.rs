// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process entry point: CLI parsing, logging/checksum init, pool
//! construction, the stdin request loop, and signal-driven shutdown
//! (spec.md §5/§6, SPEC_FULL.md §4.8).

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};

use zowed::cli::Cli;
use zowed::{Dispatcher, RpcServer, WorkerPool};

/// Stale-heartbeat threshold the monitor task uses to detect a stuck
/// worker (spec.md §3 "WorkerPool::timeout").
const WORKER_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    zowed::logging::init(cli.verbose);

    if let Err(e) = cli.validate() {
        tracing::error!(error = %e, "startup validation failed");
        return ExitCode::FAILURE;
    }

    // Real command families (`ds.*`, `jobs.*`, `uss.*`, `cmds.*`) are
    // external collaborators per spec.md §1 and are registered here by the
    // binary that embeds this crate; none are bundled with it.
    let dispatcher = Arc::new(Dispatcher::new());
    let server = Arc::new(RpcServer::new(dispatcher));

    let pool = WorkerPool::new(cli.num_workers, server.clone(), WORKER_TIMEOUT);
    pool.spawn_monitor();

    let checksums = zowed::checksums::load(std::path::Path::new("checksums.asc"));
    server.send_ready(checksums);

    if let Err(e) = run_until_shutdown(&pool).await {
        tracing::error!(error = %e, "failed to install signal handlers");
        return ExitCode::FAILURE;
    }
    pool.shutdown().await;

    ExitCode::SUCCESS
}

/// Race the stdin read loop against the signals that terminate the daemon
/// (spec.md §5: "Signals SIGHUP, SIGINT, SIGQUIT, SIGABRT, SIGTERM all
/// invoke shutdown() exactly once").
async fn run_until_shutdown(pool: &Arc<WorkerPool>) -> std::io::Result<()> {
    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigquit = signal(SignalKind::quit())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    // SIGABRT has no named constructor in tokio::signal::unix; 6 is its
    // stable raw value across Linux target families (resolved Open
    // Question, see DESIGN.md).
    let mut sigabrt = signal(SignalKind::from_raw(6))?;

    tokio::select! {
        _ = stdin_loop(pool) => {}
        _ = sighup.recv() => tracing::info!("received SIGHUP, shutting down"),
        _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
        _ = sigquit.recv() => tracing::info!("received SIGQUIT, shutting down"),
        _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        _ = sigabrt.recv() => tracing::info!("received SIGABRT, shutting down"),
    }
    Ok(())
}

/// Read newline-delimited JSON-RPC requests from stdin until EOF, handing
/// each non-empty line to the pool (spec.md §8: "An empty stdin line is
/// ignored").
async fn stdin_loop(pool: &Arc<WorkerPool>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                pool.distribute_request(trimmed.to_string()).await;
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "stdin read error, shutting down");
                break;
            }
        }
    }
}
