// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

//! Shared helpers for the end-to-end scenario tests in spec.md §8.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use zowed::dispatch::Dispatcher;
use zowed::rpc::RpcServer;
use zowed::worker::WorkerPool;

/// An in-memory sink `RpcServer` can write to, shared with the test so it
/// can inspect emitted lines without touching the real process stdout.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far, in emission order.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Build a pool of `num_workers` workers wired to a dispatcher the test
/// populates, plus the buffer its `RpcServer` writes lines into.
pub fn pool_with(
    num_workers: usize,
    timeout: Duration,
    register: impl FnOnce(&Dispatcher),
) -> (Arc<WorkerPool>, SharedBuffer) {
    let dispatcher = Dispatcher::new();
    register(&dispatcher);
    let buffer = SharedBuffer::new();
    let server = Arc::new(RpcServer::with_writer(Arc::new(dispatcher), buffer.clone()));
    let pool = WorkerPool::new(num_workers, server, timeout);
    (pool, buffer)
}

/// Poll `check` until it returns true or `timeout` elapses. Returns whether
/// it converged.
pub async fn wait_until(mut check: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Parse every buffered line as JSON, for assertions that don't care about
/// exact key order.
pub fn parsed_lines(buffer: &SharedBuffer) -> Vec<serde_json::Value> {
    buffer.lines().iter().filter_map(|line| serde_json::from_str(line).ok()).collect()
}
