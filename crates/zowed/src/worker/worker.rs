// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One supervised worker: a tokio task, its request queue, a state cell,
//! and a heartbeat (spec.md §3/§4.5 "Worker").

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::rpc::RpcServer;

use super::request::RequestMetadata;
use super::state::{AtomicWorkerState, WorkerState};

pub type WorkerId = usize;

/// A running worker: its identity, state, current in-flight request, and
/// the queue feeding its task loop. Shared via `Arc` between the pool and
/// the task itself.
///
/// The queue is a plain `Mutex<VecDeque<_>>` plus a `Notify` rather than an
/// mpsc channel, so [`super::pool::WorkerPool::replace_worker`] can drain it
/// directly from outside the task (spec.md §4.6 "Drain" step) — an mpsc
/// receiver is only readable from the task that owns it.
pub struct Worker {
    pub id: WorkerId,
    state: AtomicWorkerState,
    last_heartbeat: Mutex<Instant>,
    current_request: Mutex<Option<RequestMetadata>>,
    queue: Mutex<VecDeque<RequestMetadata>>,
    queue_notify: Notify,
    closed: AtomicBool,
}

impl Worker {
    pub fn state(&self) -> WorkerState {
        self.state.load()
    }

    pub fn last_heartbeat(&self) -> Instant {
        *self.last_heartbeat.lock()
    }

    /// Push a request onto this worker's queue. Returns `false` if the
    /// queue has already been closed (stop requested or replaced).
    pub fn enqueue(&self, metadata: RequestMetadata) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        self.queue.lock().push_back(metadata);
        self.queue_notify.notify_one();
        true
    }

    /// Take the in-flight request, if any (used by the pool's fault-path
    /// recovery; leaves `None` behind).
    pub fn take_current_request(&self) -> Option<RequestMetadata> {
        self.current_request.lock().take()
    }

    /// Snapshot the in-flight request without removing it (used by the
    /// timeout path, which needs the raw JSON for `send_timeout_error` but
    /// must *not* recover the request into the pending queue).
    pub fn peek_current_request(&self) -> Option<RequestMetadata> {
        self.current_request.lock().clone()
    }

    /// Atomically take the entire pending queue, leaving it empty
    /// (spec.md §4.6 "Drain").
    pub fn drain_queue(&self) -> VecDeque<RequestMetadata> {
        std::mem::take(&mut *self.queue.lock())
    }

    /// Close the queue and wake the task loop so it exits once it notices
    /// (spec.md §4.5 "Idle/Running -> Exited on stop()"). Idempotent.
    pub fn close_queue(&self) {
        self.closed.store(true, Ordering::Release);
        self.queue_notify.notify_one();
    }
}

/// A spawned worker plus the handle needed to join it.
pub struct WorkerHandle {
    pub worker: Arc<Worker>,
    pub join: JoinHandle<()>,
}

/// Spawn a worker task. `on_idle` is called with this worker's id every
/// time it transitions back to `Idle` (construction included), so the pool
/// can push it onto the ready set without the worker needing to know the
/// ready set's shape.
pub fn spawn(
    id: WorkerId,
    dispatcher_server: Arc<RpcServer>,
    on_idle: Arc<dyn Fn(WorkerId) + Send + Sync>,
) -> WorkerHandle {
    let worker = Arc::new(Worker {
        id,
        state: AtomicWorkerState::new(WorkerState::Starting),
        last_heartbeat: Mutex::new(Instant::now()),
        current_request: Mutex::new(None),
        queue: Mutex::new(VecDeque::new()),
        queue_notify: Notify::new(),
        closed: AtomicBool::new(false),
    });

    let task_worker = worker.clone();
    let join = tokio::spawn(async move {
        task_worker.state.store(WorkerState::Idle);
        on_idle(task_worker.id);

        loop {
            let metadata = match next_request(&task_worker).await {
                Some(m) => m,
                None => break,
            };

            task_worker.state.store(WorkerState::Running);
            *task_worker.last_heartbeat.lock() = Instant::now();
            *task_worker.current_request.lock() = Some(metadata.clone());

            let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
                dispatcher_server.process_request(&metadata.raw_json);
            }));

            match result {
                Ok(()) => {
                    task_worker.current_request.lock().take();
                    task_worker.state.store(WorkerState::Idle);
                    on_idle(task_worker.id);
                }
                Err(payload) => {
                    tracing::error!(
                        worker_id = task_worker.id,
                        panic = %panic_message(&payload),
                        "worker handler panicked; marking worker faulted"
                    );
                    task_worker.state.store(WorkerState::Faulted);
                    return;
                }
            }
        }
        task_worker.state.store(WorkerState::Exited);
    });

    WorkerHandle { worker, join }
}

/// Wait until a request is available or the queue is closed with nothing
/// left to drain.
async fn next_request(worker: &Worker) -> Option<RequestMetadata> {
    loop {
        if let Some(metadata) = worker.queue.lock().pop_front() {
            return Some(metadata);
        }
        if worker.closed.load(Ordering::Acquire) {
            return None;
        }
        worker.queue_notify.notified().await;
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
