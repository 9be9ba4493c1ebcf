// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-size worker set, ready-set LRU, monitor task, and the replacement
//! policy (spec.md §3/§4.6 "WorkerPool").

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::rpc::RpcServer;

use super::request::RequestMetadata;
use super::state::WorkerState;
use super::worker::{self, WorkerHandle, WorkerId};

/// Why a worker was replaced, purely for logging (spec.md §4.6).
#[derive(Debug, Clone, Copy)]
enum ReplaceReason {
    Fault,
    Timeout,
}

/// The ordered set of idle, dispatch-eligible worker ids (spec.md §3
/// "ready"). FIFO pop gives least-recently-idle fairness.
#[derive(Default)]
struct ReadySet {
    ids: Mutex<VecDeque<WorkerId>>,
    notify: Notify,
}

impl ReadySet {
    /// Enqueue `id` unless it is already present (spec.md §3 invariant (a):
    /// "at most one worker entry per id in ready").
    fn push(&self, id: WorkerId) {
        let mut ids = self.ids.lock();
        if !ids.contains(&id) {
            ids.push_back(id);
        }
        drop(ids);
        self.notify.notify_one();
    }

    /// Remove `id` if present, without blocking (used when a worker is
    /// force-detached mid-tick and must not remain dispatch-eligible).
    fn remove(&self, id: WorkerId) {
        self.ids.lock().retain(|&existing| existing != id);
    }

    /// Pop the head, blocking until one is available or `shutting_down`
    /// becomes true.
    async fn pop(&self, shutting_down: &AtomicBool) -> Option<WorkerId> {
        loop {
            if let Some(id) = self.ids.lock().pop_front() {
                return Some(id);
            }
            if shutting_down.load(Ordering::Acquire) {
                return None;
            }
            self.notify.notified().await;
        }
    }

    fn len(&self) -> usize {
        self.ids.lock().len()
    }
}

/// Supervises a fixed number of workers: distributes requests over the
/// ready set, runs a monitor tick that detects faults and stale heartbeats,
/// and replaces misbehaving workers in place.
pub struct WorkerPool {
    slots: Vec<Mutex<WorkerHandle>>,
    ready: Arc<ReadySet>,
    server: Arc<RpcServer>,
    timeout: Duration,
    shutting_down: AtomicBool,
    shutdown_started: AtomicBool,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Construct a pool of `num_workers` workers, each running against
    /// `server`. Must be called from within a tokio runtime context (each
    /// worker is `tokio::spawn`ed immediately).
    pub fn new(num_workers: usize, server: Arc<RpcServer>, timeout: Duration) -> Arc<Self> {
        let ready = Arc::new(ReadySet::default());
        let slots = (0..num_workers)
            .map(|id| {
                let ready = ready.clone();
                Mutex::new(worker::spawn(id, server.clone(), Arc::new(move |wid| ready.push(wid))))
            })
            .collect();

        Arc::new(Self {
            slots,
            ready,
            server,
            timeout,
            shutting_down: AtomicBool::new(false),
            shutdown_started: AtomicBool::new(false),
            monitor: Mutex::new(None),
        })
    }

    pub fn num_workers(&self) -> usize {
        self.slots.len()
    }

    /// Number of workers currently idle and dispatch-eligible. Exposed for
    /// tests that assert the pool "returns to N ready workers" after a
    /// replacement cycle stabilizes.
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    /// Spawn the monitor task on the current runtime. The pool retains its
    /// `JoinHandle` and awaits it during [`Self::shutdown`], so the monitor
    /// is guaranteed quiesced before the pool returns (spec.md §4.6
    /// "Shutdown": "join the monitor thread").
    pub fn spawn_monitor(self: &Arc<Self>) {
        let pool = self.clone();
        let handle = tokio::spawn(async move { pool.monitor_loop().await });
        *self.monitor.lock() = Some(handle);
    }

    /// Entry point from the stdin loop: wrap `raw_json` as a fresh request
    /// and route it to a worker (spec.md §4.6 "Distribution").
    pub async fn distribute_request(&self, raw_json: String) {
        if self.shutting_down.load(Ordering::Acquire) {
            tracing::warn!("dropping request: pool is shutting down");
            return;
        }
        self.enqueue(RequestMetadata::new(raw_json)).await;
    }

    async fn enqueue(&self, metadata: RequestMetadata) {
        if metadata.is_poison_pill() {
            tracing::warn!(raw = %metadata.raw_json, "poison pill: max retries exceeded, dropping request");
            self.server.send_poison_pill_error(&metadata.raw_json);
            return;
        }

        let Some(id) = self.ready.pop(&self.shutting_down).await else {
            return;
        };

        let delivered = self.slots[id].lock().worker.enqueue(metadata.clone());
        if !delivered {
            // The worker at this slot was replaced between the ready-set
            // pop and the enqueue attempt; retry against whatever worker
            // now occupies the slot in the next monitor tick's wake, or
            // immediately if one is already ready.
            tracing::debug!(worker_id = id, "enqueue raced a replacement, retrying");
            Box::pin(self.enqueue(metadata)).await;
        }
    }

    async fn monitor_loop(&self) {
        let mut interval = tokio::time::interval(Duration::from_millis(500));
        loop {
            interval.tick().await;
            if self.shutting_down.load(Ordering::Acquire) {
                break;
            }
            for id in 0..self.slots.len() {
                self.check_worker(id).await;
                // A short backoff between replacement checks for
                // consecutive slots avoids hot-looping when several
                // workers fault in the same tick (spec.md §4.6).
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }
    }

    async fn check_worker(&self, id: WorkerId) {
        let (state, last_heartbeat) = {
            let slot = self.slots[id].lock();
            (slot.worker.state(), slot.worker.last_heartbeat())
        };
        match state {
            WorkerState::Faulted => {
                self.replace_worker(id, false, ReplaceReason::Fault).await;
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            WorkerState::Running if last_heartbeat.elapsed() > self.timeout => {
                self.replace_worker(id, true, ReplaceReason::Timeout).await;
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            _ => {}
        }
    }

    /// Retire the worker at `id`, recover its work, and install a fresh
    /// worker in the same slot (spec.md §4.6 "Replacement").
    async fn replace_worker(&self, id: WorkerId, force_detach: bool, reason: ReplaceReason) {
        tracing::info!(worker_id = id, ?reason, force_detach, "replacing worker");
        self.ready.remove(id);

        let (old_worker, old_join) = {
            let mut slot = self.slots[id].lock();
            let fresh = worker::spawn(
                id,
                self.server.clone(),
                Arc::new({
                    let ready = self.ready.clone();
                    move |wid| ready.push(wid)
                }),
            );
            let old = std::mem::replace(&mut *slot, fresh);
            (old.worker, old.join)
        };

        let mut pending = old_worker.drain_queue();

        if force_detach {
            if let Some(stuck) = old_worker.peek_current_request() {
                self.server.send_timeout_error(&stuck.raw_json, self.timeout.as_millis() as u64);
            }
            // Deliberately do not join: the stuck task keeps running and
            // is leaked, per spec.md §9 ("source leaks the OS thread on
            // timeout"). Its eventual write, if any, races harmlessly
            // against the response mutex (spec.md §8).
            drop(old_join);
        } else {
            if let Some(in_flight) = old_worker.take_current_request() {
                pending.push_front(in_flight.retried());
            }
            old_worker.close_queue();
            let _ = old_join.await;
        }

        for metadata in pending {
            self.enqueue(metadata).await;
        }
    }

    /// Idempotent: the first call drains workers and joins the monitor;
    /// later calls are no-ops.
    pub async fn shutdown(&self) {
        if self.shutdown_started.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shutting_down.store(true, Ordering::Release);
        self.ready.notify.notify_waiters();

        for slot in &self.slots {
            let join = {
                let mut guard = slot.lock();
                guard.worker.close_queue();
                std::mem::replace(&mut guard.join, tokio::spawn(async {}))
            };
            let _ = join.await;
        }

        let monitor = self.monitor.lock().take();
        if let Some(monitor) = monitor {
            let _ = monitor.await;
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
