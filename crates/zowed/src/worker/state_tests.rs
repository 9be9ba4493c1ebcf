// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_state_is_starting() {
    let cell = AtomicWorkerState::default();
    assert_eq!(cell.load(), WorkerState::Starting);
}

#[test]
fn store_then_load_round_trips() {
    let cell = AtomicWorkerState::new(WorkerState::Starting);
    cell.store(WorkerState::Running);
    assert_eq!(cell.load(), WorkerState::Running);
    cell.store(WorkerState::Faulted);
    assert_eq!(cell.load(), WorkerState::Faulted);
}
