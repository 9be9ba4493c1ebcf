// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::rpc::types::RpcNotification;

fn ctx() -> MiddlewareContext {
    MiddlewareContext::new("upload", ArgumentMap::new())
}

#[test]
fn set_content_len_flushes_pending_notification_once() {
    let mut c = ctx();
    c.set_pending_notification(RpcNotification::new(
        "sendStream",
        serde_json::json!({"id": 11, "pipePath": "/tmp/foo"}),
    ));
    assert!(c.take_outbox().is_empty());

    c.set_content_len(1024);
    let outbox = c.take_outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(
        outbox[0].params.as_ref().unwrap().get("contentLen"),
        Some(&serde_json::json!(1024))
    );

    // A second call must not re-emit anything, even with a different value.
    c.set_content_len(2048);
    assert!(c.take_outbox().is_empty());
    assert_eq!(c.content_len(), Some(2048));
}

#[test]
fn set_content_len_without_pending_notification_is_a_no_op_emit() {
    let mut c = ctx();
    c.set_content_len(42);
    assert!(c.take_outbox().is_empty());
    assert_eq!(c.content_len(), Some(42));
}

#[test]
fn io_buffers_are_independent() {
    let mut c = ctx();
    c.set_input_content(b"in".to_vec());
    c.set_output_content(b"out".to_vec());
    c.append_stderr("err");
    assert_eq!(c.input_content(), b"in");
    assert_eq!(c.get_output_content(), b"out");
    assert_eq!(c.get_error_content(), b"err");
}

#[test]
fn large_data_round_trips_by_field_name() {
    let mut c = ctx();
    c.store_large_data("payload", vec![1, 2, 3]);
    assert_eq!(c.large_data().get("payload"), Some(&vec![1, 2, 3]));
}
