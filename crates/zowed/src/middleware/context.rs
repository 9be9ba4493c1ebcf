// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request I/O envelope passed through the transform pipeline and into
//! the external handler.
//!
//! Grounded on the request/response scratch buffers in `mcp/transport.rs`
//! (`StdioTransport` reads/writes newline-delimited JSON over byte buffers),
//! generalized here into the three-buffer (`stdin`/`stdout`/`stderr`) shape
//! spec.md §3 requires for handlers that prefer streaming over argument
//! passing.

use std::collections::HashMap;

use crate::args::ArgumentMap;
use crate::rpc::types::RpcNotification;

/// Threshold above which an output field is routed through `large_data`
/// instead of being inlined into the JSON response body.
pub const LARGE_DATA_THRESHOLD: usize = 16 * 1024 * 1024;

/// The mutable envelope a [`crate::dispatch::Dispatcher`] builds for one
/// request and hands to input transforms, the handler, and output transforms
/// in turn.
#[derive(Debug, Default)]
pub struct MiddlewareContext {
    command_path: String,
    args: ArgumentMap,
    stdin_buf: Vec<u8>,
    stdout_buf: Vec<u8>,
    stderr_buf: Vec<u8>,
    pending_notification: Option<RpcNotification>,
    content_len: Option<u64>,
    flushed: bool,
    large_data: HashMap<String, Vec<u8>>,
    /// Notifications ready to be written to stdout, in emission order.
    /// Populated by non-deferred FIFO transforms immediately and by
    /// [`Self::set_content_len`] when it flushes a deferred one.
    outbox: Vec<RpcNotification>,
}

impl MiddlewareContext {
    pub fn new(command_path: impl Into<String>, args: ArgumentMap) -> Self {
        Self {
            command_path: command_path.into(),
            args,
            ..Default::default()
        }
    }

    pub fn command_path(&self) -> &str {
        &self.command_path
    }

    /// Mutable reference to the argument map; transforms mutate in place.
    pub fn mutable_arguments(&mut self) -> &mut ArgumentMap {
        &mut self.args
    }

    pub fn arguments(&self) -> &ArgumentMap {
        &self.args
    }

    /// Replace the stdin scratch buffer wholesale.
    pub fn set_input_content(&mut self, bytes: Vec<u8>) {
        self.stdin_buf = bytes;
    }

    pub fn input_content(&self) -> &[u8] {
        &self.stdin_buf
    }

    pub fn set_output_content(&mut self, bytes: Vec<u8>) {
        self.stdout_buf = bytes;
    }

    pub fn get_output_content(&self) -> &[u8] {
        &self.stdout_buf
    }

    pub fn append_stderr(&mut self, message: impl AsRef<str>) {
        if !self.stderr_buf.is_empty() {
            self.stderr_buf.push(b'\n');
        }
        self.stderr_buf.extend_from_slice(message.as_ref().as_bytes());
    }

    pub fn get_error_content(&self) -> &[u8] {
        &self.stderr_buf
    }

    /// Stash exactly one deferred notification. Re-assignment before it is
    /// flushed drops the previous one — documented as a programmer error in
    /// spec.md §4.1 and never exercised by the shipped transforms.
    pub fn set_pending_notification(&mut self, notification: RpcNotification) {
        if self.pending_notification.is_some() {
            tracing::warn!(
                command = %self.command_path,
                "pending notification overwritten before it was flushed"
            );
        }
        self.pending_notification = Some(notification);
    }

    /// Queue a notification for immediate emission (the non-deferred FIFO
    /// case), bypassing the pending-notification slot entirely.
    pub fn queue_immediate_notification(&mut self, notification: RpcNotification) {
        self.outbox.push(notification);
    }

    /// Record the announced content length. If a pending notification
    /// exists and has not yet been flushed, this call patches `contentLen`
    /// into its `params` object and moves it to the outbox; exactly one
    /// flush happens per context regardless of how many times this is
    /// called (spec.md §3 invariant (b), §8 "idempotence").
    pub fn set_content_len(&mut self, n: u64) {
        self.content_len = Some(n);
        if self.flushed {
            return;
        }
        if let Some(mut notification) = self.pending_notification.take() {
            if let Some(params) = notification.params.as_mut().and_then(|p| p.as_object_mut()) {
                params.insert("contentLen".to_string(), serde_json::json!(n));
            }
            self.outbox.push(notification);
            self.flushed = true;
        }
    }

    pub fn content_len(&self) -> Option<u64> {
        self.content_len
    }

    /// Drain all notifications queued for emission, in order.
    pub fn take_outbox(&mut self) -> Vec<RpcNotification> {
        std::mem::take(&mut self.outbox)
    }

    /// Record an out-of-line payload above [`LARGE_DATA_THRESHOLD`], keyed by
    /// the output field name it will eventually substitute into.
    pub fn store_large_data(&mut self, field: impl Into<String>, bytes: Vec<u8>) {
        self.large_data.insert(field.into(), bytes);
    }

    pub fn large_data(&self) -> &HashMap<String, Vec<u8>> {
        &self.large_data
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
