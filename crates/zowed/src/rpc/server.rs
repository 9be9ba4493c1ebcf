// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC parse/dispatch/serialize, notification emission, and the
//! single shared response mutex stdout is serialized under.
//!
//! Grounded on `mcp/transport.rs`'s `StdioTransport`, mirrored from a
//! client (spawns a server, reads its responses) to a server (reads
//! requests, writes responses over the process's own stdout).

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::args::argument_map_from_params;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::middleware::{large_data_placeholder, MiddlewareContext};

use super::types::{
    ErrorDetails, RpcNotification, RpcRequest, RpcResponse, CODE_INTERNAL_ERROR, CODE_INVALID_PARAMS,
    CODE_METHOD_NOT_FOUND, CODE_PARSE_ERROR, CODE_TIMEOUT,
};

/// JSON-RPC framing layer. All writes go through [`Self::print_response`] /
/// [`Self::print_notification`], which share one [`parking_lot::Mutex`]
/// guarding the output sink directly, so a line is never interleaved with
/// another worker's output and serialization happens under the same lock
/// as the write (spec.md §5 / §9: "the response mutex is held during JSON
/// serialization, not just during the write").
pub struct RpcServer {
    dispatcher: Arc<Dispatcher>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl RpcServer {
    /// Construct a server that writes responses and notifications to the
    /// process's real stdout.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_writer(dispatcher, std::io::stdout())
    }

    /// Construct a server writing to an arbitrary sink, e.g. an in-memory
    /// buffer in tests that need to assert on emitted lines.
    pub fn with_writer(dispatcher: Arc<Dispatcher>, writer: impl Write + Send + 'static) -> Self {
        Self {
            dispatcher,
            output: Mutex::new(Box::new(writer)),
        }
    }

    /// Parse, dispatch, and respond to one raw JSON-RPC request line.
    /// Called by a [`crate::worker::Worker`] inside its own fault-isolation
    /// boundary — a handler panic unwinds out through this call, it is not
    /// caught here (spec.md §4.5: the *worker* catches it, not the
    /// dispatcher or the server).
    pub fn process_request(&self, raw: &str) {
        let request: RpcRequest = match serde_json::from_str(raw) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse request line");
                self.print_response(RpcResponse::failure(0, ErrorDetails::new(CODE_PARSE_ERROR, "Parse error")));
                return;
            }
        };

        if !self.dispatcher.is_registered(&request.method) {
            self.print_response(RpcResponse::failure(
                request.id,
                ErrorDetails::new(CODE_METHOD_NOT_FOUND, format!("Unrecognized command {}", request.method)),
            ));
            return;
        }

        let Some(args) = argument_map_from_params(request.params.as_ref()) else {
            self.print_response(RpcResponse::failure(
                request.id,
                ErrorDetails::new(CODE_INVALID_PARAMS, "params must be an object"),
            ));
            return;
        };

        let mut ctx = MiddlewareContext::new(request.method.clone(), args);
        let outcome = self.dispatcher.dispatch(&mut ctx);

        for notification in ctx.take_outbox() {
            self.print_notification(notification);
        }

        match outcome {
            DispatchOutcome::Success { fields } => {
                let result = build_result(&ctx, fields);
                self.print_response(RpcResponse::success(request.id, result));
            }
            DispatchOutcome::NotFound => {
                self.print_response(RpcResponse::failure(
                    request.id,
                    ErrorDetails::new(CODE_METHOD_NOT_FOUND, format!("Unrecognized command {}", request.method)),
                ));
            }
            DispatchOutcome::HandlerFailed { .. } => {
                let stderr = ctx.get_error_content();
                let mut error = ErrorDetails::new(CODE_INTERNAL_ERROR, "Command execution failed");
                if !stderr.is_empty() {
                    error = error.with_data(Value::String(String::from_utf8_lossy(stderr).into_owned()));
                }
                self.print_response(RpcResponse::failure(request.id, error));
            }
        }
    }

    /// Emit an out-of-band notification (stream provisioning, ready message).
    pub fn send_notification(&self, notification: RpcNotification) {
        self.print_notification(notification);
    }

    /// Emit a timeout error for a request whose worker was replaced out from
    /// under it. Reuses the original `id` and `method` when they can be
    /// recovered from the raw request text, else `0` / `"unknown"`
    /// (spec.md §4.4).
    pub fn send_timeout_error(&self, raw_request: &str, timeout_ms: u64) {
        let id = extract_id(raw_request).unwrap_or(0);
        let method = extract_method(raw_request).unwrap_or_else(|| "unknown".to_string());
        let error = ErrorDetails::new(CODE_TIMEOUT, format!("Command '{method}' timed out after {timeout_ms}ms"))
            .with_data(serde_json::json!({ "timeoutMs": timeout_ms }));
        self.print_response(RpcResponse::failure(id, error));
    }

    /// Emit an internal-error response for a poison-pilled request, without
    /// attempting to recover its original method name.
    pub fn send_poison_pill_error(&self, raw_request: &str) {
        let id = extract_id(raw_request).unwrap_or(0);
        self.print_response(RpcResponse::failure(
            id,
            ErrorDetails::new(CODE_INTERNAL_ERROR, "Request exceeded maximum retry count"),
        ));
    }

    /// Emit the one-time ready message (spec.md §6).
    pub fn send_ready(&self, checksums: Option<std::collections::HashMap<String, String>>) {
        #[derive(serde::Serialize)]
        struct ReadyMessage {
            jsonrpc: &'static str,
            method: Option<()>,
            status: &'static str,
            message: &'static str,
            data: ReadyData,
        }
        #[derive(serde::Serialize)]
        struct ReadyData {
            checksums: Option<std::collections::HashMap<String, String>>,
        }

        let message = ReadyMessage {
            jsonrpc: "2.0",
            method: None,
            status: "ready",
            message: "zowed is ready to accept input",
            data: ReadyData { checksums },
        };
        self.print_line(&message);
    }

    fn print_response(&self, response: RpcResponse) {
        self.print_line(&response);
    }

    fn print_notification(&self, notification: RpcNotification) {
        self.print_line(&notification);
    }

    fn print_line<T: serde::Serialize>(&self, value: &T) {
        let mut output = self.output.lock();
        let line = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize outgoing message");
                return;
            }
        };
        if let Err(e) = writeln!(output, "{line}") {
            tracing::error!(error = %e, "failed to write to stdout");
        }
        let _ = output.flush();
    }
}

/// Build the `result` value for a successful dispatch: merge any
/// `read_stdout`-produced fields, falling back to spec.md §4.4's
/// parsed/raw/empty-object rule for `stdout_buf` when no transform touched
/// it. Large-data placeholders are substituted with base64 of the stashed
/// bytes.
fn build_result(ctx: &MiddlewareContext, mut fields: serde_json::Map<String, Value>) -> Value {
    substitute_large_data(&mut fields, ctx);

    if !fields.is_empty() {
        return Value::Object(fields);
    }

    let content = ctx.get_output_content();
    if content.is_empty() {
        return Value::Object(serde_json::Map::new());
    }
    match std::str::from_utf8(content) {
        Ok(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string())),
        Err(_) => Value::String(String::from_utf8_lossy(content).into_owned()),
    }
}

fn substitute_large_data(fields: &mut serde_json::Map<String, Value>, ctx: &MiddlewareContext) {
    use base64::Engine;
    for (name, bytes) in ctx.large_data() {
        if fields.get(name) == Some(&large_data_placeholder(name)) {
            fields.insert(
                name.clone(),
                Value::String(base64::engine::general_purpose::STANDARD.encode(bytes)),
            );
        }
    }
}

/// Best-effort recovery of the `id` field from a raw request line, used when
/// synthesizing a timeout or parse error for a request we otherwise cannot
/// (or should not) fully re-parse.
fn extract_id(raw_request: &str) -> Option<i64> {
    let value: Value = serde_json::from_str(raw_request).ok()?;
    value.get("id").and_then(Value::as_i64)
}

fn extract_method(raw_request: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw_request).ok()?;
    value.get("method").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
