// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The ordered input/output transform list `CommandBuilder` assembles.
//!
//! Grounded on the input/output bridging the teacher does with
//! `tools/mcp_executor.rs`'s argument-to-JSON bridging, generalized per
//! spec.md §4.2 into a small closed set of named transforms rather than
//! arbitrary closures, so the dispatcher can reason about ordering and phase
//! without caring what a given transform does internally.

use base64::Engine;
use serde_json::Value;

use crate::args::ArgumentValue;
use crate::fifo;
use crate::rpc::types::RpcNotification;

use super::context::MiddlewareContext;

/// Which half of the pipeline a transform runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Output,
}

/// Direction a FIFO transform provisions for: `Get` is server-reads
/// (`receiveStream`), `Put` is server-writes (`sendStream`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoMode {
    Get,
    Put,
}

/// One unit in the ordered transform list a [`super::builder::CommandBuilder`]
/// assembles. Each variant carries its own discriminant, so the phase is
/// inferred from the variant rather than tracked separately (spec.md §4.2:
/// "unrelated transforms are harmless to mix").
#[derive(Debug, Clone)]
pub enum ArgTransform {
    RenameArg {
        from: String,
        to: String,
    },
    SetDefault {
        name: String,
        value: ArgumentValue,
    },
    WriteStdin {
        name: String,
        base64: bool,
    },
    ReadStdout {
        name: String,
        base64: bool,
    },
    FlattenObj {
        name: String,
    },
    HandleFifo {
        rpc_id_arg: String,
        fifo_arg: String,
        mode: FifoMode,
        defer: bool,
    },
}

impl ArgTransform {
    pub fn phase(&self) -> Phase {
        match self {
            ArgTransform::RenameArg { .. }
            | ArgTransform::SetDefault { .. }
            | ArgTransform::WriteStdin { .. }
            | ArgTransform::FlattenObj { .. }
            | ArgTransform::HandleFifo { .. } => Phase::Input,
            ArgTransform::ReadStdout { .. } => Phase::Output,
        }
    }

    /// Apply this transform during the input phase. No-op for output-phase
    /// transforms.
    pub fn apply_input(&self, ctx: &mut MiddlewareContext) {
        match self {
            ArgTransform::RenameArg { from, to } => {
                let args = ctx.mutable_arguments();
                match args.remove(from) {
                    Some(value) => {
                        args.insert(to.clone(), value);
                    }
                    None => {
                        tracing::warn!(%from, %to, "rename_arg: source argument missing");
                    }
                }
            }
            ArgTransform::SetDefault { name, value } => {
                let args = ctx.mutable_arguments();
                args.entry(name.clone()).or_insert_with(|| value.clone());
            }
            ArgTransform::WriteStdin { name, base64 } => {
                apply_write_stdin(ctx, name, *base64);
            }
            ArgTransform::FlattenObj { name } => {
                apply_flatten_obj(ctx, name);
            }
            ArgTransform::HandleFifo {
                rpc_id_arg,
                fifo_arg,
                mode,
                defer,
            } => {
                apply_handle_fifo_input(ctx, rpc_id_arg, fifo_arg, *mode, *defer);
            }
            ArgTransform::ReadStdout { .. } => {}
        }
    }

    /// Apply this transform during the output phase. No-op for input-phase
    /// transforms, except `HandleFifo`, which also unlinks its pipe here.
    pub fn apply_output(&self, ctx: &mut MiddlewareContext, response_fields: &mut serde_json::Map<String, Value>) {
        match self {
            ArgTransform::ReadStdout { name, base64 } => {
                apply_read_stdout(ctx, response_fields, name, *base64);
            }
            ArgTransform::HandleFifo { fifo_arg, .. } => {
                apply_handle_fifo_output(ctx, fifo_arg);
            }
            _ => {}
        }
    }
}

fn apply_write_stdin(ctx: &mut MiddlewareContext, name: &str, base64: bool) {
    let Some(value) = ctx.mutable_arguments().remove(name) else {
        tracing::warn!(%name, "write_stdin: argument missing");
        return;
    };
    let Some(text) = value.as_str() else {
        tracing::warn!(%name, "write_stdin: argument is not a string");
        return;
    };
    if base64 {
        match base64::engine::general_purpose::STANDARD.decode(text) {
            Ok(bytes) => ctx.set_input_content(bytes),
            Err(e) => {
                tracing::warn!(%name, error = %e, "write_stdin: base64 decode failed");
                ctx.append_stderr(format!("write_stdin: base64 decode failed for {name}: {e}"));
            }
        }
    } else {
        ctx.set_input_content(text.as_bytes().to_vec());
    }
}

fn apply_read_stdout(
    ctx: &mut MiddlewareContext,
    fields: &mut serde_json::Map<String, Value>,
    name: &str,
    base64: bool,
) {
    let content = ctx.get_output_content();
    if content.len() > crate::middleware::context::LARGE_DATA_THRESHOLD {
        ctx.store_large_data(name, content.to_vec());
        fields.insert(name.to_string(), large_data_placeholder(name));
        return;
    }

    let value = if base64 {
        base64::engine::general_purpose::STANDARD.encode(content)
    } else {
        match std::str::from_utf8(content) {
            Ok(s) => s.to_string(),
            Err(e) => {
                tracing::warn!(%name, error = %e, "read_stdout: output is not valid utf-8");
                return;
            }
        }
    };
    fields.insert(name.to_string(), Value::String(value));
}

/// Sentinel value `read_stdout` writes in place of an inlined payload once
/// the payload crosses [`super::context::LARGE_DATA_THRESHOLD`]; the
/// response serializer replaces it with the base64 form of the bytes stashed
/// in `ctx.large_data()` under the same field name (spec.md §3).
pub fn large_data_placeholder(field: &str) -> Value {
    Value::String(format!("\u{0}zowed-large-data:{field}\u{0}"))
}

fn apply_flatten_obj(ctx: &mut MiddlewareContext, name: &str) {
    let Some(value) = ctx.arguments().get(name).cloned() else {
        return;
    };
    let Some(raw) = value.as_str() else {
        ctx.append_stderr(format!("flatten_obj: {name} is not a string"));
        return;
    };
    let parsed: Result<Value, _> = serde_json::from_str(raw);
    match parsed {
        Ok(Value::Object(map)) => {
            let args = ctx.mutable_arguments();
            args.remove(name);
            for (key, v) in map {
                if let Some(scalar) = scalar_argument(&v) {
                    args.insert(key, scalar);
                }
                // Nested objects/arrays are silently dropped, per spec.md §9.
            }
        }
        Ok(_) => {
            ctx.append_stderr(format!("flatten_obj: {name} is not a JSON object"));
        }
        Err(e) => {
            ctx.append_stderr(format!("flatten_obj: failed to parse {name}: {e}"));
        }
    }
}

fn scalar_argument(value: &Value) -> Option<ArgumentValue> {
    match value {
        Value::Bool(b) => Some(ArgumentValue::Bool(*b)),
        Value::Number(n) => Some(if let Some(i) = n.as_i64() {
            ArgumentValue::Int(i)
        } else {
            ArgumentValue::Double(n.as_f64().unwrap_or_default())
        }),
        Value::String(s) => Some(ArgumentValue::Str(s.clone())),
        _ => None,
    }
}

fn apply_handle_fifo_input(
    ctx: &mut MiddlewareContext,
    rpc_id_arg: &str,
    fifo_arg: &str,
    mode: FifoMode,
    defer: bool,
) {
    let Some(stream_id) = ctx.arguments().get(rpc_id_arg).and_then(ArgumentValue::as_int) else {
        ctx.append_stderr(format!("handle_fifo: {rpc_id_arg} missing or not an integer"));
        return;
    };

    let path = fifo::fifo_path(stream_id);
    if let Err(e) = fifo::create(&path) {
        tracing::warn!(stream_id, error = %e, "handle_fifo: mkfifo failed");
        ctx.append_stderr(format!("handle_fifo: mkfifo failed: {e}"));
        return;
    }

    ctx.mutable_arguments().insert(
        fifo_arg.to_string(),
        ArgumentValue::Str(path.to_string_lossy().into_owned()),
    );

    let method = match mode {
        FifoMode::Get => "receiveStream",
        FifoMode::Put => "sendStream",
    };
    let notification = RpcNotification::new(
        method,
        serde_json::json!({ "id": stream_id, "pipePath": path.to_string_lossy() }),
    );

    if defer {
        ctx.set_pending_notification(notification);
    } else {
        ctx.queue_immediate_notification(notification);
    }
}

fn apply_handle_fifo_output(ctx: &mut MiddlewareContext, fifo_arg: &str) {
    let Some(path) = ctx.arguments().get(fifo_arg).and_then(ArgumentValue::as_str) else {
        return;
    };
    let path = std::path::PathBuf::from(path);
    if let Err(e) = fifo::remove(&path) {
        tracing::warn!(path = %path.display(), error = %e, "handle_fifo: unlink failed");
        ctx.append_stderr(format!("handle_fifo: unlink failed for {}: {e}", path.display()));
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
