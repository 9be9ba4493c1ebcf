// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 wire types.
//!
//! Grounded on `mcp/transport.rs`'s `JsonRpcRequest`/`JsonRpcResponse` pair in
//! the teacher crate, adapted from a client-side transport (spawn a server,
//! send requests) to a server-side one (receive requests, send responses).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parse error: the raw line was not valid JSON, or not a valid request shape.
pub const CODE_PARSE_ERROR: i64 = -32700;
/// The requested method is not registered with the dispatcher.
pub const CODE_METHOD_NOT_FOUND: i64 = -32601;
/// `params` was present but not a JSON object.
pub const CODE_INVALID_PARAMS: i64 = -32602;
/// The handler returned a non-zero status or the dispatcher could not invoke it.
pub const CODE_INTERNAL_ERROR: i64 = -32603;
/// Server-defined: a worker was replaced because its heartbeat went stale.
pub const CODE_TIMEOUT: i64 = -32000;

/// An incoming JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: i64,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

/// Error payload carried inside a failing `RpcResponse`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetails {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorDetails {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// An outgoing JSON-RPC 2.0 response: exactly one of `result` or `error`.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

impl RpcResponse {
    pub fn success(id: i64, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: i64, error: ErrorDetails) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// An outgoing JSON-RPC 2.0 notification: no `id`, no response expected.
#[derive(Debug, Clone, Serialize)]
pub struct RpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcNotification {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params: Some(params),
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
