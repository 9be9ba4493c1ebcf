// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::args::ArgumentMap;
use crate::middleware::MiddlewareContext;
use std::sync::Arc;

fn server_with(name: &str, handler: crate::dispatch::Handler) -> RpcServer {
    let dispatcher = Dispatcher::new();
    dispatcher.register_command(name, handler, vec![]);
    RpcServer::new(Arc::new(dispatcher))
}

#[test]
fn build_result_falls_back_to_empty_object_when_no_fields_and_no_stdout() {
    let ctx = MiddlewareContext::new("noop", ArgumentMap::new());
    let result = build_result(&ctx, serde_json::Map::new());
    assert_eq!(result, serde_json::json!({}));
}

#[test]
fn build_result_parses_json_stdout_when_no_fields_written() {
    let mut ctx = MiddlewareContext::new("noop", ArgumentMap::new());
    ctx.set_output_content(br#"{"a":1}"#.to_vec());
    let result = build_result(&ctx, serde_json::Map::new());
    assert_eq!(result, serde_json::json!({"a": 1}));
}

#[test]
fn build_result_prefers_fields_over_stdout() {
    let mut ctx = MiddlewareContext::new("noop", ArgumentMap::new());
    ctx.set_output_content(b"ignored".to_vec());
    let mut fields = serde_json::Map::new();
    fields.insert("message".to_string(), serde_json::json!("hi"));
    let result = build_result(&ctx, fields);
    assert_eq!(result, serde_json::json!({"message": "hi"}));
}

#[test]
fn build_result_substitutes_large_data_placeholder() {
    let mut ctx = MiddlewareContext::new("noop", ArgumentMap::new());
    ctx.store_large_data("blob", vec![1, 2, 3]);
    let mut fields = serde_json::Map::new();
    fields.insert("blob".to_string(), large_data_placeholder("blob"));
    let result = build_result(&ctx, fields);
    let encoded = result.get("blob").and_then(Value::as_str).unwrap();
    assert_ne!(encoded, "\u{0}zowed-large-data:blob\u{0}");
    use base64::Engine;
    assert_eq!(base64::engine::general_purpose::STANDARD.decode(encoded).unwrap(), vec![1, 2, 3]);
}

#[test]
fn extract_id_recovers_id_from_raw_json() {
    assert_eq!(extract_id(r#"{"jsonrpc":"2.0","id":7,"method":"x"}"#), Some(7));
    assert_eq!(extract_id("not json"), None);
    assert_eq!(extract_id(r#"{"method":"x"}"#), None);
}

#[test]
fn extract_method_recovers_method_from_raw_json() {
    assert_eq!(extract_method(r#"{"jsonrpc":"2.0","id":7,"method":"hang"}"#), Some("hang".to_string()));
    assert_eq!(extract_method("not json"), None);
}

#[test]
fn process_request_unknown_method_does_not_panic() {
    let server = server_with("known", Arc::new(|_| 0));
    server.process_request(r#"{"jsonrpc":"2.0","id":1,"method":"unknown"}"#);
}

#[test]
fn process_request_invalid_params_shape_does_not_panic() {
    let server = server_with("known", Arc::new(|_| 0));
    server.process_request(r#"{"jsonrpc":"2.0","id":1,"method":"known","params":[1,2,3]}"#);
}

#[test]
fn process_request_parse_error_does_not_panic() {
    let server = server_with("known", Arc::new(|_| 0));
    server.process_request("not json at all");
}

#[test]
fn process_request_success_path_runs_handler() {
    let server = server_with(
        "echo",
        Arc::new(|c: &mut MiddlewareContext| {
            c.set_output_content(b"ok".to_vec());
            0
        }),
    );
    server.process_request(r#"{"jsonrpc":"2.0","id":1,"method":"echo","params":{}}"#);
}
