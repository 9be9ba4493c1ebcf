// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::args::ArgumentMap;
use crate::middleware::CommandBuilder;

fn ctx(method: &str) -> MiddlewareContext {
    MiddlewareContext::new(method, ArgumentMap::new())
}

#[test]
fn dispatch_not_found_writes_stderr() {
    let d = Dispatcher::new();
    let mut c = ctx("missing");
    match d.dispatch(&mut c) {
        DispatchOutcome::NotFound => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(!c.get_error_content().is_empty());
}

#[test]
fn register_command_rejects_empty_name() {
    let d = Dispatcher::new();
    assert!(!d.register_command("", Arc::new(|_| 0), vec![]));
}

#[test]
fn register_command_never_replaces() {
    let d = Dispatcher::new();
    assert!(d.register_command("echo", Arc::new(|_| 0), vec![]));
    assert!(!d.register_command("echo", Arc::new(|_| 1), vec![]));
}

#[test]
fn successful_handler_runs_output_transforms() {
    let d = Dispatcher::new();
    let transforms = CommandBuilder::new().read_stdout("message", false).build();
    d.register_command(
        "echo",
        Arc::new(|c: &mut MiddlewareContext| {
            let text = c.arguments().get("text").and_then(|v| v.as_str()).unwrap_or_default().to_string();
            c.set_output_content(text.into_bytes());
            0
        }),
        transforms,
    );

    let mut map = ArgumentMap::new();
    map.insert("text".into(), crate::args::ArgumentValue::Str("hi".into()));
    let mut c = MiddlewareContext::new("echo", map);
    match d.dispatch(&mut c) {
        DispatchOutcome::Success { fields } => {
            assert_eq!(fields.get("message"), Some(&serde_json::json!("hi")));
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[test]
fn failing_handler_skips_output_transforms() {
    let d = Dispatcher::new();
    let transforms = CommandBuilder::new().read_stdout("message", false).build();
    d.register_command(
        "fail",
        Arc::new(|c: &mut MiddlewareContext| {
            c.set_output_content(b"should not appear".to_vec());
            1
        }),
        transforms,
    );

    let mut c = ctx("fail");
    match d.dispatch(&mut c) {
        DispatchOutcome::HandlerFailed { status } => assert_eq!(status, 1),
        other => panic!("expected HandlerFailed, got {other:?}"),
    }
}

#[test]
fn input_transforms_run_before_handler_sees_args() {
    let d = Dispatcher::new();
    let transforms = CommandBuilder::new().rename_arg("from", "to").build();
    d.register_command(
        "rename",
        Arc::new(|c: &mut MiddlewareContext| {
            assert!(c.arguments().contains_key("to"));
            assert!(!c.arguments().contains_key("from"));
            0
        }),
        transforms,
    );

    let mut map = ArgumentMap::new();
    map.insert("from".into(), crate::args::ArgumentValue::Int(1));
    let mut c = MiddlewareContext::new("rename", map);
    assert!(matches!(d.dispatch(&mut c), DispatchOutcome::Success { .. }));
}
