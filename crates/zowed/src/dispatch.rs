// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command name → handler lookup with the builder-driven middleware
//! pipeline.
//!
//! Grounded on the `ToolExecutor` trait plus a static registry in
//! `tools/executor.rs`, generalized per spec.md §4.3 into a name-keyed table
//! the dispatcher itself owns, since a handler here is identified by an
//! RPC method name rather than instantiated per call site.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::middleware::{ArgTransform, MiddlewareContext, Phase};

/// A command handler: mutates the context, returns 0 on success or a
/// non-zero status on failure. Per spec.md §6, handlers must not touch the
/// response mutex or stdout directly — only the context.
pub type Handler = Arc<dyn Fn(&mut MiddlewareContext) -> i32 + Send + Sync>;

/// Outcome of a single [`Dispatcher::dispatch`] call.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler ran and returned 0; output transforms also ran.
    /// `fields` are additional JSON object fields produced by `read_stdout`
    /// transforms, to be merged into the response result.
    Success { fields: serde_json::Map<String, Value> },
    /// No handler is registered under this method name.
    NotFound,
    /// The handler returned a non-zero status; output transforms did not
    /// run (spec.md §4.3 rationale: never let `read_stdout` overwrite a
    /// legitimate error object).
    HandlerFailed { status: i32 },
}

struct Registration {
    handler: Handler,
    transforms: Vec<ArgTransform>,
}

/// Registers `(name -> handler + transform list)` pairs and dispatches
/// requests against them.
#[derive(Default)]
pub struct Dispatcher {
    commands: RwLock<HashMap<String, Registration>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Returns `false` (and does not replace anything)
    /// if `name` is empty or a handler is already registered under it.
    pub fn register_command(&self, name: impl Into<String>, handler: Handler, transforms: Vec<ArgTransform>) -> bool {
        let name = name.into();
        if name.is_empty() {
            return false;
        }
        let mut commands = self.commands.write();
        if commands.contains_key(&name) {
            return false;
        }
        commands.insert(name, Registration { handler, transforms });
        true
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.commands.read().contains_key(name)
    }

    /// Look up and run `ctx.command_path()`'s handler, per spec.md §4.3:
    /// input transforms in order, then the handler, then (iff it returned 0)
    /// output transforms in order.
    pub fn dispatch(&self, ctx: &mut MiddlewareContext) -> DispatchOutcome {
        let (handler, transforms) = {
            let commands = self.commands.read();
            match commands.get(ctx.command_path()) {
                Some(reg) => (reg.handler.clone(), reg.transforms.clone()),
                None => {
                    ctx.append_stderr(format!("Command not found: {}", ctx.command_path()));
                    return DispatchOutcome::NotFound;
                }
            }
        };

        for transform in transforms.iter().filter(|t| t.phase() == Phase::Input) {
            transform.apply_input(ctx);
        }

        let status = (handler)(ctx);

        if status != 0 {
            return DispatchOutcome::HandlerFailed { status };
        }

        let mut fields = serde_json::Map::new();
        for transform in transforms.iter().filter(|t| t.phase() == Phase::Output) {
            transform.apply_output(ctx, &mut fields);
        }
        DispatchOutcome::Success { fields }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
