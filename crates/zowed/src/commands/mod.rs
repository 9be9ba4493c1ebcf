// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture handlers used only by the integration tests in `tests/` to
//! exercise the six end-to-end scenarios named in spec.md §8. None of these
//! are registered outside `#[cfg(test)]` builds — `zowed` ships no command
//! families of its own, per spec.md's "deliberately OUT of scope" list
//! (`ds.*`, `jobs.*`, `uss.*`, `cmds.*` are external collaborators). The
//! `main` binary never registers any of these with its `Dispatcher`; they
//! exist solely for `tests/` to register against a throwaway dispatcher.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::middleware::MiddlewareContext;

/// Copies `args["message"]` into `stdout_buf` verbatim (scenario 1).
pub fn echo(ctx: &mut MiddlewareContext) -> i32 {
    let message = ctx.arguments().get("message").and_then(|v| v.as_str()).unwrap_or_default().to_string();
    ctx.set_output_content(message.into_bytes());
    0
}

/// Always panics, to drive the fault/replace/retry/poison-pill path
/// (scenario 3).
#[allow(clippy::panic)]
pub fn fault(_ctx: &mut MiddlewareContext) -> i32 {
    panic!("fault fixture: intentional handler panic");
}

/// Returns immediately with a fixed body, used as the "well-behaved sibling"
/// request in the timeout scenario (scenario 4) to prove the pool keeps
/// serving other requests while one worker is stuck.
pub fn pending(ctx: &mut MiddlewareContext) -> i32 {
    ctx.set_output_content(b"pending-ok".to_vec());
    0
}

/// Busy-loops until externally released via the shared flag passed through
/// `args["release_flag"]`'s address — tests construct this handler with a
/// captured `Arc<AtomicBool>` instead, see `hang_with`.
pub fn hang(_ctx: &mut MiddlewareContext) -> i32 {
    loop {
        std::hint::spin_loop();
    }
}

/// Like [`hang`], but blocks only until `release` flips true, so tests can
/// deterministically release the stuck worker after observing the timeout.
pub fn hang_with(release: Arc<AtomicBool>) -> impl Fn(&mut MiddlewareContext) -> i32 {
    move |_ctx: &mut MiddlewareContext| {
        while !release.load(Ordering::Acquire) {
            std::thread::yield_now();
        }
        0
    }
}

/// Expects `args["a"]` and `args["b"]` to already be split out by a
/// `flatten_obj("opts")` input transform (scenario 6).
pub fn merge(ctx: &mut MiddlewareContext) -> i32 {
    let a = ctx.arguments().get("a").cloned();
    let b = ctx.arguments().get("b").cloned();
    match (a, b) {
        (Some(a), Some(b)) => {
            ctx.set_output_content(format!("{a}:{b}").into_bytes());
            0
        }
        _ => {
            ctx.append_stderr("merge: expected both a and b to be present");
            1
        }
    }
}

/// Paired with `handle_fifo("streamId", "pipe", FifoMode::Put, defer=true)`;
/// calls `set_content_len` to flush the deferred `sendStream` notification
/// (scenario 5).
pub fn upload(ctx: &mut MiddlewareContext) -> i32 {
    ctx.set_content_len(1024);
    0
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
