// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `zowed` — a JSON-RPC 2.0 request-dispatch daemon with a supervised
//! worker pool. See SPEC_FULL.md for the full component design.

pub mod args;
pub mod checksums;
pub mod cli;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod fifo;
pub mod logging;
pub mod middleware;
pub mod rpc;
pub mod worker;

pub use dispatch::Dispatcher;
pub use error::ZowedError;
pub use rpc::RpcServer;
pub use worker::WorkerPool;
