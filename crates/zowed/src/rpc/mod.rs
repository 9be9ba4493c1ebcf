// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 wire types and the framing layer built on top of them.

pub mod server;
pub mod types;

pub use server::RpcServer;
pub use types::{ErrorDetails, RpcNotification, RpcRequest, RpcResponse};
