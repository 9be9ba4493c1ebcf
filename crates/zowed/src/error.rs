// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal, startup-only errors. Per-request errors are wire objects
//! (`rpc::ErrorDetails`), not `Error` types — see SPEC_FULL.md §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZowedError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
