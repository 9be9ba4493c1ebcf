// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fluent builder that assembles the ordered transform list around a
//! handler.
//!
//! Grounded on the builder-style configuration objects the teacher favors
//! (e.g. `ExecutionContext::with_cwd`/`with_session_id` in
//! `tools/executor.rs`, `HookConfig::with_timeout` in `hooks/executor.rs`):
//! `self`-consuming setters that return `Self`. Per spec.md §9's design note,
//! the transform list is the canonical representation — `CommandBuilder` is
//! convenience over it, so `Dispatcher::register_command` stores
//! `Vec<ArgTransform>`, not the builder itself.

use crate::args::ArgumentValue;

use super::transform::{ArgTransform, FifoMode};

/// Fluent builder for a command's transform pipeline. Terminates with
/// [`Self::build`], which hands the ordered list to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct CommandBuilder {
    transforms: Vec<ArgTransform>,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename_arg(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.transforms.push(ArgTransform::RenameArg {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn set_default(mut self, name: impl Into<String>, value: ArgumentValue) -> Self {
        self.transforms.push(ArgTransform::SetDefault {
            name: name.into(),
            value,
        });
        self
    }

    pub fn write_stdin(mut self, name: impl Into<String>, base64: bool) -> Self {
        self.transforms.push(ArgTransform::WriteStdin {
            name: name.into(),
            base64,
        });
        self
    }

    pub fn read_stdout(mut self, name: impl Into<String>, base64: bool) -> Self {
        self.transforms.push(ArgTransform::ReadStdout {
            name: name.into(),
            base64,
        });
        self
    }

    pub fn flatten_obj(mut self, name: impl Into<String>) -> Self {
        self.transforms.push(ArgTransform::FlattenObj { name: name.into() });
        self
    }

    pub fn handle_fifo(
        mut self,
        rpc_id_arg: impl Into<String>,
        fifo_arg: impl Into<String>,
        mode: FifoMode,
        defer: bool,
    ) -> Self {
        self.transforms.push(ArgTransform::HandleFifo {
            rpc_id_arg: rpc_id_arg.into(),
            fifo_arg: fifo_arg.into(),
            mode,
            defer,
        });
        self
    }

    /// Finalize the pipeline into its canonical list form.
    pub fn build(self) -> Vec<ArgTransform> {
        self.transforms
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
