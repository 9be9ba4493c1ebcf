// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface (spec.md §6 / SPEC_FULL.md §4.8).

use clap::Parser;

use crate::error::ZowedError;

#[derive(Debug, Parser)]
#[command(name = "zowed", about = "JSON-RPC request-dispatch daemon with a supervised worker pool")]
pub struct Cli {
    /// Number of workers in the pool. Must be greater than zero.
    #[arg(short = 'w', long = "num-workers", default_value_t = 10)]
    pub num_workers: usize,

    /// Enable DEBUG logging.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Validate arguments that clap's own type system cannot express
    /// (spec.md §8: "Zero workers at construction is rejected before the
    /// pool is built").
    pub fn validate(&self) -> Result<(), ZowedError> {
        if self.num_workers == 0 {
            return Err(ZowedError::Validation("--num-workers must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
