// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging init, keyed off `-v`/`ZOWEX_LOG_LEVEL` (SPEC_FULL.md
//! §4.7). Writes to stderr so stdout remains pure JSON-RPC traffic
//! (spec.md §6: "stderr is reserved for fatal diagnostics only").

use tracing_subscriber::EnvFilter;

/// The log-level vocabulary spec.md §6 names for `ZOWEX_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Off,
}

impl LogLevel {
    fn from_env_str(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "TRACE" => Some(Self::Trace),
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            "FATAL" => Some(Self::Fatal),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }

    fn as_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            // FATAL has no tracing equivalent; errors are the closest level
            // that still surfaces anything.
            LogLevel::Error | LogLevel::Fatal => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Install the global tracing subscriber. `verbose` (the CLI `-v` flag)
/// forces `DEBUG` and wins over `ZOWEX_LOG_LEVEL`; absent both, the default
/// is `INFO`.
pub fn init(verbose: bool) {
    let level = if verbose {
        LogLevel::Debug
    } else {
        std::env::var("ZOWEX_LOG_LEVEL")
            .ok()
            .and_then(|raw| LogLevel::from_env_str(&raw))
            .unwrap_or(LogLevel::Info)
    };

    let filter = EnvFilter::try_new(level.as_filter_directive()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
