// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Side-effect-free loading of `checksums.asc` for the ready message
//! (spec.md §6).

use std::collections::HashMap;
use std::path::Path;

/// Read `<hex_checksum> <filename>` lines from `path`. Returns `None` if
/// the file is absent or unreadable — callers must proceed with startup
/// either way. Malformed lines are skipped with a warning, not fatal.
pub fn load(path: &Path) -> Option<HashMap<String, String>> {
    let contents = std::fs::read_to_string(path).ok()?;
    let mut checksums = HashMap::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(char::is_whitespace) {
            Some((checksum, filename)) => {
                checksums.insert(filename.trim().to_string(), checksum.trim().to_string());
            }
            None => {
                tracing::warn!(line = lineno + 1, %line, "malformed checksums.asc line, skipping");
            }
        }
    }
    Some(checksums)
}

#[cfg(test)]
#[path = "checksums_tests.rs"]
mod tests;
