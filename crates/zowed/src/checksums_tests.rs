// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn missing_file_yields_none() {
    assert!(load(Path::new("/nonexistent/checksums.asc")).is_none());
}

#[test]
fn parses_hex_then_filename_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checksums.asc");
    std::fs::write(&path, "deadbeef file_one.so\nabc123  file_two.so\n").unwrap();

    let checksums = load(&path).unwrap();
    assert_eq!(checksums.get("file_one.so"), Some(&"deadbeef".to_string()));
    assert_eq!(checksums.get("file_two.so"), Some(&"abc123".to_string()));
}

#[test]
fn skips_malformed_lines_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checksums.asc");
    std::fs::write(&path, "not-a-valid-line\ndeadbeef good.so\n").unwrap();

    let checksums = load(&path).unwrap();
    assert_eq!(checksums.len(), 1);
    assert_eq!(checksums.get("good.so"), Some(&"deadbeef".to_string()));
}

#[test]
fn blank_lines_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checksums.asc");
    std::fs::write(&path, "\n\ndeadbeef good.so\n\n").unwrap();

    let checksums = load(&path).unwrap();
    assert_eq!(checksums.len(), 1);
}
