// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_num_workers_is_ten() {
    let cli = Cli::parse_from(["zowed"]);
    assert_eq!(cli.num_workers, 10);
    assert!(!cli.verbose);
    assert!(cli.validate().is_ok());
}

#[test]
fn zero_workers_fails_validation() {
    let cli = Cli::parse_from(["zowed", "--num-workers", "0"]);
    assert!(cli.validate().is_err());
}

#[test]
fn verbose_flag_parses() {
    let cli = Cli::parse_from(["zowed", "-v"]);
    assert!(cli.verbose);
}

#[test]
fn short_num_workers_flag_parses() {
    let cli = Cli::parse_from(["zowed", "-w", "4"]);
    assert_eq!(cli.num_workers, 4);
}
