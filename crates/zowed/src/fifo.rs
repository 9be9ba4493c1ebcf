// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Named-pipe path derivation for the FIFO bulk-transfer transform.
//!
//! Grounded on spec.md §4.2/§6: `${TMPDIR:-/tmp}/zowe-native-proto_{euid}_{pid}_{streamId}_fifo`.

use std::path::PathBuf;

/// Directory FIFOs are created in: `$TMPDIR`, falling back to `/tmp` when
/// unset or empty (spec.md §8 boundary behavior).
pub fn fifo_dir() -> PathBuf {
    match std::env::var("TMPDIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("/tmp"),
    }
}

/// The path of the FIFO for a given stream id, unique per process and euid.
pub fn fifo_path(stream_id: i64) -> PathBuf {
    let euid = euid();
    let pid = std::process::id();
    fifo_dir().join(format!("zowe-native-proto_{euid}_{pid}_{stream_id}_fifo"))
}

#[cfg(unix)]
fn euid() -> u32 {
    rustix::process::geteuid().as_raw()
}

#[cfg(not(unix))]
fn euid() -> u32 {
    0
}

/// Create the FIFO for `path`, unlinking any stale entry first, mode 0600.
#[cfg(unix)]
pub fn create(path: &std::path::Path) -> std::io::Result<()> {
    let _ = std::fs::remove_file(path);
    rustix::fs::mkfifoat(rustix::fs::CWD, path, rustix::fs::Mode::from_raw_mode(0o600))
        .map_err(std::io::Error::from)
}

#[cfg(not(unix))]
pub fn create(_path: &std::path::Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "FIFOs are only supported on unix",
    ))
}

/// Remove a FIFO. `ENOENT` is not an error per spec.md §4.2 output-phase
/// cleanup ("log and continue on failure except ENOENT").
pub fn remove(path: &std::path::Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "fifo_tests.rs"]
mod tests;
