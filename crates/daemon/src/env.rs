// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root directory the daemon stores all state under: `<root>/queue`,
/// `<root>/dep`, `<root>/log` (spec §6 on-disk layout). `JRUN_STATE_DIR`
/// wins; otherwise `./storage`, matching the original's default.
pub fn state_dir() -> PathBuf {
    std::env::var("JRUN_STATE_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("storage"))
}

/// Address the submission/observer surface binds to.
pub fn bind_addr() -> Result<SocketAddr, std::net::AddrParseError> {
    std::env::var("JRUN_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()).parse()
}

/// Worker idle poll interval, overriding [`jrun_engine::worker::DEFAULT_FREQ`].
pub fn worker_freq() -> Option<Duration> {
    std::env::var("JRUN_WORKER_FREQ_MS").ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}
