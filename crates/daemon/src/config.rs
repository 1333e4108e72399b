// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: storage roots, bind address, worker frequency.
//!
//! Resolution order is flags > environment > defaults; callers (the
//! `jrun run` CLI command) build a [`Config`] with [`Config::from_env`]
//! and then overwrite individual fields from parsed flags before calling
//! [`crate::serve`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use jrun_engine::worker::DEFAULT_FREQ;

use crate::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for the job queue (spec §6: `<base>/queue`).
    pub queue_root: PathBuf,
    /// Root directory for dependency snapshots (spec §6: `<base>/dep`).
    pub dep_root: PathBuf,
    /// Root directory for log archives (spec §6: `<base>/log`).
    pub log_root: PathBuf,
    /// Address the HTTP/WebSocket surface binds to.
    pub bind_addr: SocketAddr,
    /// Worker idle poll interval.
    pub freq: Duration,
}

impl Config {
    /// Build a config from `JRUN_STATE_DIR`, `JRUN_BIND_ADDR`, and
    /// `JRUN_WORKER_FREQ_MS`, falling back to the documented defaults.
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        let state_dir = env::state_dir();
        Ok(Self {
            queue_root: state_dir.join("queue"),
            dep_root: state_dir.join("dep"),
            log_root: state_dir.join("log"),
            bind_addr: env::bind_addr()?,
            freq: env::worker_freq().unwrap_or(DEFAULT_FREQ),
        })
    }

    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.queue_root = dir.join("queue");
        self.dep_root = dir.join("dep");
        self.log_root = dir.join("log");
        self
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_freq(mut self, freq: Duration) -> Self {
        self.freq = freq;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
