// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jrun-daemon: wires the durable queue (`jrun-storage`), the worker and
//! log fabric (`jrun-engine`) into one running process and exposes the
//! submission/observer surface (spec §4.E, §6) over a thin hand-rolled
//! HTTP/WebSocket front door.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod http;
pub mod server;

pub use config::Config;
pub use server::{serve, AppState};
