// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jrun-wire: the JSON request bodies and constants shared between the
//! daemon's submission/observer surface and anything that talks to it
//! (the CLI's `log` client, integration tests, future collaborators).
//!
//! The on-the-wire HTTP framing itself lives in `jrun-daemon`; this crate
//! only owns the shapes that travel inside request/response bodies and
//! the marker line printed into every late-joining subscriber's stream.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{PruneRequest, SubmitRequest, LOADING_MARKER, LOG_TRACE_PATH, PRUNE_PATH, SUBMIT_PATH};
