// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON bodies for the three operations the submission/observer surface
//! exposes.

use serde::{Deserialize, Serialize};

/// Body of `POST /task`. The command is enqueued verbatim -- no shell
/// validation happens at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub cmd: String,
}

/// Body of `POST /log-trace/prune`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PruneRequest {
    pub ids: Vec<String>,
}

/// Path a client submits a new job to.
pub const SUBMIT_PATH: &str = "/task";

/// Path an observer upgrades to a bidirectional text channel on, with a
/// `?id=<job-id>` query parameter selecting which job's lines to stream.
pub const LOG_TRACE_PATH: &str = "/log-trace";

/// Path a client asks to remove a set of archive files from.
pub const PRUNE_PATH: &str = "/log-trace/prune";

/// Synthetic line emitted between a late joiner's archived prefix and the
/// live tail, exactly once, never duplicated.
pub const LOADING_MARKER: &str = "-------------- loading -------------";

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
