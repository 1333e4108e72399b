// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and the four-state lifecycle it moves through.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::id::JobId;

/// Status bucket a job currently lives in.
///
/// Transitions are exactly: `Todo -> Doing -> {Done, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    Doing,
    Done,
    Failed,
}

impl Status {
    /// All four buckets, in the order `list()` concatenates them when no
    /// filter is given.
    pub const ALL: [Status; 4] = [Status::Todo, Status::Doing, Status::Done, Status::Failed];

    /// Directory name this status lives under inside the queue root.
    /// `Todo` has no subdirectory: its records sit directly in the queue
    /// root.
    pub fn dirname(self) -> Option<&'static str> {
        match self {
            Status::Todo => None,
            Status::Doing => Some("doing"),
            Status::Done => Some("done"),
            Status::Failed => Some("failed"),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Done | Status::Failed)
    }
}

/// The only two statuses a job can be `worked` into from `doing`.
/// Narrower than [`Status`] so a queue's `worked` call can't be asked to
/// transition a job to `todo` or `doing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Done,
    Failed,
}

impl Outcome {
    pub fn status(self) -> Status {
        match self {
            Outcome::Done => Status::Done,
            Outcome::Failed => Status::Failed,
        }
    }
}

crate::simple_display! {
    Outcome { Done => "done", Failed => "failed" }
}

crate::simple_display! {
    Status {
        Todo => "todo",
        Doing => "doing",
        Done => "done",
        Failed => "failed",
    }
}

/// A job record as returned by the queue.
///
/// `command` and `workdir` may be empty when the queue was asked for a
/// fast, non-detailed listing (see [`Status`] and the queue's `list`
/// contract).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Rank within this job's current status bucket, 0-based.
    pub order: usize,
    pub command: String,
    pub workdir: PathBuf,
    pub status: Status,
}

impl Job {
    pub fn new(id: JobId, order: usize, command: String, workdir: PathBuf, status: Status) -> Self {
        Self { id, order, command, workdir, status }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
