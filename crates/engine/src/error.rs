// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Failures inside the log fabric. Contained to the task that hit them --
/// never propagated out of the streamer or distributor loops.
#[derive(Debug, Error)]
pub enum FabricError {
    #[error("no subscriber registered for this key")]
    Missing,
    #[error("subscription was torn down while awaited")]
    Broken,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures executing a single job. The worker loop contains these to the
/// job at hand and keeps running; only queue I/O failures propagate out
/// of `Worker::run`.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Queue(#[from] jrun_storage::QueueError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
