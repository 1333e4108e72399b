// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fan-in half of the fabric (spec §4.D "Streamer"): one long-lived
//! task that drains the worker's [`crate::logger::StreamingLogger`] and
//! pushes every record into both the live queue-handler and the durable
//! file-handler.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::fabric::{FileHandler, QueueHandler};
use crate::logger::LogModel;

/// Runs until `worker_rx` is closed (the worker side of the channel has
/// been dropped). Intended to be spawned once per daemon, not per job.
pub async fn run(
    mut worker_rx: mpsc::Receiver<LogModel>,
    queue_handler: Arc<QueueHandler>,
    file_handler: Arc<FileHandler>,
) {
    while let Some(record) = worker_rx.recv().await {
        if let Err(e) = file_handler.send(&record.id, &record.log).await {
            debug!(id = %record.id, error = %e, "archive write failed");
        }
        if let Err(e) = queue_handler.send(&record.id, &record.log).await {
            debug!(id = %record.id, error = %e, "live fan-out failed");
        }
    }
    debug!("streamer exiting: worker channel closed");
}

#[cfg(test)]
#[path = "streamer_tests.rs"]
mod tests;
