// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fan-out half of the log fabric: archive, live per-job queue,
//! subscriber bookkeeping, and the streamer task tying them to the
//! worker's output.

mod file_handler;
mod local;
mod queue_handler;
mod streamer;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

pub use file_handler::FileHandler;
pub use local::{LocalReadStreamer, SubscriberKey};
pub use queue_handler::QueueHandler;

use crate::logger::LogModel;

/// Backend tag for the subscriber-facing half of the fabric, part of a
/// registry of backends callers select from by name. `local` is the only
/// implementation; the tag
/// exists so callers select by name rather than by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStreamerBackend {
    Local,
}

impl ReadStreamerBackend {
    pub fn tag(self) -> &'static str {
        match self {
            ReadStreamerBackend::Local => "local",
        }
    }
}

/// Owns every moving part of the log fabric and wires them together:
/// the archive, the live per-job queues, the subscriber-facing streamer,
/// and the background task fanning worker output into both.
pub struct LogFabric {
    pub queue_handler: Arc<QueueHandler>,
    pub file_handler: Arc<FileHandler>,
    pub read_streamer: Arc<LocalReadStreamer>,
}

impl LogFabric {
    /// Builds the fabric and spawns its streamer task. `worker_rx` is the
    /// receiving half of a [`crate::logger::StreamingLogger`]; the fabric
    /// drains it for as long as that logger (or its clones) remain alive.
    pub fn spawn(archive_root: impl Into<PathBuf>, worker_rx: mpsc::Receiver<LogModel>) -> Self {
        let queue_handler = Arc::new(QueueHandler::new());
        let file_handler = Arc::new(FileHandler::new(archive_root.into()));
        let read_streamer = Arc::new(LocalReadStreamer::new(queue_handler.clone(), file_handler.clone()));

        tokio::spawn(streamer::run(worker_rx, queue_handler.clone(), file_handler.clone()));

        Self { queue_handler, file_handler, read_streamer }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
