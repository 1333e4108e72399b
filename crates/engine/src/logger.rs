// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker-facing half of the log fabric: a single record type plus
//! the sink the worker writes into. The fan-out/archive side lives in
//! [`crate::fabric`].

use async_trait::async_trait;
use jrun_core::JobId;
use tokio::sync::mpsc;

use crate::error::FabricError;

/// One line produced for one job, in production order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogModel {
    pub id: JobId,
    pub log: String,
}

impl LogModel {
    pub fn new(id: JobId, log: impl Into<String>) -> Self {
        Self { id, log: log.into() }
    }
}

/// Where a worker sends its output. The streaming logger and the console
/// logger are the two registered implementations.
#[async_trait]
pub trait JobSink: Send + Sync {
    async fn emit(&self, record: LogModel) -> Result<(), FabricError>;
}

/// Worker-side half of the fabric: a single bounded queue of
/// `(job-id, line)` records that the streamer task drains.
#[derive(Clone)]
pub struct StreamingLogger {
    tx: mpsc::Sender<LogModel>,
}

impl StreamingLogger {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<LogModel>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl JobSink for StreamingLogger {
    async fn emit(&self, record: LogModel) -> Result<(), FabricError> {
        self.tx.send(record).await.map_err(|_| FabricError::Broken)
    }
}

/// Foreground logger for `jrun run --no-http`: no archive, no
/// subscribers, just stdout.
pub struct ConsoleLogger;

#[async_trait]
impl JobSink for ConsoleLogger {
    async fn emit(&self, record: LogModel) -> Result<(), FabricError> {
        println!("[{}] {}", record.id, record.log);
        Ok(())
    }
}

/// Backend tag for the worker-side sink, mirroring [`crate::fabric::ReadStreamerBackend`]
/// and `storage::QueueBackend`. `streaming` is the normative backend used
/// by the daemon; `console` is the foreground debugging variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerBackend {
    Streaming,
    Console,
}

impl LoggerBackend {
    pub fn tag(self) -> &'static str {
        match self {
            LoggerBackend::Streaming => "streaming",
            LoggerBackend::Console => "console",
        }
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
