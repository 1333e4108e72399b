// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job live queue (spec §4.D "Queue-handler").

use std::collections::HashMap;

use jrun_core::JobId;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::FabricError;

const DEFAULT_CAPACITY: usize = 256;

/// `job-id -> bounded live line queue`. The streamer is the only writer
/// (via [`QueueHandler::send`]); a distributor task in
/// [`crate::fabric::LocalReadStreamer`] is the only reader, obtained once
/// from [`QueueHandler::add`] when a job's first subscriber shows up.
pub struct QueueHandler {
    channels: Mutex<HashMap<JobId, mpsc::Sender<String>>>,
    capacity: usize,
}

impl QueueHandler {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { channels: Mutex::new(HashMap::new()), capacity }
    }

    /// Ensures a live queue exists for `id`. Returns the receiving half
    /// only the first time -- idempotent re-adds return `None`, since a
    /// second receiver for the same channel cannot exist.
    pub fn add(&self, id: &JobId) -> Option<mpsc::Receiver<String>> {
        let mut channels = self.channels.lock();
        if channels.contains_key(id) {
            return None;
        }
        let (tx, rx) = mpsc::channel(self.capacity);
        channels.insert(id.clone(), tx);
        Some(rx)
    }

    /// Fans a record into `id`'s live queue. A record for an id with no
    /// live queue (no subscriber has ever attached) is simply dropped:
    /// the archive in [`crate::fabric::FileHandler`] is the durable copy.
    pub async fn send(&self, id: &JobId, line: &str) -> Result<(), FabricError> {
        let tx = self.channels.lock().get(id).cloned();
        match tx {
            Some(tx) => tx.send(line.to_string()).await.map_err(|_| FabricError::Broken),
            None => Ok(()),
        }
    }

    pub fn delete(&self, id: &JobId) {
        self.channels.lock().remove(id);
    }
}

impl Default for QueueHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_handler_tests.rs"]
mod tests;
