// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `local` read-streamer backend: owns the per-subscriber
//! [`ReadQueue`] and per-job [`LogQueue`] tables and implements
//! `add_client`/`get`/`delete`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jrun_core::JobId;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tracing::debug;

use crate::error::FabricError;
use crate::fabric::{FileHandler, QueueHandler};

/// Opaque key identifying one subscription. The transport layer supplies
/// it (e.g. the accept nonce of a websocket connection).
pub type SubscriberKey = String;

const LOADING_MARKER: &str = "-------------- loading -------------";
const READ_QUEUE_CAPACITY: usize = 1024;

/// Per-subscriber in-memory line buffer.
struct ReadQueue {
    target: JobId,
    live: AtomicBool,
    rx: AsyncMutex<mpsc::Receiver<String>>,
}

/// Per-job fan-out record: the set of subscribers
/// currently interested and a handle to their send-side channels. The
/// distributor task (spawned once, in [`LocalReadStreamer::ensure_log_queue`])
/// owns the matching receive-side channel from [`QueueHandler::add`].
struct LogQueue {
    subscribers: SyncMutex<HashMap<SubscriberKey, mpsc::Sender<String>>>,
    live: AtomicBool,
}

pub struct LocalReadStreamer {
    queue_handler: Arc<QueueHandler>,
    file_handler: Arc<FileHandler>,
    read_queues: SyncMutex<HashMap<SubscriberKey, Arc<ReadQueue>>>,
    log_queues: Arc<SyncMutex<HashMap<JobId, Arc<LogQueue>>>>,
}

impl LocalReadStreamer {
    pub fn new(queue_handler: Arc<QueueHandler>, file_handler: Arc<FileHandler>) -> Self {
        Self {
            queue_handler,
            file_handler,
            read_queues: SyncMutex::new(HashMap::new()),
            log_queues: Arc::new(SyncMutex::new(HashMap::new())),
        }
    }

    /// Registers `key` as a subscriber of `id`. Idempotent: re-subscribing
    /// the same key to the same, still-live job is a no-op.
    pub async fn add_client(&self, id: &JobId, key: SubscriberKey) -> Result<(), FabricError> {
        if let Some(existing) = self.read_queues.lock().get(&key).cloned() {
            if existing.target == *id && existing.live.load(Ordering::Acquire) {
                return Ok(());
            }
        }

        let (tx, rx) = mpsc::channel(READ_QUEUE_CAPACITY);
        let archived = self.file_handler.get_record(id).await?;
        if !archived.is_empty() {
            let _ = tx.send(archived).await;
            let _ = tx.send(LOADING_MARKER.to_string()).await;
        }
        let read_queue = Arc::new(ReadQueue { target: id.clone(), live: AtomicBool::new(true), rx: AsyncMutex::new(rx) });
        self.read_queues.lock().insert(key.clone(), read_queue);

        let log_queue = self.ensure_log_queue(id);
        log_queue.subscribers.lock().insert(key, tx);
        Ok(())
    }

    /// Blocks until the next line is available for `key`.
    pub async fn get(&self, key: &str) -> Result<String, FabricError> {
        let read_queue = self.read_queues.lock().get(key).cloned().ok_or(FabricError::Missing)?;
        let mut rx = read_queue.rx.lock().await;
        match rx.recv().await {
            Some(line) => Ok(line),
            None => {
                read_queue.live.store(false, Ordering::Release);
                Err(FabricError::Broken)
            }
        }
    }

    /// Tears down `key`'s subscription. Double-delete is silent.
    pub fn delete(&self, key: &str) {
        let Some(read_queue) = self.read_queues.lock().remove(key) else { return };
        read_queue.live.store(false, Ordering::Release);
        self.remove_subscriber(&read_queue.target, key);
    }

    /// Ensures a `LogQueue` for `id` exists, spawning its distributor
    /// task the first time. Returns the (possibly just-created) handle.
    fn ensure_log_queue(&self, id: &JobId) -> Arc<LogQueue> {
        let mut log_queues = self.log_queues.lock();
        if let Some(existing) = log_queues.get(id) {
            return existing.clone();
        }
        let log_queue = Arc::new(LogQueue { subscribers: SyncMutex::new(HashMap::new()), live: AtomicBool::new(true) });
        log_queues.insert(id.clone(), log_queue.clone());

        if let Some(live_rx) = self.queue_handler.add(id) {
            self.spawn_distributor(id.clone(), live_rx, log_queue.clone());
        }
        log_queue
    }

    fn spawn_distributor(&self, id: JobId, mut live_rx: mpsc::Receiver<String>, log_queue: Arc<LogQueue>) {
        let streamer_queue_handler = self.queue_handler.clone();
        let streamer_log_queues = self.log_queues.clone();
        tokio::spawn(async move {
            while let Some(line) = live_rx.recv().await {
                let snapshot: Vec<(SubscriberKey, mpsc::Sender<String>)> =
                    log_queue.subscribers.lock().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                let mut dead = Vec::new();
                for (key, tx) in snapshot {
                    if tx.send(line.clone()).await.is_err() {
                        dead.push(key);
                    }
                }
                if !dead.is_empty() {
                    let now_empty = {
                        let mut subs = log_queue.subscribers.lock();
                        for key in &dead {
                            subs.remove(key);
                        }
                        subs.is_empty()
                    };
                    if now_empty {
                        log_queue.live.store(false, Ordering::Release);
                        streamer_queue_handler.delete(&id);
                        streamer_log_queues.lock().remove(&id);
                        break;
                    }
                }
            }
            log_queue.live.store(false, Ordering::Release);
            debug!(id = %id, "distributor exiting: live queue closed");
        });
    }

    fn remove_subscriber(&self, id: &JobId, key: &str) {
        let Some(log_queue) = self.log_queues.lock().get(id).cloned() else { return };
        let now_empty = {
            let mut subs = log_queue.subscribers.lock();
            subs.remove(key);
            subs.is_empty()
        };
        if now_empty {
            log_queue.live.store(false, Ordering::Release);
            self.queue_handler.delete(id);
            self.log_queues.lock().remove(id);
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
