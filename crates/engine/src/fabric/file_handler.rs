// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job append-only archive.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use jrun_core::JobId;
use parking_lot::Mutex as SyncMutex;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::FabricError;

/// `job-id -> archive file`. Every line the streamer pops from the worker
/// queue is appended here regardless of whether anyone is subscribed, so
/// the archive is complete even for jobs nobody ever watched live.
pub struct FileHandler {
    root: PathBuf,
    open: SyncMutex<HashMap<JobId, Arc<AsyncMutex<File>>>>,
}

impl FileHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), open: SyncMutex::new(HashMap::new()) }
    }

    fn path_for(&self, id: &JobId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Opens (creating the archive directory and file if needed) the
    /// handle for `id`. Idempotent: a second call reuses the open handle.
    pub async fn add(&self, id: &JobId) -> Result<(), FabricError> {
        if self.open.lock().contains_key(id) {
            return Ok(());
        }
        fs::create_dir_all(&self.root).await?;
        let file = OpenOptions::new().create(true).append(true).open(self.path_for(id)).await?;
        self.open.lock().insert(id.clone(), Arc::new(AsyncMutex::new(file)));
        Ok(())
    }

    /// Appends one line, opening the archive lazily if `add` was never
    /// called for this id.
    pub async fn send(&self, id: &JobId, line: &str) -> Result<(), FabricError> {
        self.add(id).await?;
        let handle = self.open.lock().get(id).cloned();
        let Some(handle) = handle else { return Ok(()) };
        let mut file = handle.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }

    pub async fn delete(&self, id: &JobId) -> Result<(), FabricError> {
        self.open.lock().remove(id);
        match fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entire archive contents for `id`, or an empty string if nothing
    /// has been archived yet.
    pub async fn get_record(&self, id: &JobId) -> Result<String, FabricError> {
        match fs::read_to_string(self.path_for(id)).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "file_handler_tests.rs"]
mod tests;
