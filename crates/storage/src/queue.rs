// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable, file-backed job queue. Status transitions are atomic renames
//! between sibling directories under the queue root.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jrun_core::{Clock, Job, JobId, Outcome, Status, SystemClock};
use tracing::{debug, info, warn};

use crate::dependency::DependencyStore;
use crate::error::QueueError;

/// Durable submission, FIFO dequeue, state transitions, listing, pruning.
///
/// Implementations other than the file-backed one must preserve the same
/// observable behavior: strict FIFO dequeue order, silent `worked` on an id
/// not currently `doing`, and `NotFound` from `pop` on anything but a *todo*
/// record.
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, command: &str, source: Option<&Path>) -> Result<Job, QueueError>;
    fn dequeue(&self) -> Result<Option<Job>, QueueError>;
    fn worked(&self, id: &JobId, outcome: Outcome) -> Result<(), QueueError>;
    fn list(&self, detail: bool, status: Option<Status>) -> Result<Vec<Job>, QueueError>;
    fn pop(&self, id: &JobId) -> Result<(), QueueError>;
    fn prune(&self) -> Result<(), QueueError>;
}

/// File-backed queue: each job record is a regular file named by its id;
/// status is simply which sibling directory the file currently lives in.
/// `todo` records sit directly in `root`; `doing`/`done`/`failed` are
/// subdirectories.
pub struct FileQueue<C: Clock = SystemClock> {
    root: PathBuf,
    doing: PathBuf,
    done: PathBuf,
    failed: PathBuf,
    depends: Option<Arc<dyn DependencyStore>>,
    clock: C,
}

impl FileQueue<SystemClock> {
    pub fn new(
        root: impl Into<PathBuf>,
        depends: Option<Arc<dyn DependencyStore>>,
    ) -> Result<Self, QueueError> {
        Self::with_clock(root, depends, SystemClock)
    }
}

impl<C: Clock> FileQueue<C> {
    pub fn with_clock(
        root: impl Into<PathBuf>,
        depends: Option<Arc<dyn DependencyStore>>,
        clock: C,
    ) -> Result<Self, QueueError> {
        let root = root.into();
        let doing = root.join("doing");
        let done = root.join("done");
        let failed = root.join("failed");
        for dir in [&root, &doing, &done, &failed] {
            fs::create_dir_all(dir)?;
        }
        Ok(Self { root, doing, done, failed, depends, clock })
    }

    fn dir_for(&self, status: Status) -> &Path {
        match status {
            Status::Todo => &self.root,
            Status::Doing => &self.doing,
            Status::Done => &self.done,
            Status::Failed => &self.failed,
        }
    }

    /// Stamp a new id from the clock, re-stamping by a microsecond on
    /// collision until the name is free. Keeps ids strictly monotonic even
    /// under rapid concurrent submission.
    fn stamp_id(&self) -> JobId {
        let mut micros = self.clock.epoch_micros();
        loop {
            let id = JobId::from_epoch_micros(micros);
            if !self.root.join(id.as_str()).exists() {
                return id;
            }
            micros += 1;
        }
    }

    /// Well-formed-id entries in `dir`, sorted lexicographically (== chronologically).
    /// Filenames that don't parse as a job id are skipped, not errors.
    fn entries(&self, dir: &Path) -> Result<Vec<(JobId, PathBuf)>, QueueError> {
        let mut out = Vec::new();
        let read = match fs::read_dir(dir) {
            Ok(r) => r,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(e.into()),
        };
        for entry in read {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Ok(id) = JobId::parse(name) else {
                debug!(file = name, "skipping non-conforming queue filename");
                continue;
            };
            out.push((id, entry.path()));
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    fn list_status(&self, status: Status, detail: bool, out: &mut Vec<Job>) -> Result<(), QueueError> {
        let dir = self.dir_for(status).to_path_buf();
        for (order, (id, path)) in self.entries(&dir)?.into_iter().enumerate() {
            let (command, workdir) = if detail {
                (fs::read_to_string(&path)?, self.workdir_for(&id))
            } else {
                (String::new(), PathBuf::new())
            };
            out.push(Job::new(id, order, command, workdir, status));
        }
        Ok(())
    }

    fn workdir_for(&self, id: &JobId) -> PathBuf {
        self.depends.as_ref().map(|d| d.workdir(id)).unwrap_or_default()
    }
}

impl<C: Clock> JobQueue for FileQueue<C> {
    fn enqueue(&self, command: &str, source: Option<&Path>) -> Result<Job, QueueError> {
        let id = self.stamp_id();
        if let Some(depends) = &self.depends {
            depends.snapshot(&id, source)?;
        }
        fs::write(self.root.join(id.as_str()), command)?;
        let order = self.entries(&self.root)?.len().saturating_sub(1);
        let workdir = self.workdir_for(&id);
        info!(id = %id, "job enqueued");
        Ok(Job::new(id, order, command.to_string(), workdir, Status::Todo))
    }

    fn dequeue(&self) -> Result<Option<Job>, QueueError> {
        let Some((id, path)) = self.entries(&self.root)?.into_iter().next() else {
            return Ok(None);
        };
        let command = fs::read_to_string(&path)?;
        fs::rename(&path, self.doing.join(id.as_str()))?;
        let workdir = self.workdir_for(&id);
        debug!(id = %id, "job dequeued");
        Ok(Some(Job::new(id, 0, command, workdir, Status::Doing)))
    }

    fn worked(&self, id: &JobId, outcome: Outcome) -> Result<(), QueueError> {
        let src = self.doing.join(id.as_str());
        if !src.is_file() {
            warn!(id = %id, "worked() for a job not in doing; ignoring");
            return Ok(());
        }
        let dest_dir = match outcome {
            Outcome::Done => &self.done,
            Outcome::Failed => &self.failed,
        };
        fs::rename(&src, dest_dir.join(id.as_str()))?;
        info!(id = %id, outcome = %outcome, "job worked");
        Ok(())
    }

    fn list(&self, detail: bool, status: Option<Status>) -> Result<Vec<Job>, QueueError> {
        let mut out = Vec::new();
        match status {
            Some(s) => self.list_status(s, detail, &mut out)?,
            None => {
                for s in Status::ALL {
                    self.list_status(s, detail, &mut out)?;
                }
            }
        }
        Ok(out)
    }

    fn pop(&self, id: &JobId) -> Result<(), QueueError> {
        let path = self.root.join(id.as_str());
        if !path.is_file() {
            return Err(QueueError::NotFound { id: id.to_string() });
        }
        fs::remove_file(&path)?;
        if let Some(depends) = &self.depends {
            depends.clear(id)?;
        }
        info!(id = %id, "job popped");
        Ok(())
    }

    fn prune(&self) -> Result<(), QueueError> {
        let mut ids: Vec<JobId> = self.entries(&self.done)?.into_iter().map(|(id, _)| id).collect();
        ids.extend(self.entries(&self.failed)?.into_iter().map(|(id, _)| id));

        remove_dir_ignore_missing(&self.done)?;
        remove_dir_ignore_missing(&self.failed)?;
        fs::create_dir_all(&self.done)?;
        fs::create_dir_all(&self.failed)?;

        if let Some(depends) = &self.depends {
            for id in &ids {
                depends.clear(id)?;
            }
        }
        info!(count = ids.len(), "pruned terminal jobs");
        Ok(())
    }
}

fn remove_dir_ignore_missing(dir: &Path) -> Result<(), std::io::Error> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Backend tag for the queue registry (a lookup table, not dynamic class
/// loading). `file` is the only normative backend; others may be added
/// behind the same trait without callers caring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueBackend {
    File,
}

impl QueueBackend {
    pub fn tag(self) -> &'static str {
        match self {
            QueueBackend::File => "file",
        }
    }

    pub fn build(
        self,
        root: impl Into<PathBuf>,
        depends: Option<Arc<dyn DependencyStore>>,
    ) -> Result<Box<dyn JobQueue>, QueueError> {
        match self {
            QueueBackend::File => Ok(Box::new(FileQueue::new(root, depends)?)),
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
