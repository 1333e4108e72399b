// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sequential job executor: one subprocess at a time, output
//! captured line by line, cooperative shutdown.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jrun_core::{Job, Outcome};
use jrun_storage::JobQueue;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::WorkerError;
use crate::line_reader::LineReader;
use crate::logger::{JobSink, LogModel};

/// Default poll interval when the queue has nothing to dequeue.
pub const DEFAULT_FREQ: Duration = Duration::from_secs(1);

/// Sequential, single-job-at-a-time worker. Holds no subprocess state
/// across calls to [`Worker::run`]: everything lives on the stack of the
/// loop that's currently executing a job.
pub struct Worker<S: JobSink> {
    queue: Arc<dyn JobQueue>,
    sink: Arc<S>,
    freq: Duration,
    should_exit: Arc<AtomicBool>,
    force_exit: Arc<AtomicBool>,
}

impl<S: JobSink> Worker<S> {
    pub fn new(queue: Arc<dyn JobQueue>, sink: Arc<S>) -> Self {
        Self::with_freq(queue, sink, DEFAULT_FREQ)
    }

    pub fn with_freq(queue: Arc<dyn JobQueue>, sink: Arc<S>, freq: Duration) -> Self {
        Self { queue, sink, freq, should_exit: Arc::new(AtomicBool::new(false)), force_exit: Arc::new(AtomicBool::new(false)) }
    }

    /// A handle a supervisor can hold onto and use to call
    /// [`Worker::handle_exit`] without borrowing the worker itself (e.g.
    /// from a signal handler running concurrently with `run`).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle { should_exit: self.should_exit.clone(), force_exit: self.force_exit.clone() }
    }

    /// Idempotent-with-escalation shutdown signal: the first call asks
    /// the worker to drain and stop before its next dequeue; a second
    /// call additionally sets `force_exit`, reserved for a future
    /// hard-kill of the running subprocess.
    pub fn handle_exit(&self) {
        if self.should_exit.swap(true, Ordering::SeqCst) {
            self.force_exit.store(true, Ordering::SeqCst);
        }
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::SeqCst)
    }

    /// Runs until `handle_exit` has been called. Only queue I/O errors
    /// escape this loop; a single job's own failure is terminal for that
    /// job alone and is reported via `worked`, not propagated here.
    pub async fn run(&self) -> Result<(), WorkerError> {
        while !self.should_exit() {
            match self.queue.dequeue()? {
                Some(job) => self.execute(job).await?,
                None => tokio::time::sleep(self.freq).await,
            }
        }
        Ok(())
    }

    async fn execute(&self, job: Job) -> Result<(), WorkerError> {
        let id = job.id.clone();
        self.announce(&id, format!("Task: \"{}\"", job.command)).await;

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(format!("{{ {} ; }} 2>&1", job.command))
            .current_dir(&job.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(id = %id, error = %e, "subprocess spawn failed");
                self.announce(&id, format!("Exception occured: {e}")).await;
                self.announce(&id, "Task failed").await;
                self.queue.worked(&id, Outcome::Failed)?;
                return Ok(());
            }
        };

        let stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "spawned child has no stdout pipe")
        })?;
        let mut reader = LineReader::new(stdout);

        let drain = async {
            while let Some(line) = reader.next_line().await? {
                self.announce(&id, line).await;
            }
            Ok::<(), std::io::Error>(())
        };

        let (wait_result, drain_result) = tokio::join!(child.wait(), drain);
        drain_result?;
        let status = wait_result?;

        self.announce(&id, "Task finished").await;
        let outcome = if status.success() { Outcome::Done } else { Outcome::Failed };
        info!(id = %id, outcome = %outcome, "job finished");
        self.queue.worked(&id, outcome)?;
        Ok(())
    }

    async fn announce(&self, id: &jrun_core::JobId, line: impl Into<String>) {
        let _ = self.sink.emit(LogModel::new(id.clone(), line)).await;
    }
}

/// Cloneable shutdown signal detached from the worker's other state, so
/// it can be handed to a signal handler or an HTTP shutdown endpoint.
#[derive(Clone)]
pub struct ShutdownHandle {
    should_exit: Arc<AtomicBool>,
    force_exit: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        if self.should_exit.swap(true, Ordering::SeqCst) {
            self.force_exit.store(true, Ordering::SeqCst);
        }
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::SeqCst)
    }

    pub fn force_exit(&self) -> bool {
        self.force_exit.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
