// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jrun run` — start the worker, and by default the submission/observer
//! surface alongside it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use jrun_daemon::Config;
use jrun_engine::{ConsoleLogger, Worker, WorkerError};
use jrun_storage::{DependencyStore, FileQueue, FsDependencyStore, JobQueue};
use tracing::info;

pub async fn run(freq: Option<u64>, bind: Option<String>, dir: Option<PathBuf>, no_http: bool) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = dir {
        config = config.with_state_dir(dir);
    }
    if let Some(bind) = bind {
        config = config.with_bind_addr(bind.parse()?);
    }
    if let Some(freq) = freq {
        config = config.with_freq(Duration::from_millis(freq));
    }

    if no_http {
        run_foreground(config).await
    } else {
        jrun_daemon::serve(config).await
    }
}

/// `--no-http`: the worker alone, logging to stdout via [`ConsoleLogger`].
/// No log archive, no `/log-trace` subscribers, no accepted connections.
async fn run_foreground(config: Config) -> Result<()> {
    let depends: Arc<dyn DependencyStore> = Arc::new(FsDependencyStore::new(&config.dep_root)?);
    let queue: Arc<dyn JobQueue> = Arc::new(FileQueue::new(&config.queue_root, Some(depends))?);
    let worker = Worker::with_freq(queue, Arc::new(ConsoleLogger), config.freq);
    let shutdown = worker.shutdown_handle();

    let worker_handle = tokio::spawn(async move { worker.run().await });
    tokio::pin!(worker_handle);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested; draining in-flight job before exit");
            shutdown.signal();
        }
        result = &mut worker_handle => return report(result),
    }

    report(worker_handle.await)
}

fn report(result: Result<Result<(), WorkerError>, tokio::task::JoinError>) -> Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => Err(e.into()),
    }
}
