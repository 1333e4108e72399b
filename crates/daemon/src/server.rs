// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the four core components into one running daemon: builds the
//! dependency store and queue (component A/B), spawns the worker
//! (component C) and the log fabric's streamer, then serves the
//! submission/observer surface (component E, see [`crate::http`]) until
//! a shutdown signal is delivered.

use std::sync::Arc;

use jrun_engine::{FileHandler, LocalReadStreamer, LogFabric, StreamingLogger, Worker};
use jrun_storage::{DependencyStore, FileQueue, FsDependencyStore, JobQueue};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::http;

/// Shared state every accepted connection needs: the queue to enqueue
/// into and the fabric to subscribe against.
pub struct AppState {
    pub queue: Arc<dyn JobQueue>,
    pub read_streamer: Arc<LocalReadStreamer>,
    pub file_handler: Arc<FileHandler>,
}

/// Builds the daemon from `config` and runs it until SIGINT. The first
/// Ctrl-C requests a graceful drain (stop accepting new connections,
/// let the in-flight job finish); a second escalates the worker's
/// `force_exit` flag per spec §4.C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let depends: Arc<dyn DependencyStore> = Arc::new(FsDependencyStore::new(&config.dep_root)?);
    let queue: Arc<dyn JobQueue> = Arc::new(FileQueue::new(&config.queue_root, Some(depends))?);

    let (sink, worker_rx) = StreamingLogger::new(1024);
    let fabric = LogFabric::spawn(config.log_root.clone(), worker_rx);

    let worker = Worker::with_freq(queue.clone(), Arc::new(sink), config.freq);
    let shutdown = worker.shutdown_handle();

    let state = Arc::new(AppState {
        queue,
        read_streamer: fabric.read_streamer.clone(),
        file_handler: fabric.file_handler.clone(),
    });

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "submission/observer surface listening");

    let accept_shutdown = CancellationToken::new();
    let accept_handle = tokio::spawn(http::accept_loop(listener, state, accept_shutdown.clone()));
    let worker_handle = tokio::spawn(async move { worker.run().await });
    tokio::pin!(worker_handle);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested; draining in-flight job before exit");
            shutdown.signal();
            accept_shutdown.cancel();
        }
        result = &mut worker_handle => {
            accept_shutdown.cancel();
            return report_worker_result(result);
        }
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("second shutdown signal received; escalating");
            shutdown.signal();
        }
        result = &mut worker_handle => {
            let _ = accept_handle.await;
            return report_worker_result(result);
        }
    }

    let result = worker_handle.await;
    let _ = accept_handle.await;
    report_worker_result(result)
}

fn report_worker_result(result: Result<Result<(), jrun_engine::WorkerError>, tokio::task::JoinError>) -> anyhow::Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!(error = %e, "worker loop exited with an error");
            Err(e.into())
        }
        Err(e) => {
            error!(error = %e, "worker task panicked");
            Err(e.into())
        }
    }
}
