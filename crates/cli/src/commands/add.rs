// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jrun add` — submit a new job.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use jrun_storage::{DependencyStore, FileQueue, FsDependencyStore, JobQueue};

use crate::color;

pub fn run(command: String, dir: Option<PathBuf>) -> Result<()> {
    if command.trim().is_empty() {
        bail!("Invalid command");
    }

    let config = super::state_config()?;
    let depends: Arc<dyn DependencyStore> = Arc::new(FsDependencyStore::new(&config.dep_root)?);
    let queue = FileQueue::new(&config.queue_root, Some(depends))?;
    let job = queue.enqueue(&command, dir.as_deref())?;

    println!(
        "{}\n- Order: {}\n- ID: {}\n- Command: {}\n- Workdir: {}",
        color::header("Queued:"),
        job.order,
        color::literal(job.id.as_str()),
        job.command,
        job.workdir.display(),
    );
    Ok(())
}
