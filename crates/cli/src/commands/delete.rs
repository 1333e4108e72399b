// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jrun delete` — remove a todo job.

use std::sync::Arc;

use anyhow::{Context, Result};
use jrun_core::JobId;
use jrun_storage::{DependencyStore, FileQueue, FsDependencyStore, JobQueue};

use crate::color;

pub fn run(id: String) -> Result<()> {
    let job_id = JobId::parse(&id).with_context(|| format!("Invalid ID: {id}"))?;

    let config = super::state_config()?;
    let depends: Arc<dyn DependencyStore> = Arc::new(FsDependencyStore::new(&config.dep_root)?);
    let queue = FileQueue::new(&config.queue_root, Some(depends))?;
    queue.pop(&job_id).with_context(|| "Invalid ID".to_string())?;

    println!("{} {}", color::header("Deleted job:"), color::literal(job_id.as_str()));
    Ok(())
}
