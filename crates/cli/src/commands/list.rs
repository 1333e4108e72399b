// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jrun list` — print jobs grouped by status, optionally pruning
//! terminal jobs and their archives afterward.

use std::sync::Arc;

use anyhow::Result;
use jrun_core::Status;
use jrun_storage::{DependencyStore, FileQueue, FsDependencyStore, JobQueue};

use crate::color;

pub fn run(prune: bool) -> Result<()> {
    let config = super::state_config()?;
    let depends: Arc<dyn DependencyStore> = Arc::new(FsDependencyStore::new(&config.dep_root)?);
    let queue = FileQueue::new(&config.queue_root, Some(depends))?;

    let jobs = queue.list(true, None)?;
    if jobs.is_empty() {
        println!("{}", color::context("No jobs"));
    } else {
        for status in Status::ALL {
            let bucket: Vec<_> = jobs.iter().filter(|j| j.status == status).collect();
            if bucket.is_empty() {
                continue;
            }
            println!("{}", color::header(&format!("{status}:")));
            for job in bucket {
                println!(
                    "  {}: ({}) {} in {}",
                    job.order,
                    color::literal(job.id.as_str()),
                    job.command,
                    color::context(&job.workdir.display().to_string()),
                );
            }
        }
    }

    if prune {
        let terminal_ids: Vec<_> =
            jobs.iter().filter(|j| j.status.is_terminal()).map(|j| j.id.clone()).collect();
        queue.prune()?;
        for id in terminal_ids {
            let archive = config.log_root.join(id.as_str());
            match std::fs::remove_file(&archive) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        println!("{}", color::header("Pruned done/failed jobs and their archives"));
    }
    Ok(())
}
