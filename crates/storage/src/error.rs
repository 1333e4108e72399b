// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the durable queue and dependency store.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dependency snapshot already exists for job {id}")]
    AlreadyExists { id: String },
    #[error("source path has no file name: {0:?}")]
    InvalidSource(PathBuf),
    #[error("walking source tree: {0}")]
    Walk(String),
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error("no todo job found for id {id}")]
    NotFound { id: String },
}
