// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jrun-storage: the durable job queue and dependency snapshot store
//! (spec §4.A, §4.B).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod dependency;
pub mod error;
pub mod queue;

pub use dependency::{DependencyStore, FsDependencyStore};
pub use error::{DependencyError, QueueError};
pub use queue::{FileQueue, JobQueue, QueueBackend};
