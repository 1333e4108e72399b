// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency snapshot store: a per-job recursive copy of a source tree,
//! served back as the job's working directory.

use std::fs;
use std::path::{Path, PathBuf};

use jrun_core::JobId;
use walkdir::WalkDir;

use crate::error::DependencyError;

/// Snapshots and serves per-job working directories.
///
/// At most one snapshot exists per job id. The snapshot is created before
/// the job's queue record becomes visible and removed only when the job
/// record is removed (`pop` or `prune`).
pub trait DependencyStore: Send + Sync {
    /// Recursively copy `source` into `<root>/<id>/<basename(source)>`.
    /// A no-op when `source` is `None`. Fails if the per-id destination
    /// already exists, preventing clobber.
    fn snapshot(&self, id: &JobId, source: Option<&Path>) -> Result<(), DependencyError>;

    /// Working directory for `id`, or an empty path when no snapshot exists.
    fn workdir(&self, id: &JobId) -> PathBuf;

    /// Recursively remove `<root>/<id>`. Idempotent and silent on missing.
    fn clear(&self, id: &JobId) -> Result<(), DependencyError>;
}

/// Filesystem-backed dependency store rooted at a directory.
///
/// Symlinks are not followed; only regular file contents are copied.
#[derive(Debug, Clone)]
pub struct FsDependencyStore {
    root: PathBuf,
}

impl FsDependencyStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DependencyError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn id_dir(&self, id: &JobId) -> PathBuf {
        self.root.join(id.as_str())
    }
}

impl DependencyStore for FsDependencyStore {
    fn snapshot(&self, id: &JobId, source: Option<&Path>) -> Result<(), DependencyError> {
        let Some(source) = source else {
            return Ok(());
        };
        let dest_root = self.id_dir(id);
        if dest_root.is_dir() {
            return Err(DependencyError::AlreadyExists { id: id.to_string() });
        }
        let basename = source
            .file_name()
            .ok_or_else(|| DependencyError::InvalidSource(source.to_path_buf()))?;
        copy_tree(source, &dest_root.join(basename))
    }

    fn workdir(&self, id: &JobId) -> PathBuf {
        let dir = self.id_dir(id);
        let Ok(mut entries) = fs::read_dir(&dir) else {
            return PathBuf::new();
        };
        match entries.next() {
            Some(Ok(entry)) => entry.path(),
            _ => PathBuf::new(),
        }
    }

    fn clear(&self, id: &JobId) -> Result<(), DependencyError> {
        match fs::remove_dir_all(self.id_dir(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Recursively copy `source` into `dest`, skipping symlinks.
fn copy_tree(source: &Path, dest: &Path) -> Result<(), DependencyError> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| DependencyError::Walk(e.to_string()))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir yields only descendants of its root");
        let target = dest.join(rel);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
