// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifiers: lexicographically monotonic timestamp stamps.
//!
//! A job id is the 26-character string `YYYY-MM-DD-HH-MM-SS-uuuuuu`
//! (4-2-2-2-2-2-6 digit groups joined by `-`), assigned at submit time
//! from the clock's microsecond epoch. Because every field is
//! fixed-width and zero-padded, plain string comparison is chronological
//! order — list/dequeue never need to parse the timestamp back out.

use std::borrow::Borrow;
use std::fmt;

use thiserror::Error;

/// Length in bytes of a well-formed job id.
pub const JOB_ID_LEN: usize = 26;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("job id does not match YYYY-MM-DD-HH-MM-SS-uuuuuu: {0:?}")]
    Malformed(String),
}

/// Unique identifier for a job, also its FIFO ordering key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Stamp a new id from an epoch-microseconds timestamp.
    ///
    /// Not guaranteed unique under concurrent callers at the same
    /// microsecond; [`crate::job::Status`] callers are expected to
    /// re-stamp (advance by one microsecond) on collision, per the
    /// queue's `enqueue` contract.
    pub fn from_epoch_micros(micros: i64) -> Self {
        let secs = micros.div_euclid(1_000_000);
        let subsec_micros = micros.rem_euclid(1_000_000) as u32;
        let dt = chrono::DateTime::from_timestamp(secs, subsec_micros * 1_000)
            .unwrap_or_else(|| chrono::DateTime::from_timestamp(0, 0).expect("epoch is valid"));
        Self(dt.format("%Y-%m-%d-%H-%M-%S-%6f").to_string())
    }

    /// Parse and validate an existing stamp (e.g. a filename read off disk).
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if is_valid_stamp(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(IdError::Malformed(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validate the fixed `\d{4}(-\d{2}){5}-\d{6}` layout without pulling in
/// a regex dependency for a single, fixed-width shape.
pub fn is_valid_stamp(s: &str) -> bool {
    if s.len() != JOB_ID_LEN {
        return false;
    }
    let parts: Vec<&str> = s.split('-').collect();
    let expected_lens: [usize; 7] = [4, 2, 2, 2, 2, 2, 6];
    if parts.len() != expected_lens.len() {
        return false;
    }
    parts
        .iter()
        .zip(expected_lens)
        .all(|(part, len)| part.len() == len && part.bytes().all(|b| b.is_ascii_digit()))
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl TryFrom<String> for JobId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_valid_stamp(&s) {
            Ok(Self(s))
        } else {
            Err(IdError::Malformed(s))
        }
    }
}

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    let end = n.min(s.len());
    &s[..end]
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
