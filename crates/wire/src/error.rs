// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced while parsing or serving the thin HTTP-ish framing in
/// front of the job runner. Deliberately narrow: this crate does not
/// implement the framing itself, only the shapes and errors callers on
/// either side of it need to agree on.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("missing required query parameter {0:?}")]
    MissingQueryParam(&'static str),
    #[error("invalid json body: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
