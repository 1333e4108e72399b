// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker's stdout splitter.
//!
//! Ordinary `BufReader::read_line` only recognizes `\n` and has no bound
//! on how much unterminated input it will buffer. Interactive subprocesses
//! routinely emit bare `\r` (progress bars, carriage-return redraws) and a
//! runaway process with no newlines at all must not be allowed to grow
//! this buffer without limit, so this reader is hand-rolled.

use tokio::io::{AsyncRead, AsyncReadExt};

/// Default cap on how many unterminated bytes accumulate before being
/// flushed as a line on their own. Chosen generously above any normal
/// terminal line length; only pathological output (a binary blob with no
/// newline) should ever hit it.
pub const DEFAULT_MAX_LINE: usize = 64 * 1024;

/// Splits an async byte stream into lines, treating `\n`, bare `\r`, and
/// `\r\n` all as a single separator (collapsing the pair). Never drops
/// bytes: a line longer than `max_len` is flushed as-is without its
/// terminator, and accumulation simply continues from there, so the
/// eventual real newline still produces a (now shorter) trailing line.
/// The final partial line, if any, is flushed on EOF.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    max_len: usize,
    eof: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_max_len(inner, DEFAULT_MAX_LINE)
    }

    pub fn with_max_len(inner: R, max_len: usize) -> Self {
        Self { inner, buf: Vec::new(), max_len, eof: false }
    }

    /// Next decoded line, or `None` at EOF with nothing left to flush.
    /// Invalid UTF-8 is replaced lossily rather than erroring, matching
    /// subprocess output that is not guaranteed to be valid text.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.flush_buf()));
            }
            if self.buf.len() >= self.max_len {
                return Ok(Some(self.flush_buf()));
            }
            let mut chunk = [0u8; 4096];
            let n = self.inner.read(&mut chunk).await?;
            if n == 0 {
                self.eof = true;
                continue;
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn flush_buf(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        line
    }

    fn take_line(&mut self) -> Option<String> {
        let sep = self.buf.iter().position(|&b| b == b'\n' || b == b'\r')?;
        let consumed = if self.buf[sep] == b'\r' && self.buf.get(sep + 1) == Some(&b'\n') {
            sep + 2
        } else {
            sep + 1
        };
        let line = String::from_utf8_lossy(&self.buf[..sep]).into_owned();
        self.buf.drain(..consumed);
        Some(line)
    }
}

#[cfg(test)]
#[path = "line_reader_tests.rs"]
mod tests;
