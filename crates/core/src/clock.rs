// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time, abstracted so job-id
/// generation and worker idle loops can be driven deterministically
/// in tests.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;

    /// Microseconds since the Unix epoch. Job ids are stamped from this.
    fn epoch_micros(&self) -> i64;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_micros(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as i64
    }
}

/// Fake clock for testing with controllable, monotonic time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    epoch_micros: Arc<Mutex<i64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            epoch_micros: Arc::new(Mutex::new(1_000_000_000)),
        }
    }

    /// Advance the clock by the given number of microseconds.
    pub fn advance_micros(&self, micros: i64) {
        *self.current.lock() += std::time::Duration::from_micros(micros.max(0) as u64);
        *self.epoch_micros.lock() += micros;
    }

    pub fn set_epoch_micros(&self, micros: i64) {
        *self.epoch_micros.lock() = micros;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn epoch_micros(&self) -> i64 {
        *self.epoch_micros.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
