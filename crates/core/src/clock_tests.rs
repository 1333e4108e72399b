// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_epoch_and_instant_together() {
    let clock = FakeClock::new();
    let before = clock.epoch_micros();
    let before_instant = clock.now();
    clock.advance_micros(1_500);
    assert_eq!(clock.epoch_micros(), before + 1_500);
    assert!(clock.now() > before_instant);
}

#[test]
fn fake_clock_set_epoch_micros_is_absolute() {
    let clock = FakeClock::new();
    clock.set_epoch_micros(42);
    assert_eq!(clock.epoch_micros(), 42);
}

#[test]
fn system_clock_epoch_micros_is_plausible() {
    let clock = SystemClock;
    // Any time after 2020-01-01 in microseconds.
    assert!(clock.epoch_micros() > 1_577_836_800_000_000);
}
