// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use yare::parameterized;

/// Mock clock for testing with controllable time.
struct MockClock {
    time_ms: AtomicU64,
}

impl MockClock {
    fn new(initial_ms: u64) -> Self {
        MockClock { time_ms: AtomicU64::new(initial_ms) }
    }

    fn set(&self, ms: u64) {
        self.time_ms.store(ms, AtomicOrdering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now_ms(&self) -> u64 {
        self.time_ms.load(AtomicOrdering::SeqCst)
    }
}

#[test]
fn op_id_ordering() {
    assert!(OpId::new(200, 0, 0) > OpId::new(100, 0, 0));
    assert!(OpId::new(100, 2, 0) > OpId::new(100, 1, 0));
    assert!(OpId::new(100, 1, 2) > OpId::new(100, 1, 1));
}

#[test]
fn op_id_parse_roundtrip() {
    let original = OpId::new(1_700_000_000_000, 42, 99);
    let parsed: OpId = original.to_string().parse().unwrap();
    assert_eq!(original, parsed);
}

#[test]
fn op_id_serializes_as_string() {
    let id = OpId::new(1000, 2, 3);
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"1000-2-3\"");
    let back: OpId = serde_json::from_str("\"1000-2-3\"").unwrap();
    assert_eq!(back, id);
}

#[parameterized(
    invalid_word = { "invalid" },
    two_parts = { "1-2" },
    four_parts = { "1-2-3-4" },
    bad_wall = { "abc-2-3" },
    bad_counter = { "1-abc-3" },
    bad_node = { "1-2-abc" },
)]
fn op_id_parse_errors(input: &str) {
    assert!(matches!(input.parse::<OpId>(), Err(Error::InvalidOpId(_))));
}

#[test]
fn generator_increments_counter_within_same_millisecond() {
    let clock = MockClock::new(1000);
    let generator = OpIdGenerator::with_clock(&clock, 7);

    let a = generator.next_id();
    let b = generator.next_id();

    assert_eq!(a, OpId::new(1000, 0, 7));
    assert_eq!(b, OpId::new(1000, 1, 7));
}

#[test]
fn generator_resets_counter_when_clock_advances() {
    let clock = MockClock::new(1000);
    let generator = OpIdGenerator::with_clock(&clock, 1);

    generator.next_id();
    generator.next_id();
    clock.set(2000);

    assert_eq!(generator.next_id(), OpId::new(2000, 0, 1));
}

#[test]
fn generator_is_monotonic_when_clock_goes_backwards() {
    let clock = MockClock::new(5000);
    let generator = OpIdGenerator::with_clock(&clock, 1);

    let before = generator.next_id();
    clock.set(1000);
    let after = generator.next_id();

    assert!(after > before);
    assert_eq!(after.wall_ms, 5000);
}

#[test]
fn generator_observe_moves_past_existing_ids() {
    let clock = MockClock::new(1000);
    let generator = OpIdGenerator::with_clock(&clock, 1);

    generator.observe(&OpId::new(3000, 4, 9));

    let next = generator.next_id();
    assert!(next > OpId::new(3000, 4, 9));
}

#[test]
fn generated_ids_are_unique() {
    let generator = OpIdGenerator::new(1);
    let mut ids: Vec<OpId> = (0..1000).map(|_| generator.next_id()).collect();
    let len = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), len);
}
