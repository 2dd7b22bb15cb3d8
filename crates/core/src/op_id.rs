// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operation identifiers.
//!
//! An [`OpId`] combines the wall clock time at which an operation was
//! enqueued with a logical counter and a per-installation node suffix.
//!
//! Format: `{wall_ms}-{counter}-{node}`
//!
//! Ordering follows generation order on a single node:
//! 1. Higher wall_ms wins
//! 2. If wall_ms equal, higher counter wins
//! 3. If both equal, higher node wins (deterministic tiebreaker)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hasher};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Unique identifier of a queued operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OpId {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for ids generated within the same millisecond.
    pub counter: u32,
    /// Node suffix distinguishing installations.
    pub node: u32,
}

impl OpId {
    /// Creates a new id with the given components.
    pub fn new(wall_ms: u64, counter: u32, node: u32) -> Self {
        OpId { wall_ms, counter, node }
    }
}

impl Ord for OpId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wall_ms
            .cmp(&other.wall_ms)
            .then_with(|| self.counter.cmp(&other.counter))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for OpId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wall_ms, self.counter, self.node)
    }
}

impl FromStr for OpId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(Error::InvalidOpId(format!(
                "expected format 'wall_ms-counter-node', got '{s}'"
            )));
        }

        let wall_ms = parts[0]
            .parse::<u64>()
            .map_err(|_| Error::InvalidOpId(format!("invalid wall_ms '{}' in '{s}'", parts[0])))?;

        let counter = parts[1]
            .parse::<u32>()
            .map_err(|_| Error::InvalidOpId(format!("invalid counter '{}' in '{s}'", parts[1])))?;

        let node = parts[2]
            .parse::<u32>()
            .map_err(|_| Error::InvalidOpId(format!("invalid node '{}' in '{s}'", parts[2])))?;

        Ok(OpId::new(wall_ms, counter, node))
    }
}

impl From<OpId> for String {
    fn from(id: OpId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for OpId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

/// Returns a randomly seeded node suffix.
pub fn random_node() -> u32 {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u32(std::process::id());
    hasher.write_u64(SystemClock.now_ms());
    (hasher.finish() & 0xFFFF_FFFF) as u32
}

struct GeneratorState {
    last_wall_ms: u64,
    last_counter: u32,
}

/// Generator of strictly increasing operation ids.
///
/// Ids keep increasing even if the wall clock goes backwards, so the id
/// order always matches enqueue order.
pub struct OpIdGenerator<C: ClockSource = SystemClock> {
    clock: C,
    node: u32,
    state: Mutex<GeneratorState>,
}

impl OpIdGenerator<SystemClock> {
    /// Creates a generator using the system clock and the given node suffix.
    pub fn new(node: u32) -> Self {
        Self::with_clock(SystemClock, node)
    }

    /// Creates a generator with a random node suffix.
    pub fn random() -> Self {
        Self::new(random_node())
    }
}

impl<C: ClockSource> OpIdGenerator<C> {
    /// Creates a generator with a custom clock source.
    pub fn with_clock(clock: C, node: u32) -> Self {
        OpIdGenerator {
            clock,
            node,
            state: Mutex::new(GeneratorState { last_wall_ms: 0, last_counter: 0 }),
        }
    }

    /// Returns the node suffix of this generator.
    pub fn node(&self) -> u32 {
        self.node
    }

    /// Moves the generator past an id that already exists (for example one
    /// rehydrated from disk), so new ids sort after it.
    pub fn observe(&self, existing: &OpId) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if existing.wall_ms > state.last_wall_ms {
            state.last_wall_ms = existing.wall_ms;
            state.last_counter = existing.counter;
        } else if existing.wall_ms == state.last_wall_ms {
            state.last_counter = state.last_counter.max(existing.counter);
        }
    }

    /// Generates a new id.
    pub fn next_id(&self) -> OpId {
        let physical = self.clock.now_ms();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if physical > state.last_wall_ms {
            state.last_wall_ms = physical;
            state.last_counter = 0;
        } else {
            state.last_counter = state.last_counter.saturating_add(1);
        }

        OpId::new(state.last_wall_ms, state.last_counter, self.node)
    }
}

#[cfg(test)]
#[path = "op_id_tests.rs"]
mod tests;
