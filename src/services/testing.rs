//! Deterministic collaborators for workflow and HTTP tests.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::clock::Clock;
use super::randomizer::Randomizer;

/// Randomizer spy that records each call's `n` and applies a fixed swap plan.
pub struct ScriptedRandomizer {
    reverse: bool,
    calls: Mutex<Vec<usize>>,
}

impl ScriptedRandomizer {
    /// Records calls and leaves the order untouched.
    pub fn identity() -> Self {
        Self {
            reverse: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Records calls and reverses the order.
    pub fn reversing() -> Self {
        Self {
            reverse: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The `n` of every shuffle performed so far.
    pub fn calls(&self) -> Vec<usize> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Randomizer for ScriptedRandomizer {
    fn shuffle(&self, n: usize, swap: &mut dyn FnMut(usize, usize)) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(n),
            Err(poisoned) => poisoned.into_inner().push(n),
        }
        if self.reverse {
            for i in 0..n / 2 {
                swap(i, n - 1 - i);
            }
        }
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        // 2025-11-01T12:00:00Z
        Self(DateTime::from_timestamp(1_761_998_400, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
