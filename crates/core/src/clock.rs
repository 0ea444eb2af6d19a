// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use crate::time::VirtualInstant;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides the current time on the virtual timeline
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> VirtualInstant;
}

/// Real clock anchored at construction; reports elapsed time since the anchor
#[derive(Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> VirtualInstant {
        VirtualInstant::from(self.start.elapsed())
    }
}

/// Controllable clock for deterministic tests
///
/// Starts at [`VirtualInstant::ZERO`] and only moves forward. Clones share
/// the same underlying instant.
#[derive(Clone)]
pub struct VirtualClock {
    current: Arc<Mutex<VirtualInstant>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self { current: Arc::new(Mutex::new(VirtualInstant::ZERO)) }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock();
        *current = *current + duration;
    }

    /// Advance the clock to `target`; no-op when `target` is in the past
    pub fn advance_to(&self, target: VirtualInstant) {
        let mut current = self.current.lock();
        if target > *current {
            *current = target;
        }
    }

    /// Return the clock to the timeline origin.
    ///
    /// Only for reinitialization between independent test cases; within a
    /// test the clock never moves backwards.
    pub fn reset(&self) {
        *self.current.lock() = VirtualInstant::ZERO;
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> VirtualInstant {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
