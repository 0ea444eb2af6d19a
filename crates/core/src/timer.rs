// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer handles, lifecycle states, and registration records.
//!
//! A timer is registered with a delay and an opaque callback; the scheduler
//! assigns it a monotonic [`TimerId`] and records a [`CallRecord`] that tests
//! can inspect in place of spying on an ambient registration function.

use crate::time::VirtualInstant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unique handle for a registered timer.
///
/// Assigned monotonically at registration time; never reused within one
/// scheduler lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Lifecycle state of a timer.
///
/// `Scheduled` moves to `Fired` or `Cancelled`; both are terminal unless the
/// timer is repeating, in which case firing re-enters `Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Scheduled,
    Fired,
    Cancelled,
}

crate::simple_display! {
    TimerState {
        Scheduled => "scheduled",
        Fired => "fired",
        Cancelled => "cancelled",
    }
}

impl TimerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TimerState::Fired | TimerState::Cancelled)
    }
}

/// Error surfaced by a failing callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A unit of work fired by the scheduler: zero-argument, may fail.
pub type TimerCallback = Box<dyn FnMut() -> Result<(), CallbackError> + Send>;

/// One recorded registration, kept in order for test inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: TimerId,
    pub delay: Duration,
    pub repeating: bool,
    pub registered_at: VirtualInstant,
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
