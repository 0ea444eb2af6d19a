// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler state, registration, and cancellation.
//!
//! The firing operations (`run_only_pending`, `run_all`, `advance_by`) live
//! in the `run` module.

use cw_core::{CallRecord, Clock, TimerCallback, TimerId, TimerState, VirtualClock, VirtualInstant};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Timers fired by one `run_all`/`advance_by` call before giving up.
pub const DEFAULT_MAX_RUN_ITERATIONS: usize = 100_000;

/// Registration delays and advance windows beyond this are rejected.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Errors raised by scheduler operations
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Delay or advance window beyond the configured maximum.
    ///
    /// Negative inputs are unrepresentable (`Duration` is unsigned), so the
    /// upper bound is the only delay validation left to do at runtime.
    #[error("invalid delay: {}ms exceeds the configured maximum of {}ms", .delay.as_millis(), .max.as_millis())]
    InvalidDelay { delay: Duration, max: Duration },

    /// The pending set did not drain within the iteration bound.
    #[error("pending timers did not settle within {iterations} firings")]
    InfiniteSchedule { iterations: usize },

    /// A fired callback failed.
    #[error("timer {id} callback failed: {source}")]
    Callback { id: TimerId, source: cw_core::CallbackError },
}

/// Tunable bounds for a [`Scheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum timers fired by a single `run_all` or `advance_by` call.
    pub max_run_iterations: usize,
    /// Maximum accepted registration delay or advance window.
    pub max_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_run_iterations: DEFAULT_MAX_RUN_ITERATIONS, max_delay: DEFAULT_MAX_DELAY }
    }
}

impl SchedulerConfig {
    cw_core::setters! {
        set {
            max_run_iterations: usize,
            max_delay: Duration,
        }
    }
}

/// Ordering key for pending timers: deadline first, then registration
/// sequence (FIFO tie-break at equal deadlines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct TimerKey {
    pub(crate) fire_at: VirtualInstant,
    pub(crate) seq: u64,
}

/// A registered timer awaiting its deadline.
pub(crate) struct TimerEntry {
    pub(crate) id: TimerId,
    pub(crate) callback: TimerCallback,
    pub(crate) delay: Duration,
    pub(crate) scheduled_at: VirtualInstant,
    pub(crate) repeating: bool,
    pub(crate) cancelled: bool,
}

/// Process-wide scheduler state for the lifetime of one test.
#[derive(Default)]
pub(crate) struct SchedulerState {
    pub(crate) pending: BTreeMap<TimerKey, TimerEntry>,
    pub(crate) by_id: HashMap<TimerId, TimerKey>,
    pub(crate) statuses: HashMap<TimerId, TimerState>,
    pub(crate) call_log: Vec<CallRecord>,
    pub(crate) next_id: u64,
    pub(crate) next_seq: u64,
}

/// Shared handle to one virtual scheduler.
///
/// Clones share state, so a fixture can capture a handle and register or
/// cancel timers from inside a firing callback; the state lock is never held
/// while a callback runs.
#[derive(Clone)]
pub struct Scheduler {
    pub(crate) clock: VirtualClock,
    pub(crate) state: Arc<Mutex<SchedulerState>>,
    pub(crate) config: SchedulerConfig,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            clock: VirtualClock::new(),
            state: Arc::new(Mutex::new(SchedulerState::default())),
            config,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> VirtualInstant {
        self.clock.now()
    }

    /// Shared clock handle for injection into code under test
    pub fn clock(&self) -> VirtualClock {
        self.clock.clone()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Reinitialize all state: pending timers, call log, id counters, and
    /// virtual time. For reuse between independent test cases.
    pub fn reset(&self) {
        *self.state.lock() = SchedulerState::default();
        self.clock.reset();
        tracing::debug!("scheduler reset");
    }

    /// Register a one-shot timer firing `delay` after the current instant.
    ///
    /// Returns the new timer's id without firing anything; control only
    /// comes back to the callback through an explicit run/advance call.
    pub fn register<F>(&self, delay: Duration, callback: F) -> Result<TimerId, SchedulerError>
    where
        F: FnMut() -> Result<(), cw_core::CallbackError> + Send + 'static,
    {
        self.register_inner(delay, Box::new(callback), false)
    }

    /// Register a repeating timer.
    ///
    /// After each firing the timer re-enters the pending set with the same
    /// id and delay, deadline one `delay` past the instant it fired.
    pub fn register_repeating<F>(
        &self,
        delay: Duration,
        callback: F,
    ) -> Result<TimerId, SchedulerError>
    where
        F: FnMut() -> Result<(), cw_core::CallbackError> + Send + 'static,
    {
        self.register_inner(delay, Box::new(callback), true)
    }

    fn register_inner(
        &self,
        delay: Duration,
        callback: TimerCallback,
        repeating: bool,
    ) -> Result<TimerId, SchedulerError> {
        self.ensure_within_max(delay)?;
        let now = self.clock.now();
        let state = &mut *self.state.lock();

        let id = TimerId::from_raw(state.next_id);
        state.next_id += 1;
        let seq = state.next_seq;
        state.next_seq += 1;

        let key = TimerKey { fire_at: now + delay, seq };
        state.call_log.push(CallRecord { id, delay, repeating, registered_at: now });
        state.by_id.insert(id, key);
        state.statuses.insert(id, TimerState::Scheduled);
        state.pending.insert(
            key,
            TimerEntry { id, callback, delay, scheduled_at: now, repeating, cancelled: false },
        );

        tracing::debug!(id = %id, delay_ms = delay.as_millis() as u64, repeating, "timer registered");
        Ok(id)
    }

    /// Cancel a pending timer.
    ///
    /// Unknown or already-fired ids are a silent no-op. The entry is only
    /// flagged here; it is skipped and removed when its turn comes up.
    pub fn cancel(&self, id: TimerId) {
        let state = &mut *self.state.lock();
        let Some(&key) = state.by_id.get(&id) else {
            tracing::debug!(id = %id, "cancel of unknown timer ignored");
            return;
        };
        match state.pending.get_mut(&key) {
            Some(entry) if entry.cancelled => return,
            Some(entry) => entry.cancelled = true,
            // Mid-firing repeating timer: drop the upcoming re-registration.
            None => {}
        }
        state.statuses.insert(id, TimerState::Cancelled);
        tracing::debug!(id = %id, "timer cancelled");
    }

    /// Number of live (non-cancelled) pending timers
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.values().filter(|entry| !entry.cancelled).count()
    }

    /// Ordered log of every registration made through this scheduler
    pub fn call_log(&self) -> Vec<CallRecord> {
        self.state.lock().call_log.clone()
    }

    /// Lifecycle state of a timer, or `None` for an id this scheduler never
    /// assigned (or assigned before the last `reset`).
    pub fn timer_state(&self, id: TimerId) -> Option<TimerState> {
        self.state.lock().statuses.get(&id).copied()
    }

    pub(crate) fn ensure_within_max(&self, delay: Duration) -> Result<(), SchedulerError> {
        if delay > self.config.max_delay {
            return Err(SchedulerError::InvalidDelay { delay, max: self.config.max_delay });
        }
        Ok(())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
