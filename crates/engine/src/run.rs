// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Firing operations: draining the pending set under explicit control.
//!
//! All three operations share the same firing step: remove the next entry,
//! advance the clock to its deadline, invoke the callback with no lock held,
//! then reinsert repeating timers. They differ only in which timers they
//! consider due.

use crate::scheduler::{Scheduler, SchedulerError, TimerEntry, TimerKey};
use cw_core::{Clock, TimerState};
use std::time::Duration;

impl Scheduler {
    /// Fire exactly the timers that were pending when the call began.
    ///
    /// Timers registered during this call, including repeating
    /// re-registrations, stay pending for a later call even when their
    /// deadline is not in the future. Returns the number of timers fired.
    pub fn run_only_pending(&self) -> Result<usize, SchedulerError> {
        let frontier: Vec<TimerKey> = self.state.lock().pending.keys().copied().collect();
        tracing::debug!(count = frontier.len(), "draining pending frontier");

        let mut fired = 0usize;
        let mut first_err = None;
        for key in frontier {
            let Some(entry) = self.take_live(key) else { continue };
            fired += 1;
            if let Err(err) = self.fire_one(key, entry) {
                record_failure(&mut first_err, err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(fired),
        }
    }

    /// Fire every pending timer, chasing work spawned by firing callbacks,
    /// until the pending set is empty.
    ///
    /// Fails with [`SchedulerError::InfiniteSchedule`] once the configured
    /// iteration bound is exceeded (a repeating timer never drains). On a
    /// callback failure the chase stops: timers already pending at that
    /// moment are still attempted, then the first failure is surfaced.
    pub fn run_all(&self) -> Result<usize, SchedulerError> {
        let max = self.config.max_run_iterations;
        let mut fired = 0usize;
        loop {
            let Some(key) = self.next_pending_key() else { return Ok(fired) };
            if fired >= max {
                return Err(SchedulerError::InfiniteSchedule { iterations: max });
            }
            let Some(entry) = self.take_live(key) else { continue };
            fired += 1;
            if let Err(err) = self.fire_one(key, entry) {
                self.finish_batch(&mut fired);
                return Err(err);
            }
        }
    }

    /// Advance virtual time by exactly `duration`, firing every timer whose
    /// deadline falls within the window, including timers spawned mid-advance
    /// whose deadline still lands inside it.
    ///
    /// After all in-window timers fire, the clock sits at exactly
    /// `now + duration` even if nothing fired at that instant.
    pub fn advance_by(&self, duration: Duration) -> Result<usize, SchedulerError> {
        self.ensure_within_max(duration)?;
        let until = self.clock.now() + duration;
        tracing::debug!(until = %until, "advancing virtual time");

        let max = self.config.max_run_iterations;
        let mut fired = 0usize;
        let mut first_err = None;
        loop {
            let Some(key) = self.next_pending_key() else { break };
            if key.fire_at > until {
                break;
            }
            if fired >= max {
                return Err(SchedulerError::InfiniteSchedule { iterations: max });
            }
            let Some(entry) = self.take_live(key) else { continue };
            fired += 1;
            if let Err(err) = self.fire_one(key, entry) {
                record_failure(&mut first_err, err);
            }
        }

        self.clock.advance_to(until);
        match first_err {
            Some(err) => Err(err),
            None => Ok(fired),
        }
    }

    fn next_pending_key(&self) -> Option<TimerKey> {
        self.state.lock().pending.keys().next().copied()
    }

    /// Remove the entry at `key`; cancelled entries are dropped here, which
    /// is where lazy removal happens.
    fn take_live(&self, key: TimerKey) -> Option<TimerEntry> {
        let state = &mut *self.state.lock();
        let entry = state.pending.remove(&key)?;
        if entry.cancelled {
            state.by_id.remove(&entry.id);
            return None;
        }
        // Repeating timers keep their id mapping while they fire, so a
        // callback can cancel its own next activation.
        if !entry.repeating {
            state.by_id.remove(&entry.id);
        }
        Some(entry)
    }

    /// Fire a single entry: advance the clock to its deadline, run the
    /// callback with no lock held, then reinsert if repeating.
    fn fire_one(&self, key: TimerKey, entry: TimerEntry) -> Result<(), SchedulerError> {
        let TimerEntry { id, mut callback, delay, repeating, .. } = entry;

        self.clock.advance_to(key.fire_at);
        tracing::debug!(id = %id, at = %key.fire_at, "timer fired");
        let result = callback();

        let state = &mut *self.state.lock();
        let cancelled_mid_fire = state.statuses.get(&id) == Some(&TimerState::Cancelled);
        if repeating && !cancelled_mid_fire {
            let seq = state.next_seq;
            state.next_seq += 1;
            let new_key = TimerKey { fire_at: key.fire_at + delay, seq };
            state.by_id.insert(id, new_key);
            state.statuses.insert(id, TimerState::Scheduled);
            state.pending.insert(
                new_key,
                TimerEntry {
                    id,
                    callback,
                    delay,
                    scheduled_at: key.fire_at,
                    repeating,
                    cancelled: false,
                },
            );
        } else {
            if repeating {
                state.by_id.remove(&id);
            }
            if !cancelled_mid_fire {
                state.statuses.insert(id, TimerState::Fired);
            }
        }

        result.map_err(|source| SchedulerError::Callback { id, source })
    }

    /// Attempt the timers pending at the moment a callback failed, so a
    /// failure never rolls back or starves work that was already due.
    fn finish_batch(&self, fired: &mut usize) {
        let remainder: Vec<TimerKey> = self.state.lock().pending.keys().copied().collect();
        for key in remainder {
            let Some(entry) = self.take_live(key) else { continue };
            *fired += 1;
            if let Err(err) = self.fire_one(key, entry) {
                tracing::warn!(error = %err, "additional callback failure in batch");
            }
        }
    }
}

fn record_failure(slot: &mut Option<SchedulerError>, err: SchedulerError) {
    match slot {
        None => *slot = Some(err),
        Some(_) => tracing::warn!(error = %err, "additional callback failure in batch"),
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
