// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::timer::{CallbackError, TimerCallback};
use parking_lot::Mutex;
use std::sync::Arc;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for scheduler property tests.
pub mod strategies {
    use proptest::prelude::*;
    use std::time::Duration;

    /// Bounded millisecond delays.
    pub fn arb_delay() -> impl Strategy<Value = Duration> {
        (0u64..10_000).prop_map(Duration::from_millis)
    }
}

// ── Callback spies ──────────────────────────────────────────────────────

/// Counting spy for timer callbacks.
///
/// Clones share one counter, so a test can hand a callback to the scheduler
/// and keep a handle for assertions.
#[derive(Clone, Default)]
pub struct Spy {
    calls: Arc<Mutex<usize>>,
}

impl Spy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a callback minted from this spy has fired.
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }

    /// A callback that records the invocation and succeeds.
    pub fn callback(&self) -> TimerCallback {
        let calls = Arc::clone(&self.calls);
        Box::new(move || {
            *calls.lock() += 1;
            Ok(())
        })
    }

    /// A callback that records the invocation, then fails with `msg`.
    pub fn failing_callback(&self, msg: &str) -> TimerCallback {
        let calls = Arc::clone(&self.calls);
        let msg = msg.to_string();
        Box::new(move || {
            *calls.lock() += 1;
            Err(CallbackError::from(msg.clone()))
        })
    }
}
