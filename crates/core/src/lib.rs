// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-core: Core library for the Clockwork (cw) virtual-time scheduler

pub mod macros;

pub mod clock;
pub mod time;
pub mod timer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, SystemClock, VirtualClock};
#[cfg(any(test, feature = "test-support"))]
pub use test_support::Spy;
pub use time::{format_elapsed_ms, VirtualInstant};
pub use timer::{CallRecord, CallbackError, TimerCallback, TimerId, TimerState};
