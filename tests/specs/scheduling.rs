//! Cross-cutting scheduling specs
//!
//! Ordering, window boundaries, cancellation, isolation, and call-log
//! inspection across the public surface.

use crate::prelude::*;
use std::sync::{Arc, Mutex};

#[test]
fn equal_deadline_timers_fire_in_registration_order() {
    let sched = Scheduler::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second"] {
        let sink = Arc::clone(&order);
        sched
            .register(ms(1000), move || {
                sink.lock().unwrap().push(tag);
                Ok(())
            })
            .unwrap();
    }

    sched.run_all().unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn boundary_advance_fires_exactly_once() {
    let sched = Scheduler::new();
    let spy = Spy::new();
    sched.register(ms(1000), spy.callback()).unwrap();

    sched.advance_by(ms(999)).unwrap();
    assert_eq!(spy.call_count(), 0);

    sched.advance_by(ms(1)).unwrap();
    assert_eq!(spy.call_count(), 1);

    // Long after the deadline, a one-shot timer stays fired
    sched.advance_by(ms(60_000)).unwrap();
    assert_eq!(spy.call_count(), 1);
}

#[test]
fn cancelled_timer_never_fires() {
    let sched = Scheduler::new();
    let spy = Spy::new();
    let id = sched.register(ms(1000), spy.callback()).unwrap();

    sched.cancel(id);
    sched.advance_by(ms(10_000)).unwrap();

    assert_eq!(spy.call_count(), 0);
    assert_eq!(sched.timer_state(id), Some(TimerState::Cancelled));
}

#[test]
fn schedulers_are_isolated_from_each_other() {
    let a = Scheduler::new();
    let b = Scheduler::new();
    let spy = Spy::new();
    a.register(ms(100), spy.callback()).unwrap();

    // Driving one scheduler leaves the other untouched
    b.advance_by(ms(1000)).unwrap();
    assert_eq!(spy.call_count(), 0);
    assert_eq!(a.pending_count(), 1);
    assert_eq!(b.now(), VirtualInstant::from_millis(1000));
    assert_eq!(a.now(), VirtualInstant::ZERO);
}

#[test]
fn call_log_serializes_for_inspection() {
    let sched = Scheduler::new();
    sched.register(ms(1000), || Ok(())).unwrap();
    sched.advance_by(ms(500)).unwrap();
    sched.register_repeating(ms(250), || Ok(())).unwrap();

    let json = serde_json::to_value(sched.call_log()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {
                "id": 0,
                "delay": { "secs": 1, "nanos": 0 },
                "repeating": false,
                "registered_at": { "secs": 0, "nanos": 0 },
            },
            {
                "id": 1,
                "delay": { "secs": 0, "nanos": 250_000_000 },
                "repeating": true,
                "registered_at": { "secs": 0, "nanos": 500_000_000 },
            },
        ])
    );
}
