//! Timer game specs
//!
//! A fixture game that ends play one second after it starts. The game takes
//! a scheduler handle instead of reaching for an ambient timer function, so
//! the specs fully control when the end-of-game callback runs.

use crate::prelude::*;

/// End the game one second from now, notifying the player callback.
fn timer_game(sched: &Scheduler, player: &Spy) {
    sched.register(ms(1000), player.callback()).unwrap();
}

#[test]
fn waits_one_second_before_ending_the_game() {
    let sched = Scheduler::new();
    let player = Spy::new();
    timer_game(&sched, &player);

    let log = sched.call_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].delay, ms(1000));

    // Nothing fires until time is driven explicitly
    assert_eq!(player.call_count(), 0);
    assert_eq!(sched.pending_count(), 1);
}

#[test]
fn ends_the_game_after_running_all_timers() {
    let sched = Scheduler::new();
    let player = Spy::new();
    timer_game(&sched, &player);
    assert_eq!(player.call_count(), 0);

    sched.run_all().unwrap();

    assert_eq!(player.call_count(), 1);
    assert_eq!(sched.pending_count(), 0);
    assert_eq!(sched.now(), VirtualInstant::from_millis(1000));
}

#[test]
fn ends_the_game_after_advancing_one_second() {
    let sched = Scheduler::new();
    let player = Spy::new();
    timer_game(&sched, &player);
    assert_eq!(player.call_count(), 0);

    sched.advance_by(ms(1000)).unwrap();

    assert_eq!(player.call_count(), 1);
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn game_can_be_replayed_after_reset() {
    let sched = Scheduler::new();
    let player = Spy::new();
    timer_game(&sched, &player);
    sched.run_all().unwrap();

    sched.reset();
    assert_eq!(sched.now(), VirtualInstant::ZERO);
    assert!(sched.call_log().is_empty());

    // A fresh round observes a clean scheduler
    timer_game(&sched, &player);
    assert_eq!(sched.call_log().len(), 1);
    sched.run_all().unwrap();
    assert_eq!(player.call_count(), 2);
}
