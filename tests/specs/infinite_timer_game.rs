//! Infinite timer game specs
//!
//! Each round of the fixture game ends after one second; ending a round
//! notifies the player and lines the next round up ten seconds out, forever.

use crate::prelude::*;

/// Schedule the end of the current round; when it fires, notify the player
/// and schedule the next round ten seconds later.
fn infinite_timer_game(sched: &Scheduler, player: &Spy) {
    let handle = sched.clone();
    let player = player.clone();
    sched
        .register(ms(1000), move || {
            let mut notify = player.callback();
            notify()?;

            let next_sched = handle.clone();
            let next_player = player.clone();
            handle.register(ms(10_000), move || {
                infinite_timer_game(&next_sched, &next_player);
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();
}

#[test]
fn schedules_a_ten_second_restart_after_one_second() {
    let sched = Scheduler::new();
    let player = Spy::new();
    infinite_timer_game(&sched, &player);

    // One registration so far: the end of the first round
    let log = sched.call_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].delay, ms(1000));

    // Exhaust only the timers already waiting, not any they spawn
    sched.run_only_pending().unwrap();

    assert_eq!(player.call_count(), 1);
    let log = sched.call_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].delay, ms(10_000));
    assert_eq!(sched.pending_count(), 1);
}

#[test]
fn rounds_play_out_under_windowed_advances() {
    let sched = Scheduler::new();
    let player = Spy::new();
    infinite_timer_game(&sched, &player);

    // Round one ends at 1s; the restart fires at 11s and schedules the
    // next round's end at 12s, just past this window.
    sched.advance_by(ms(11_000)).unwrap();
    assert_eq!(player.call_count(), 1);
    assert_eq!(sched.pending_count(), 1);

    sched.advance_by(ms(1_000)).unwrap();
    assert_eq!(player.call_count(), 2);
}

#[test]
fn running_all_timers_on_an_endless_game_is_detected() {
    let sched = Scheduler::with_config(SchedulerConfig::default().max_run_iterations(64));
    let player = Spy::new();
    infinite_timer_game(&sched, &player);

    let err = sched.run_all().unwrap_err();
    assert!(matches!(err, SchedulerError::InfiniteSchedule { iterations: 64 }));
}
