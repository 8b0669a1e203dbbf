//! Dispatcher driven handler by handler, with an in-memory command log as hardware.

use elevator_dispatch::elevator_logic::Dispatcher;
use elevator_dispatch::{CabinBehaviour, DispatchError, Dirn, FloorRange, HardwareCommand};

use HardwareCommand::{MoveDown, MoveUp, StopAndOpenDoors};

type TestDispatcher = Dispatcher<Vec<HardwareCommand>>;

fn dispatcher(min: i32, max: i32, start: i32) -> TestDispatcher {
    Dispatcher::new(FloorRange::new(min, max).unwrap(), start, Vec::new()).unwrap()
}

/// Commands issued since the last call.
fn issued(d: &mut TestDispatcher) -> Vec<HardwareCommand> {
    d.hardware_mut().drain(..).collect()
}

/// Idle at `from`, a passenger walks in and presses `to`. Cabin is moving afterwards.
fn take_to(to: i32, from: i32) -> TestDispatcher {
    let mut d = dispatcher(1, 10, from);
    let dirn = if to > from { Dirn::Up } else { Dirn::Down };
    d.floor_button_pressed(from, dirn).unwrap();
    d.on_doors_closed(from).unwrap();
    d.cabin_button_pressed(to).unwrap();
    issued(&mut d);
    d
}

#[test]
fn cab_call_from_idle_is_served_and_cabin_goes_idle() {
    let mut d = dispatcher(1, 10, 1);

    d.cabin_button_pressed(5).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
    assert_eq!(d.behaviour(), CabinBehaviour::MovingUp);

    d.on_before_floor(3, Dirn::Up).unwrap();
    assert!(issued(&mut d).is_empty());

    d.on_before_floor(5, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert!(!d.pending().cab(5));
    assert!(d.state().doors_open);

    d.on_doors_closed(5).unwrap();
    assert!(issued(&mut d).is_empty());
    assert_eq!(d.behaviour(), CabinBehaviour::Idle);
    assert_eq!(d.state().direction, Dirn::Stop);
}

#[test]
fn opposite_hall_call_is_passed_then_served_on_the_way_back() {
    let mut d = dispatcher(1, 10, 1);
    d.cabin_button_pressed(5).unwrap();
    d.floor_button_pressed(3, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);

    d.on_before_floor(2, Dirn::Up).unwrap();
    d.on_before_floor(3, Dirn::Up).unwrap();
    d.on_before_floor(4, Dirn::Up).unwrap();
    assert!(issued(&mut d).is_empty());
    assert!(d.pending().hall(3, Dirn::Down));

    d.on_before_floor(5, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);

    d.on_doors_closed(5).unwrap();
    assert_eq!(issued(&mut d), vec![MoveDown]);

    d.on_before_floor(4, Dirn::Down).unwrap();
    assert!(issued(&mut d).is_empty());
    d.on_before_floor(3, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert!(d.pending().is_empty());
}

#[test]
fn both_hall_calls_at_the_last_floor_are_served_in_one_stop() {
    let mut d = dispatcher(1, 10, 1);
    d.floor_button_pressed(6, Dirn::Up).unwrap();
    d.floor_button_pressed(6, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);

    for floor in 2..6 {
        d.on_before_floor(floor, Dirn::Up).unwrap();
    }
    d.on_before_floor(6, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert!(d.pending().is_empty());

    d.on_doors_closed(6).unwrap();
    assert!(issued(&mut d).is_empty());
    assert_eq!(d.behaviour(), CabinBehaviour::Idle);
}

#[test]
fn out_of_range_requests_are_rejected_without_change() {
    let mut d = dispatcher(1, 10, 1);
    let before = d.snapshot();

    assert!(matches!(d.cabin_button_pressed(11), Err(DispatchError::InvalidFloor { floor: 11, .. })));
    assert!(matches!(d.floor_button_pressed(0, Dirn::Up), Err(DispatchError::InvalidFloor { .. })));
    assert!(matches!(d.floor_button_pressed(4, Dirn::Stop), Err(DispatchError::MissingDirection { .. })));

    assert_eq!(d.snapshot(), before);
    assert!(issued(&mut d).is_empty());
}

#[test]
fn invalid_start_floor_is_a_config_error() {
    let range = FloorRange::new(1, 5).unwrap();
    assert!(matches!(
        Dispatcher::new(range, 7, Vec::<HardwareCommand>::new()),
        Err(DispatchError::InvalidConfig(_))
    ));
}

#[test]
fn pressing_twice_is_the_same_as_pressing_once() {
    let mut once = dispatcher(1, 10, 1);
    let mut twice = dispatcher(1, 10, 1);
    for d in [&mut once, &mut twice] {
        d.cabin_button_pressed(7).unwrap();
        d.floor_button_pressed(4, Dirn::Down).unwrap();
    }
    twice.cabin_button_pressed(7).unwrap();
    twice.floor_button_pressed(4, Dirn::Down).unwrap();

    assert_eq!(once.pending(), twice.pending());
    assert_eq!(issued(&mut once), issued(&mut twice));
}

#[test]
fn hardware_events_in_the_wrong_state_are_ignored() {
    let mut d = dispatcher(1, 10, 3);
    assert!(matches!(
        d.on_doors_closed(3),
        Err(DispatchError::InvalidStateTransition { behaviour: CabinBehaviour::Idle, .. })
    ));
    assert!(d.on_before_floor(4, Dirn::Up).is_err());

    d.cabin_button_pressed(5).unwrap();
    d.on_before_floor(4, Dirn::Up).unwrap();
    d.on_before_floor(5, Dirn::Up).unwrap();
    issued(&mut d);

    // Duplicate approach while the doors are open
    let err = d.on_before_floor(5, Dirn::Up).unwrap_err();
    assert!(err.is_hardware_inconsistency());
    assert_eq!(d.behaviour(), CabinBehaviour::DoorOpen);
    assert!(issued(&mut d).is_empty());
}

#[test]
fn terminal_hall_calls_are_turned_around() {
    let mut d = dispatcher(1, 3, 2);
    d.floor_button_pressed(1, Dirn::Down).unwrap();
    assert!(d.pending().hall(1, Dirn::Up));
    d.floor_button_pressed(3, Dirn::Up).unwrap();
    assert!(d.pending().hall(3, Dirn::Down));
}

#[test]
fn call_at_bottom_floor_opens_doors_then_cab_call_goes_up() {
    let mut d = dispatcher(1, 3, 1);

    d.floor_button_pressed(1, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    d.on_doors_closed(1).unwrap();
    assert!(issued(&mut d).is_empty());
    d.cabin_button_pressed(2).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
}

#[test]
fn call_at_top_floor_opens_doors_then_cab_call_goes_down() {
    let mut d = dispatcher(1, 3, 3);

    d.floor_button_pressed(3, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    d.on_doors_closed(3).unwrap();
    assert!(issued(&mut d).is_empty());
    d.cabin_button_pressed(2).unwrap();
    assert_eq!(issued(&mut d), vec![MoveDown]);
}

#[test]
fn cab_call_for_current_floor_reopens_doors() {
    let mut d = dispatcher(1, 10, 1);
    d.floor_button_pressed(1, Dirn::Up).unwrap();
    d.on_doors_closed(1).unwrap();
    issued(&mut d);

    d.cabin_button_pressed(1).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
}

#[test]
fn destination_pressed_before_doors_close_resumes_in_same_direction() {
    let mut d = dispatcher(1, 10, 1);
    d.floor_button_pressed(5, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
    d.on_before_floor(5, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);

    d.cabin_button_pressed(10).unwrap();
    assert!(issued(&mut d).is_empty());
    d.on_doors_closed(5).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
}

#[test]
fn destination_pressed_after_doors_close_starts_from_idle() {
    let mut d = dispatcher(1, 10, 1);
    d.floor_button_pressed(5, Dirn::Up).unwrap();
    d.on_before_floor(5, Dirn::Up).unwrap();
    d.on_doors_closed(5).unwrap();
    issued(&mut d);
    assert_eq!(d.behaviour(), CabinBehaviour::Idle);

    d.cabin_button_pressed(10).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
}

#[test]
fn calls_behind_do_not_turn_the_cabin_before_the_top_request() {
    let mut d = take_to(6, 1);
    d.on_before_floor(2, Dirn::Up).unwrap();
    d.floor_button_pressed(1, Dirn::Up).unwrap();
    d.floor_button_pressed(10, Dirn::Down).unwrap();
    for floor in 3..6 {
        d.on_before_floor(floor, Dirn::Up).unwrap();
    }
    assert!(issued(&mut d).is_empty());

    d.on_before_floor(6, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    d.on_doors_closed(6).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
}

#[test]
fn call_below_while_doors_open_waits_for_requests_above() {
    let mut d = take_to(4, 1);
    d.cabin_button_pressed(7).unwrap();
    d.on_before_floor(2, Dirn::Up).unwrap();
    d.on_before_floor(3, Dirn::Up).unwrap();
    assert!(issued(&mut d).is_empty());

    d.on_before_floor(4, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    d.cabin_button_pressed(3).unwrap();
    d.on_doors_closed(4).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
}

#[test]
fn request_at_open_doors_is_served_without_a_command() {
    let mut d = dispatcher(1, 10, 10);
    d.floor_button_pressed(10, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);

    d.cabin_button_pressed(5).unwrap();
    d.cabin_button_pressed(10).unwrap();
    assert!(issued(&mut d).is_empty());
    assert!(!d.pending().cab(10));

    d.on_doors_closed(10).unwrap();
    assert_eq!(issued(&mut d), vec![MoveDown]);
    for floor in (6..10).rev() {
        d.on_before_floor(floor, Dirn::Down).unwrap();
    }
    assert!(issued(&mut d).is_empty());
    d.on_before_floor(5, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    d.on_doors_closed(5).unwrap();
    assert!(issued(&mut d).is_empty());
    assert_eq!(d.behaviour(), CabinBehaviour::Idle);
}

#[test]
fn opposite_hall_call_at_open_doors_is_queued_until_they_close() {
    let mut d = dispatcher(1, 10, 1);
    d.floor_button_pressed(5, Dirn::Up).unwrap();
    d.on_before_floor(5, Dirn::Up).unwrap();
    d.cabin_button_pressed(8).unwrap();
    issued(&mut d);

    d.floor_button_pressed(5, Dirn::Down).unwrap();
    assert!(issued(&mut d).is_empty());
    assert!(d.pending().hall(5, Dirn::Down));

    d.on_doors_closed(5).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
    assert!(d.pending().hall(5, Dirn::Down));
}

#[test]
fn stop_on_the_way_keeps_the_next_destination() {
    let mut d = take_to(8, 7);
    d.cabin_button_pressed(10).unwrap();
    d.on_before_floor(8, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);

    d.cabin_button_pressed(9).unwrap();
    assert!(issued(&mut d).is_empty());
    d.on_doors_closed(8).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
    d.on_before_floor(9, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
}

#[test]
fn committed_direction_wins_over_a_closer_request_behind() {
    let mut d = dispatcher(1, 10, 5);
    d.floor_button_pressed(4, Dirn::Down).unwrap();
    d.floor_button_pressed(1, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![MoveDown]);

    d.on_before_floor(4, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);

    d.cabin_button_pressed(5).unwrap();
    assert!(issued(&mut d).is_empty());
    d.on_doors_closed(4).unwrap();
    assert_eq!(issued(&mut d), vec![MoveDown]);
}

#[test]
fn direction_mismatch_follows_the_hardware() {
    let mut d = dispatcher(1, 10, 5);
    d.cabin_button_pressed(9).unwrap();
    d.cabin_button_pressed(2).unwrap();
    issued(&mut d);

    d.on_before_floor(4, Dirn::Down).unwrap();
    assert_eq!(d.behaviour(), CabinBehaviour::MovingDown);
    assert_eq!(d.state().current_floor, 4);
}

#[test]
fn snapshot_lists_outstanding_requests() {
    let mut d = dispatcher(1, 10, 1);
    d.cabin_button_pressed(6).unwrap();
    d.floor_button_pressed(3, Dirn::Down).unwrap();
    d.floor_button_pressed(3, Dirn::Up).unwrap();

    let snap = d.snapshot();
    assert_eq!(snap.cab_requests, vec![6]);
    assert_eq!(snap.hall_requests, vec![(3, Dirn::Up), (3, Dirn::Down)]);
    assert_eq!(snap.behaviour, CabinBehaviour::MovingUp);

    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("MovingUp"));
}

#[test]
fn reversal_stop_commits_to_the_way_back() {
    let mut d = dispatcher(1, 10, 5);
    d.cabin_button_pressed(8).unwrap();
    d.floor_button_pressed(2, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);

    for floor in 6..8 {
        d.on_before_floor(floor, Dirn::Up).unwrap();
    }
    d.on_before_floor(8, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert_eq!(d.last_dirn(), Dirn::Down);

    // Cabin leaves downwards: the up caller waits, the down caller boards
    d.floor_button_pressed(8, Dirn::Up).unwrap();
    d.floor_button_pressed(8, Dirn::Down).unwrap();
    assert!(issued(&mut d).is_empty());
    assert!(d.pending().hall(8, Dirn::Up));
    assert!(!d.pending().hall(8, Dirn::Down));

    d.on_doors_closed(8).unwrap();
    assert_eq!(issued(&mut d), vec![MoveDown]);
    for floor in (3..8).rev() {
        d.on_before_floor(floor, Dirn::Down).unwrap();
    }
    assert!(issued(&mut d).is_empty());
    d.on_before_floor(2, Dirn::Down).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert_eq!(d.last_dirn(), Dirn::Up);

    d.on_doors_closed(2).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp]);
    for floor in 3..8 {
        d.on_before_floor(floor, Dirn::Up).unwrap();
    }
    assert!(issued(&mut d).is_empty());
    d.on_before_floor(8, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert!(d.pending().is_empty());
}

#[test]
fn any_hall_call_boards_when_nothing_else_is_pending() {
    let mut d = dispatcher(1, 10, 1);
    d.cabin_button_pressed(4).unwrap();
    for floor in 2..=4 {
        d.on_before_floor(floor, Dirn::Up).unwrap();
    }
    assert_eq!(issued(&mut d), vec![MoveUp, StopAndOpenDoors]);
    assert_eq!(d.last_dirn(), Dirn::Stop);

    d.floor_button_pressed(4, Dirn::Down).unwrap();
    assert!(issued(&mut d).is_empty());
    assert!(d.pending().is_empty());
    assert_eq!(d.last_dirn(), Dirn::Down);

    d.on_doors_closed(4).unwrap();
    assert!(d.hardware().is_empty());
    assert_eq!(d.behaviour(), CabinBehaviour::Idle);
}

#[test]
fn idle_hall_call_then_opposite_call_at_open_doors_boards_at_once() {
    let mut d = dispatcher(1, 10, 5);
    d.floor_button_pressed(5, Dirn::Up).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert_eq!(d.last_dirn(), Dirn::Up);

    d.floor_button_pressed(5, Dirn::Down).unwrap();
    assert!(issued(&mut d).is_empty());
    assert!(d.pending().is_empty());

    d.on_doors_closed(5).unwrap();
    assert!(issued(&mut d).is_empty());
    assert_eq!(d.behaviour(), CabinBehaviour::Idle);
}

#[test]
fn doors_reopen_when_only_the_current_floor_is_pending() {
    let mut d = dispatcher(1, 10, 1);
    d.cabin_button_pressed(3).unwrap();
    d.on_before_floor(2, Dirn::Up).unwrap();
    d.on_before_floor(3, Dirn::Up).unwrap();
    d.cabin_button_pressed(4).unwrap();
    assert_eq!(issued(&mut d), vec![MoveUp, StopAndOpenDoors]);

    // Hardware reports the doors closing one floor up: the request there is served by
    // reopening instead of moving
    d.on_doors_closed(4).unwrap();
    assert_eq!(issued(&mut d), vec![StopAndOpenDoors]);
    assert_eq!(d.behaviour(), CabinBehaviour::DoorOpen);
    assert_eq!(d.state().current_floor, 4);
    assert!(d.pending().is_empty());

    d.on_doors_closed(4).unwrap();
    assert!(issued(&mut d).is_empty());
    assert_eq!(d.behaviour(), CabinBehaviour::Idle);
}
