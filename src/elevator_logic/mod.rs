//! # Dispatcher
//!
//! The dispatcher owns the cabin state and the pending requests, and is the only thing that
//! issues [HardwareCommand](crate::elevio::HardwareCommand)s. It is a plain synchronous state
//! machine: every handler runs to completion and there are no timers inside it.
//!
//! ## Driving it
//! - Directly, by calling the handler methods in [fsm] (tests, lockstep simulation).
//! - Through [Dispatcher::handle] with an [ElevEvent].
//! - From several producer threads via [spawn_dispatcher] / [run_dispatcher], which drain a
//!   single `crossbeam_channel` queue so that all mutations are serialized.

pub mod fsm;
pub mod request;
pub mod timer;

use std::thread;

use crossbeam_channel as cbc;
use serde::{Serialize, Deserialize};

use crate::cabin::{CabinBehaviour, CabinState, Dirn, Floor, FloorRange};
use crate::config;
use crate::elevio::{ElevEvent, EventChannels, Hardware};
use crate::error::DispatchError;
use crate::print;

use request::PendingRequests;

/// Single-cabin SCAN dispatcher.
pub struct Dispatcher<H: Hardware> {
    range: FloorRange,
    state: CabinState,
    behaviour: CabinBehaviour,
    /// Direction the cabin was committed to before it last stopped. Consulted on doors-closed.
    last_dirn: Dirn,
    requests: PendingRequests,
    hw: H,
}

impl<H: Hardware> Dispatcher<H> {
    /// Creates an idle dispatcher with closed doors at `start_floor`.
    pub fn new(range: FloorRange, start_floor: Floor, hw: H) -> Result<Self, DispatchError> {
        if !range.contains(start_floor) {
            return Err(DispatchError::InvalidConfig(format!(
                "start floor {} outside [{}, {}]",
                start_floor,
                range.min(),
                range.max()
            )));
        }
        Ok(Dispatcher {
            range,
            state: CabinState::parked(start_floor),
            behaviour: CabinBehaviour::Idle,
            last_dirn: Dirn::Stop,
            requests: PendingRequests::new(range),
            hw,
        })
    }

    /// Routes an event to its handler. Rejections are logged here and also returned.
    pub fn handle(&mut self, event: ElevEvent) -> Result<(), DispatchError> {
        let result = match event {
            ElevEvent::FloorButton { floor, dirn } => self.floor_button_pressed(floor, dirn),
            ElevEvent::CabinButton { floor } => self.cabin_button_pressed(floor),
            ElevEvent::BeforeFloor { floor, dirn } => self.on_before_floor(floor, dirn),
            ElevEvent::DoorsClosed { floor } => self.on_doors_closed(floor),
        };

        if let Err(e) = &result {
            if e.is_hardware_inconsistency() {
                print::warn(format!("{:?}: {}", event, e));
            } else {
                print::err(format!("Rejected {:?}: {}", event, e));
            }
        }
        result
    }

    /// Served floors
    pub fn range(&self) -> FloorRange {
        self.range
    }

    /// Physical cabin state as last reported
    pub fn state(&self) -> CabinState {
        self.state
    }

    /// Current state-machine state
    pub fn behaviour(&self) -> CabinBehaviour {
        self.behaviour
    }

    /// Direction committed before the last stop, [Dirn::Stop] when idle
    pub fn last_dirn(&self) -> Dirn {
        self.last_dirn
    }

    /// Outstanding requests
    pub fn pending(&self) -> &PendingRequests {
        &self.requests
    }

    /// The hardware handle
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// The hardware handle, mutably (e.g. to drain a command log)
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Consumes the dispatcher and returns its hardware handle.
    pub fn into_hardware(self) -> H {
        self.hw
    }

    /// Serializable copy of everything the status printer shows.
    pub fn snapshot(&self) -> DispatcherSnapshot {
        DispatcherSnapshot {
            min_floor: self.range.min(),
            max_floor: self.range.max(),
            state: self.state,
            behaviour: self.behaviour,
            last_dirn: self.last_dirn,
            cab_requests: self.requests.cab_floors(),
            hall_requests: self.requests.hall_calls(),
        }
    }
}

/// Point-in-time view of a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherSnapshot {
    /// Lowest served floor
    pub min_floor: Floor,
    /// Highest served floor
    pub max_floor: Floor,
    /// Cabin position, motion and doors
    pub state: CabinState,
    /// State-machine state
    pub behaviour: CabinBehaviour,
    /// Direction committed before the last stop
    pub last_dirn: Dirn,
    /// Floors with a cab call
    pub cab_requests: Vec<Floor>,
    /// Outstanding hall calls
    pub hall_requests: Vec<(Floor, Dirn)>,
}

/// Drains `events_rx` into `dispatcher` until every sender is dropped, then hands the
/// dispatcher back.
///
/// This loop is the single consumer that serializes button presses and hardware callbacks
/// arriving on different threads. The status table is printed whenever the state-machine
/// state changes and [config::PRINT_STATUS_ON] is set.
pub fn run_dispatcher<H: Hardware>(
    mut dispatcher: Dispatcher<H>,
    events_rx: cbc::Receiver<ElevEvent>,
) -> Dispatcher<H> {
    print::info(format!(
        "Dispatcher running on floors [{}, {}] from floor {}",
        dispatcher.range.min(),
        dispatcher.range.max(),
        dispatcher.state.current_floor
    ));

    for event in events_rx.iter() {
        let prev_behaviour = dispatcher.behaviour;
        let _ = dispatcher.handle(event);

        if prev_behaviour != dispatcher.behaviour {
            print::info(format!("Behaviour {:?} -> {:?}", prev_behaviour, dispatcher.behaviour));
            if config::toggle(&config::PRINT_STATUS_ON) {
                print::status(&dispatcher.snapshot());
            }
        }
    }

    print::info("Event queue closed, dispatcher stopping".to_string());
    dispatcher
}

/// Starts [run_dispatcher] on its own thread.
///
/// Returns the producer side of the event queue and a handle that yields the dispatcher
/// once every clone of the sender has been dropped.
pub fn spawn_dispatcher<H>(
    dispatcher: Dispatcher<H>,
) -> (cbc::Sender<ElevEvent>, thread::JoinHandle<Dispatcher<H>>)
where
    H: Hardware + Send + 'static,
{
    let channels = EventChannels::new();
    let events_rx = channels.rx;
    let handle = thread::spawn(move || run_dispatcher(dispatcher, events_rx));
    (channels.tx, handle)
}
