//! Event handlers of the dispatcher state machine.
//!
//! | state        | request arrives           | `before_floor`        | `doors_closed`    |
//! |--------------|---------------------------|-----------------------|-------------------|
//! | `Idle`       | move, or open doors here  | ignored               | ignored           |
//! | `MovingUp/Down` | queued                 | stop decision         | ignored           |
//! | `DoorOpen`   | boards here, or queued    | ignored               | pick next action  |

use crate::cabin::{CabinBehaviour, Dirn, Floor};
use crate::elevio::Hardware;
use crate::error::DispatchError;
use crate::print;

use super::request::{self, NextAction, StopDecision};
use super::Dispatcher;

impl<H: Hardware> Dispatcher<H> {
    /// Hall call button pressed at `floor` for travel in `dirn`.
    ///
    /// A `Down` call at the bottom floor or an `Up` call at the top floor cannot be served
    /// as asked and is turned around.
    pub fn floor_button_pressed(&mut self, floor: Floor, dirn: Dirn) -> Result<(), DispatchError> {
        let floor = self.range.check(floor)?;
        if dirn == Dirn::Stop {
            return Err(DispatchError::MissingDirection { event: "floor_button_pressed", floor, dirn });
        }

        let dirn = if (floor == self.range.min() && dirn == Dirn::Down)
            || (floor == self.range.max() && dirn == Dirn::Up)
        {
            print::warn(format!("Hall call {:?} at terminal floor {}, serving as {:?}", dirn, floor, dirn.opposite()));
            dirn.opposite()
        } else {
            dirn
        };

        self.on_request(floor, Some(dirn))
    }

    /// Destination button pressed inside the cabin.
    pub fn cabin_button_pressed(&mut self, floor: Floor) -> Result<(), DispatchError> {
        let floor = self.range.check(floor)?;
        self.on_request(floor, None)
    }

    /// Hardware: the cabin is about to reach `floor` travelling `dirn`.
    ///
    /// This is the only chance to stop there. Ignored unless the cabin is moving.
    pub fn on_before_floor(&mut self, floor: Floor, dirn: Dirn) -> Result<(), DispatchError> {
        let floor = self.range.check(floor)?;
        if dirn == Dirn::Stop {
            return Err(DispatchError::MissingDirection { event: "before_floor", floor, dirn });
        }
        match self.behaviour {
            CabinBehaviour::MovingUp | CabinBehaviour::MovingDown => {}
            behaviour => {
                return Err(DispatchError::InvalidStateTransition { event: "before_floor", behaviour });
            }
        }

        // Hardware is the ground truth for where and which way the cabin goes.
        if dirn != self.behaviour.dirn() {
            print::warn(format!(
                "before_floor({}, {:?}) while committed {:?}, following hardware",
                floor, dirn, self.behaviour
            ));
            self.behaviour = CabinBehaviour::moving(dirn);
        }
        self.state.current_floor = floor;
        self.state.direction = dirn;

        let decision = request::should_stop(&self.requests, floor, dirn);
        if decision.stops() {
            self.stop_at(floor, dirn, decision);
        }
        Ok(())
    }

    /// Hardware: doors have closed at `floor`. Picks the next motion, or goes idle.
    pub fn on_doors_closed(&mut self, floor: Floor) -> Result<(), DispatchError> {
        let floor = self.range.check(floor)?;
        if self.behaviour != CabinBehaviour::DoorOpen {
            return Err(DispatchError::InvalidStateTransition {
                event: "doors_closed",
                behaviour: self.behaviour,
            });
        }
        if floor != self.state.current_floor {
            print::warn(format!(
                "doors_closed at {} but doors opened at {}, following hardware",
                floor, self.state.current_floor
            ));
            self.state.current_floor = floor;
        }
        self.state.doors_open = false;

        self.resume();
        Ok(())
    }

    fn on_request(&mut self, floor: Floor, hall: Option<Dirn>) -> Result<(), DispatchError> {
        let here = floor == self.state.current_floor;

        match self.behaviour {
            CabinBehaviour::Idle if here => {
                if let Some(dirn) = hall {
                    self.last_dirn = dirn;
                }
                self.open_doors_here();
                Ok(())
            }
            CabinBehaviour::DoorOpen if here && self.boards_here(hall) => {
                if let Some(dirn) = hall {
                    self.last_dirn = dirn;
                }
                print::info(format!("Request at {} served, doors already open", floor));
                Ok(())
            }
            CabinBehaviour::Idle => {
                self.insert(floor, hall)?;
                self.resume();
                Ok(())
            }
            CabinBehaviour::MovingUp | CabinBehaviour::MovingDown | CabinBehaviour::DoorOpen => {
                self.insert(floor, hall)
            }
        }
    }

    /// Can a request at the open-door floor be served without moving? Cab calls always
    /// can; a hall call only if the cabin will leave in its direction, or has nowhere to go.
    fn boards_here(&self, hall: Option<Dirn>) -> bool {
        let Some(dirn) = hall else {
            return true;
        };
        match self.departure_dirn() {
            Dirn::Stop => true,
            departure => departure == dirn,
        }
    }

    /// Direction the cabin will leave in once the doors close, [Dirn::Stop] if none.
    fn departure_dirn(&self) -> Dirn {
        match request::choose_direction(&self.requests, self.state.current_floor, self.last_dirn) {
            NextAction::Move(dirn) => dirn,
            NextAction::OpenHere | NextAction::Idle => Dirn::Stop,
        }
    }

    fn insert(&mut self, floor: Floor, hall: Option<Dirn>) -> Result<(), DispatchError> {
        let added = match hall {
            Some(dirn) => self.requests.insert_hall(floor, dirn)?,
            None => self.requests.insert_cab(floor)?,
        };
        if added {
            print::info(format!("New request: floor {} {:?}", floor, hall));
        }
        Ok(())
    }

    /// Runs direction selection for a cabin at rest with closed doors.
    fn resume(&mut self) {
        let floor = self.state.current_floor;
        match request::choose_direction(&self.requests, floor, self.last_dirn) {
            NextAction::Move(dirn) => self.start_moving(dirn),
            NextAction::OpenHere => self.open_doors_here(),
            NextAction::Idle => {
                self.behaviour = CabinBehaviour::Idle;
                self.state.direction = Dirn::Stop;
                self.last_dirn = Dirn::Stop;
                print::ok(format!("Idle at floor {}", floor));
            }
        }
    }

    fn start_moving(&mut self, dirn: Dirn) {
        match dirn {
            Dirn::Up => self.hw.move_up(),
            Dirn::Down => self.hw.move_down(),
            Dirn::Stop => {
                print::cosmic_err("start_moving(Stop)".to_string());
                return;
            }
        }
        self.behaviour = CabinBehaviour::moving(dirn);
        self.state.direction = dirn;
        self.last_dirn = dirn;
    }

    fn stop_at(&mut self, floor: Floor, dirn: Dirn, decision: StopDecision) {
        let cleared = request::clear_at_floor(&mut self.requests, floor, dirn, decision);
        print::info(format!("Stopping at {} ({:?}), {} request(s) served", floor, decision, cleared));
        // A reversal commits to the way back, or to nothing if nothing is left behind
        self.last_dirn = match decision {
            StopDecision::Reverse if self.requests.ahead(floor, dirn.opposite()) => dirn.opposite(),
            StopDecision::Reverse => Dirn::Stop,
            StopDecision::Serve | StopDecision::Pass => dirn,
        };
        self.open_doors();
    }

    fn open_doors_here(&mut self) {
        let floor = self.state.current_floor;
        request::clear_at_floor(&mut self.requests, floor, Dirn::Stop, StopDecision::Serve);
        self.open_doors();
    }

    fn open_doors(&mut self) {
        self.hw.stop_and_open_doors();
        self.behaviour = CabinBehaviour::DoorOpen;
        self.state.direction = Dirn::Stop;
        self.state.doors_open = true;
    }
}
