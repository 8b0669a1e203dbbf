//! # Simulated hardware
//!
//! Stands in for the physical actuation layer so the dispatcher can be exercised end to end.
//!
//! - [SimCabin]: a single cabin in a shaft. Takes [HardwareCommand]s and produces the
//!   hardware half of [ElevEvent] (`BeforeFloor`, `DoorsClosed`).
//! - [Lockstep]: dispatcher and cabin advanced together, one step at a time, with no
//!   wall-clock involved. Deterministic; used by the demo's lockstep mode and by tests.
//! - [run_realtime]: async loop that drives a [SimCabin] from a command channel with
//!   real travel and door timing and feeds events into the dispatcher's queue.

use crossbeam_channel as cbc;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use crate::cabin::{CabinBehaviour, Dirn, Floor, FloorRange};
use crate::config;
use crate::elevator_logic::timer::Timer;
use crate::elevator_logic::Dispatcher;
use crate::elevio::{ElevEvent, HardwareCommand};
use crate::error::DispatchError;
use crate::init::TimedPress;
use crate::print;

/// One simulated cabin.
#[derive(Debug, Clone)]
pub struct SimCabin {
    range: FloorRange,
    floor: Floor,
    motion: Dirn,
    doors_open: bool,
    /// Floors the doors have opened at, in order.
    stops: Vec<Floor>,
}

impl SimCabin {
    /// A parked cabin with closed doors.
    pub fn new(range: FloorRange, floor: Floor) -> Result<Self, DispatchError> {
        let floor = range.check(floor)?;
        Ok(SimCabin { range, floor, motion: Dirn::Stop, doors_open: false, stops: Vec::new() })
    }

    /// Floor the cabin is at, or last reached
    pub fn floor(&self) -> Floor {
        self.floor
    }

    /// Current motion, [Dirn::Stop] when stationary
    pub fn motion(&self) -> Dirn {
        self.motion
    }

    /// Doors open
    pub fn doors_open(&self) -> bool {
        self.doors_open
    }

    /// Every floor the doors have opened at, oldest first
    pub fn stops(&self) -> &[Floor] {
        &self.stops
    }

    /// Applies a command. Commands the cabin cannot physically obey are dropped with a warning.
    pub fn apply(&mut self, cmd: HardwareCommand) {
        match cmd {
            HardwareCommand::MoveUp | HardwareCommand::MoveDown => {
                let dirn = if cmd == HardwareCommand::MoveUp { Dirn::Up } else { Dirn::Down };
                if self.doors_open {
                    print::warn(format!("Sim: {:?} with doors open at {}, ignored", cmd, self.floor));
                } else {
                    self.motion = dirn;
                }
            }
            HardwareCommand::StopAndOpenDoors => {
                self.motion = Dirn::Stop;
                if !self.doors_open {
                    self.doors_open = true;
                    self.stops.push(self.floor);
                }
            }
        }
    }

    /// Moves one floor in the current direction and reports the floor being approached.
    ///
    /// Returns `None` when stationary. Refuses to leave the shaft: at the end the motor is
    /// cut and an error is printed.
    pub fn travel(&mut self) -> Option<ElevEvent> {
        if self.motion == Dirn::Stop || self.doors_open {
            return None;
        }
        let next = match self.motion.step(self.floor) {
            Some(next) if self.range.contains(next) => next,
            _ => {
                print::err(format!("Sim: cabin would leave the shaft past {}, motor stopped", self.floor));
                self.motion = Dirn::Stop;
                return None;
            }
        };
        self.floor = next;
        Some(ElevEvent::BeforeFloor { floor: next, dirn: self.motion })
    }

    /// Closes open doors and reports it. `None` if they were already closed.
    pub fn close_doors(&mut self) -> Option<ElevEvent> {
        if !self.doors_open {
            return None;
        }
        self.doors_open = false;
        Some(ElevEvent::DoorsClosed { floor: self.floor })
    }
}

/// Dispatcher and simulated cabin advanced in lockstep.
///
/// Each [Lockstep::step] forwards the commands the dispatcher issued, then lets the cabin
/// do the one thing it would do next (close doors or travel one floor) and feeds the
/// resulting event back.
pub struct Lockstep {
    /// The dispatcher under test, with an in-memory command log as hardware
    pub dispatcher: Dispatcher<Vec<HardwareCommand>>,
    /// The simulated cabin
    pub cabin: SimCabin,
    /// Every command issued so far, in order
    pub trace: Vec<HardwareCommand>,
}

impl Lockstep {
    /// Both parked at `start_floor`.
    pub fn new(range: FloorRange, start_floor: Floor) -> Result<Self, DispatchError> {
        Ok(Lockstep {
            dispatcher: Dispatcher::new(range, start_floor, Vec::new())?,
            cabin: SimCabin::new(range, start_floor)?,
            trace: Vec::new(),
        })
    }

    /// Delivers a button press (or any event) and forwards the resulting commands.
    pub fn press(&mut self, event: ElevEvent) -> Result<(), DispatchError> {
        let result = self.dispatcher.handle(event);
        self.forward_commands();
        result
    }

    fn forward_commands(&mut self) {
        let issued: Vec<HardwareCommand> = self.dispatcher.hardware_mut().drain(..).collect();
        for cmd in issued {
            self.cabin.apply(cmd);
            self.trace.push(cmd);
        }
    }

    /// Advances the cabin by one action. Returns `false` once nothing is left to do.
    pub fn step(&mut self) -> bool {
        self.forward_commands();
        let event = if self.cabin.doors_open() {
            self.cabin.close_doors()
        } else {
            self.cabin.travel()
        };
        match event {
            Some(event) => {
                let _ = self.dispatcher.handle(event);
                self.forward_commands();
                true
            }
            None => false,
        }
    }

    /// Steps until the cabin is idle. Returns the number of steps taken, or `None` if
    /// `max_steps` was exhausted first.
    pub fn run_until_idle(&mut self, max_steps: usize) -> Option<usize> {
        for taken in 0..max_steps {
            if !self.step() {
                return Some(taken);
            }
        }
        if self.dispatcher.behaviour() == CabinBehaviour::Idle {
            Some(max_steps)
        } else {
            None
        }
    }

    /// Replays timed presses against a simulated clock and runs until idle.
    ///
    /// A travel step advances the clock by `timing.floor_travel`, a door step by
    /// `timing.door_open`. When the cabin is idle the clock jumps to the next press. Returns
    /// the simulated time at which the cabin went idle after the last press.
    pub fn replay(
        &mut self,
        presses: &[TimedPress],
        timing: SimTiming,
        max_steps: usize,
    ) -> anyhow::Result<Duration> {
        let mut presses: Vec<TimedPress> = presses.to_vec();
        presses.sort_by_key(|p| p.at_ms);
        let mut pending = presses.into_iter().peekable();
        let mut clock = Duration::ZERO;

        for _ in 0..max_steps {
            while let Some(press) = pending.next_if(|p| Duration::from_millis(p.at_ms) <= clock) {
                // Rejected presses are already logged by the dispatcher
                let _ = self.press(press.event);
            }

            let cost = if self.cabin.doors_open() { timing.door_open } else { timing.floor_travel };
            if self.step() {
                clock += cost;
                continue;
            }
            match pending.peek() {
                Some(next) => clock = clock.max(Duration::from_millis(next.at_ms)),
                None => return Ok(clock),
            }
        }

        print::err(format!("Lockstep replay did not settle within {} steps", max_steps));
        anyhow::bail!("replay did not settle within {} steps", max_steps)
    }
}

/// Travel and door timing for [run_realtime].
#[derive(Debug, Clone, Copy)]
pub struct SimTiming {
    /// Time between two floors
    pub floor_travel: Duration,
    /// Time doors stay open
    pub door_open: Duration,
    /// Command channel poll period
    pub poll: Duration,
}

impl Default for SimTiming {
    fn default() -> Self {
        SimTiming {
            floor_travel: config::FLOOR_TRAVEL_TIME,
            door_open: config::DOOR_OPEN_TIME,
            poll: config::SIM_POLL,
        }
    }
}

/// Drives `cabin` in real time until `shutdown_rx` turns `true`, then returns it.
///
/// Commands are drained from `commands_rx` every `timing.poll`. A moving cabin reaches the
/// next floor after `timing.floor_travel`; open doors close after `timing.door_open`. Events
/// go to `events_tx`, the dispatcher's queue.
pub async fn run_realtime(
    mut cabin: SimCabin,
    commands_rx: cbc::Receiver<HardwareCommand>,
    events_tx: cbc::Sender<ElevEvent>,
    timing: SimTiming,
    mut shutdown_rx: watch::Receiver<bool>,
) -> SimCabin {
    let mut travel_timer = Timer::new(timing.floor_travel);
    let mut door_timer = Timer::new(timing.door_open);

    loop {
        let shutdown = *shutdown_rx.borrow_and_update();
        if shutdown {
            break;
        }

        while let Ok(cmd) = commands_rx.try_recv() {
            let was_moving = cabin.motion() != Dirn::Stop;
            cabin.apply(cmd);
            if cabin.doors_open() {
                travel_timer.stop();
                if !door_timer.is_active() {
                    door_timer.start();
                }
            } else if cabin.motion() != Dirn::Stop && !was_moving {
                travel_timer.start();
            }
        }

        let event = if door_timer.timed_out() {
            door_timer.stop();
            cabin.close_doors()
        } else if travel_timer.timed_out() {
            let event = cabin.travel();
            if cabin.motion() == Dirn::Stop {
                travel_timer.stop();
            } else {
                travel_timer.start();
            }
            event
        } else {
            None
        };

        if let Some(event) = event {
            if events_tx.send(event).is_err() {
                print::warn("Sim: dispatcher queue closed, stopping".to_string());
                break;
            }
        }

        sleep(timing.poll).await;
    }
    cabin
}
