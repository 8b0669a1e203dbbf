//! ## Elevator I/O: the contract between the dispatcher and the outside world
//!
//! ## Overview
//! This module defines the only boundary the dispatcher has:
//!
//! - `HardwareCommand`: the three commands the dispatcher may issue.
//! - `Hardware`: trait the actuation layer implements to receive those commands.
//! - `ElevEvent`: every inbound notification, hardware events and button presses alike.
//! - `CommandSender` / `EventChannels`: `crossbeam_channel` plumbing so that producers on
//!   different threads are serialized into one queue before reaching the decision logic.
//!
//! Commands are fire-and-forget. Nothing is returned synchronously from hardware; its
//! answers arrive later as [ElevEvent]s.

use crossbeam_channel as cbc;
use serde::{Serialize, Deserialize};

use crate::cabin::{Dirn, Floor};
use crate::print;

/// A motion command issued to the hardware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardwareCommand {
    /// Begin moving upward. Only valid with doors closed.
    MoveUp,
    /// Begin moving downward. Only valid with doors closed.
    MoveDown,
    /// Halt at the current floor and open the doors.
    StopAndOpenDoors,
}

/// The actuation layer as seen from the dispatcher.
///
/// Implementors only need [Hardware::command]; the named methods mirror the physical
/// interface and forward to it.
pub trait Hardware {
    /// Deliver one command. Must not block on the hardware acting on it.
    fn command(&mut self, cmd: HardwareCommand);

    /// Start moving the cabin upward
    fn move_up(&mut self) {
        self.command(HardwareCommand::MoveUp);
    }

    /// Start moving the cabin downward
    fn move_down(&mut self) {
        self.command(HardwareCommand::MoveDown);
    }

    /// Stop at the current floor and open the doors
    fn stop_and_open_doors(&mut self) {
        self.command(HardwareCommand::StopAndOpenDoors);
    }
}

/// In-memory command log. Used by the lockstep simulator and by tests.
impl Hardware for Vec<HardwareCommand> {
    fn command(&mut self, cmd: HardwareCommand) {
        self.push(cmd);
    }
}

impl<H: Hardware + ?Sized> Hardware for Box<H> {
    fn command(&mut self, cmd: HardwareCommand) {
        (**self).command(cmd);
    }
}

/// Forwards commands over a channel to whatever drives the physical cabin.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: cbc::Sender<HardwareCommand>,
}

impl CommandSender {
    /// Creates a sender and the receiver the hardware side should drain.
    pub fn new() -> (Self, cbc::Receiver<HardwareCommand>) {
        let (tx, rx) = cbc::unbounded::<HardwareCommand>();
        (CommandSender { tx }, rx)
    }
}

impl Hardware for CommandSender {
    fn command(&mut self, cmd: HardwareCommand) {
        if self.tx.send(cmd).is_err() {
            print::err(format!("Hardware command channel closed, dropped {:?}", cmd));
        }
    }
}

/// Every notification the dispatcher reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElevEvent {
    /// Hall call button outside the cabin (`floorButtonPressed`).
    FloorButton {
        /// Floor the button is on
        floor: Floor,
        /// Requested travel direction
        dirn: Dirn,
    },
    /// Destination button inside the cabin (`cabinButtonPressed`).
    CabinButton {
        /// Requested destination
        floor: Floor,
    },
    /// Hardware: the cabin is about to reach `floor` travelling `dirn`.
    BeforeFloor {
        /// Floor being approached
        floor: Floor,
        /// Direction of travel
        dirn: Dirn,
    },
    /// Hardware: doors have fully closed at `floor`.
    DoorsClosed {
        /// Floor the cabin is standing at
        floor: Floor,
    },
}

impl ElevEvent {
    /// `true` for passenger button presses, `false` for hardware notifications.
    pub fn is_button(&self) -> bool {
        matches!(self, ElevEvent::FloorButton { .. } | ElevEvent::CabinButton { .. })
    }
}

/// The single-consumer event queue in front of the dispatcher.
///
/// Clone `tx` into every producer (button poller, hardware callback, script). The
/// dispatcher loop owns `rx`, which is what serializes all mutations.
pub struct EventChannels {
    /// Producer side, clone freely
    pub tx: cbc::Sender<ElevEvent>,
    /// Consumer side, owned by [crate::elevator_logic::run_dispatcher]
    pub rx: cbc::Receiver<ElevEvent>,
}

impl EventChannels {
    /// Creates an unbounded queue.
    pub fn new() -> Self {
        let (tx, rx) = cbc::unbounded::<ElevEvent>();
        EventChannels { tx, rx }
    }
}

impl Default for EventChannels {
    fn default() -> Self {
        Self::new()
    }
}
