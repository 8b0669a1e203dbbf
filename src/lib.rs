#![warn(missing_docs)]
//! # This projects library
//!
//! This library dispatches a single elevator cabin over a contiguous range of floors using the
//! SCAN policy, and ships a simulated cabin to drive it.
//!
//! ## Overview
//! - **config**: Constants and runtime print toggles.
//! - **print**: Coloured terminal logging and the status table.
//! - **error**: Error type returned by every fallible operation.
//! - **init**: Command line arguments and scenario files.
//! - **cabin**: Floors, directions, cabin state and state-machine states.
//! - **elevio**: Hardware commands out, hardware and button events in.
//! - **elevator_logic**: The dispatcher: request bookkeeping, SCAN decisions, state machine and event loop.
//! - **sim**: Simulated cabin, lockstep and realtime.

pub mod config;

pub mod print;

pub mod error;

pub mod init;

pub mod cabin;

pub mod elevio;

pub mod elevator_logic;

pub mod sim;

pub use cabin::{CabinBehaviour, CabinState, Dirn, Floor, FloorRange};
pub use elevator_logic::Dispatcher;
pub use elevio::{ElevEvent, Hardware, HardwareCommand};
pub use error::DispatchError;
