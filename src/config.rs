//! # config.rs – Centralized Parameter Store
//!
//! This module holds all static program parameters used throughout the system.
//! Keeping configuration in one place makes tuning, experimentation, and testing easier.
//!
//! Runtime-adjustable values (the print toggles) live behind a `Mutex` so that
//! [crate::init::parse_args] can flip them before the dispatcher starts.

use std::sync::Mutex;
use std::time::Duration;
use once_cell::sync::Lazy;

use crate::cabin::Floor;

//
// ──────────────────────────────────────────────────────────────
//   1. SHAFT PARAMETERS
// ──────────────────────────────────────────────────────────────
//

/// Lowest floor served when no scenario overrides it
pub const DEFAULT_MIN_FLOOR: Floor = 1;

/// Highest floor served when no scenario overrides it
pub const DEFAULT_MAX_FLOOR: Floor = 10;

/// Floor the cabin is parked at on startup
pub const DEFAULT_START_FLOOR: Floor = 1;

/// Widest shaft a [crate::cabin::FloorRange] accepts
pub const MAX_SHAFT_FLOORS: usize = 1_000;

//
// ──────────────────────────────────────────────────────────────
//   2. SIMULATOR TIMING
// ──────────────────────────────────────────────────────────────
//

/// Time the simulated cabin spends travelling between two adjacent floors
pub const FLOOR_TRAVEL_TIME: Duration = Duration::from_millis(400);

/// Time the simulated doors stay open before reporting `doors_closed`
pub const DOOR_OPEN_TIME: Duration = Duration::from_millis(800);

/// How often the realtime simulator drains the hardware command channel
pub const SIM_POLL: Duration = Duration::from_millis(5);

/// Extra time the demo keeps running after the last scheduled button press
pub const SETTLE_TIME: Duration = Duration::from_secs(10);

/// Upper bound on lockstep iterations before the simulation is declared stuck
pub const LOCKSTEP_MAX_STEPS: usize = 10_000;

//
// ──────────────────────────────────────────────────────────────
//   3. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of the dispatcher status table
pub static PRINT_STATUS_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Reads a print toggle. A poisoned lock still holds a valid `bool`, so it is used as is.
pub fn toggle(flag: &Mutex<bool>) -> bool {
    match flag.lock() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Sets a print toggle.
pub fn set_toggle(flag: &Mutex<bool>, value: bool) {
    match flag.lock() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}
