//! Resettable one-shot timeout, polled rather than awaited.
//!
//! The dispatcher itself has no timers. This is used by the realtime simulator for floor
//! travel time and door open time.

use tokio::time::{Duration, Instant};

/// A timer that reports `timed_out` once `duration` has passed since [Timer::start].
#[derive(Debug, Clone)]
pub struct Timer {
    active: bool,
    duration: Duration,
    started: Instant,
}

impl Timer {
    /// An inactive timer.
    pub fn new(duration: Duration) -> Timer {
        Timer {
            active: false,
            duration,
            started: Instant::now(),
        }
    }

    /// (Re)starts the countdown.
    pub fn start(&mut self) {
        self.active = true;
        self.started = Instant::now();
    }

    /// Deactivates the timer; it will not time out until started again.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Is the countdown running (or expired but not yet stopped)?
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` once an active timer has run for longer than its duration.
    pub fn timed_out(&self) -> bool {
        self.active && self.started.elapsed() > self.duration
    }
}
