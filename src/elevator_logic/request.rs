//! Pending requests and the stop / direction decision logic.
//!
//! This module provides the request store and helper functions for determining the next
//! action of the cabin, based on its position, travel direction and pending requests.
//!
//! # Overview
//! - Checking for cab or hall requests above, below or at a floor.
//! - Determining whether to stop at a floor being approached (SCAN with reversal rule).
//! - Choosing the direction to commit to when the cabin is at rest.
//! - Clearing exactly the requests a stop services.
//!
//! # Behaviour
//! The decision functions are stateless and take the request store by reference. The only
//! mutation is [PendingRequests::insert_hall] / [PendingRequests::insert_cab] and
//! [clear_at_floor], all of which keep floors inside the [FloorRange] given at construction.

use serde::{Serialize, Deserialize};

use crate::cabin::{Dirn, Floor, FloorRange};
use crate::error::DispatchError;

/// All outstanding hall and cabin requests.
///
/// Storage is one `[up, down]` pair and one cab flag per served floor, so uniqueness per
/// (floor, direction) and per floor is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequests {
    range: FloorRange,

    /// `hall[i] = [up, down]` for floor `range.min() + i`
    hall: Vec<[bool; 2]>,

    /// `cab[i]` for floor `range.min() + i`
    cab: Vec<bool>,
}

impl PendingRequests {
    /// An empty store for `range`.
    pub fn new(range: FloorRange) -> Self {
        PendingRequests {
            range,
            hall: vec![[false; 2]; range.len()],
            cab: vec![false; range.len()],
        }
    }

    /// The served floors
    pub fn range(&self) -> FloorRange {
        self.range
    }

    /// Registers a hall call. Returns `Ok(true)` if it was new, `Ok(false)` if already pending.
    pub fn insert_hall(&mut self, floor: Floor, dirn: Dirn) -> Result<bool, DispatchError> {
        let floor = self.range.check(floor)?;
        let btn = dirn.hall_index().ok_or(DispatchError::MissingDirection {
            event: "floor_button_pressed",
            floor,
            dirn,
        })?;
        let slot = &mut self.hall[self.range.index(floor)][btn];
        let added = !*slot;
        *slot = true;
        Ok(added)
    }

    /// Registers a cab call. Returns `Ok(true)` if it was new, `Ok(false)` if already pending.
    pub fn insert_cab(&mut self, floor: Floor) -> Result<bool, DispatchError> {
        let floor = self.range.check(floor)?;
        let slot = &mut self.cab[self.range.index(floor)];
        let added = !*slot;
        *slot = true;
        Ok(added)
    }

    /// Is there a hall call at `floor` for `dirn`? Out-of-range floors and `Stop` give `false`.
    pub fn hall(&self, floor: Floor, dirn: Dirn) -> bool {
        match dirn.hall_index() {
            Some(btn) if self.range.contains(floor) => self.hall[self.range.index(floor)][btn],
            _ => false,
        }
    }

    /// Is there a cab call for `floor`?
    pub fn cab(&self, floor: Floor) -> bool {
        self.range.contains(floor) && self.cab[self.range.index(floor)]
    }

    /// Any request of any kind at `floor`.
    pub fn here(&self, floor: Floor) -> bool {
        self.cab(floor) || self.hall(floor, Dirn::Up) || self.hall(floor, Dirn::Down)
    }

    /// Any request strictly above `floor`.
    pub fn above(&self, floor: Floor) -> bool {
        self.range.floors().filter(|f| *f > floor).any(|f| self.here(f))
    }

    /// Any request strictly below `floor`.
    pub fn below(&self, floor: Floor) -> bool {
        self.range.floors().filter(|f| *f < floor).any(|f| self.here(f))
    }

    /// Any request beyond `floor` in `dirn`. Always `false` for `Stop`.
    pub fn ahead(&self, floor: Floor, dirn: Dirn) -> bool {
        match dirn {
            Dirn::Up => self.above(floor),
            Dirn::Down => self.below(floor),
            Dirn::Stop => false,
        }
    }

    /// No requests at all
    pub fn is_empty(&self) -> bool {
        !self.cab.iter().any(|c| *c) && !self.hall.iter().any(|[up, down]| *up || *down)
    }

    /// Number of outstanding requests (each hall direction and each cab flag counts once).
    pub fn len(&self) -> usize {
        let cabs = self.cab.iter().filter(|c| **c).count();
        let halls: usize = self.hall.iter().map(|[up, down]| *up as usize + *down as usize).sum();
        cabs + halls
    }

    /// Floors with an outstanding cab call, bottom to top.
    pub fn cab_floors(&self) -> Vec<Floor> {
        self.range.floors().filter(|f| self.cab(*f)).collect()
    }

    /// Outstanding hall calls as `(floor, dirn)`, bottom to top, `Up` before `Down`.
    pub fn hall_calls(&self) -> Vec<(Floor, Dirn)> {
        let mut calls = Vec::new();
        for floor in self.range.floors() {
            for dirn in [Dirn::Up, Dirn::Down] {
                if self.hall(floor, dirn) {
                    calls.push((floor, dirn));
                }
            }
        }
        calls
    }

    fn clear_hall(&mut self, floor: Floor, dirn: Dirn) -> bool {
        match dirn.hall_index() {
            Some(btn) if self.range.contains(floor) => {
                let idx = self.range.index(floor);
                std::mem::replace(&mut self.hall[idx][btn], false)
            }
            _ => false,
        }
    }

    fn clear_cab(&mut self, floor: Floor) -> bool {
        if !self.range.contains(floor) {
            return false;
        }
        let idx = self.range.index(floor);
        std::mem::replace(&mut self.cab[idx], false)
    }
}

/// Outcome of evaluating a floor the cabin is approaching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    /// Keep going; nothing to do at this floor.
    Pass,
    /// Stop here for a cab call or a hall call in the travel direction.
    Serve,
    /// Stop here and turn around: nothing remains ahead.
    Reverse,
}

impl StopDecision {
    /// `true` unless [StopDecision::Pass]
    pub fn stops(self) -> bool {
        self != StopDecision::Pass
    }
}

/// Determines whether the cabin should stop at `floor` while travelling `dirn`.
///
/// Stops for a cab call, a hall call in the travel direction, or (reversal rule) when
/// nothing remains ahead. The last case covers an opposite-direction hall call at the
/// turning floor and keeps the cabin from running past its last request.
pub fn should_stop(requests: &PendingRequests, floor: Floor, dirn: Dirn) -> StopDecision {
    if requests.cab(floor) || requests.hall(floor, dirn) {
        if requests.ahead(floor, dirn) {
            StopDecision::Serve
        } else {
            StopDecision::Reverse
        }
    } else if !requests.ahead(floor, dirn) {
        StopDecision::Reverse
    } else {
        StopDecision::Pass
    }
}

/// Clears the requests a stop at `floor` services and returns how many were removed.
///
/// Always the cab call and the hall call in `dirn`. On [StopDecision::Reverse] the
/// opposite hall call too, since the cabin is about to turn. With `dirn == Stop` (a stop
/// made from rest) every request at the floor is serviced.
pub fn clear_at_floor(
    requests: &mut PendingRequests,
    floor: Floor,
    dirn: Dirn,
    decision: StopDecision,
) -> usize {
    let mut cleared = requests.clear_cab(floor) as usize;
    match dirn {
        Dirn::Stop => {
            cleared += requests.clear_hall(floor, Dirn::Up) as usize;
            cleared += requests.clear_hall(floor, Dirn::Down) as usize;
        }
        _ => {
            cleared += requests.clear_hall(floor, dirn) as usize;
            if decision == StopDecision::Reverse {
                cleared += requests.clear_hall(floor, dirn.opposite()) as usize;
            }
        }
    }
    cleared
}

/// What to do next with the cabin at rest at `floor` (idle, or doors just closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Start moving in this direction.
    Move(Dirn),
    /// A request is waiting at this very floor: open the doors without moving.
    OpenHere,
    /// Nothing pending.
    Idle,
}

/// Main decision logic for a cabin at rest.
///
/// Keeps `last_dirn` while requests remain beyond `floor` in it, otherwise turns to the
/// opposite side. With no committed direction `Up` is tried first. Requests left only at
/// `floor` itself open the doors again.
pub fn choose_direction(requests: &PendingRequests, floor: Floor, last_dirn: Dirn) -> NextAction {
    let first = if last_dirn == Dirn::Stop { Dirn::Up } else { last_dirn };

    if requests.ahead(floor, first) {
        NextAction::Move(first)
    } else if requests.ahead(floor, first.opposite()) {
        NextAction::Move(first.opposite())
    } else if requests.here(floor) {
        NextAction::OpenHere
    } else {
        NextAction::Idle
    }
}
