//! Cabin state types shared by the dispatcher, the hardware contract and the simulator.

use serde::{Serialize, Deserialize};

use crate::config;
use crate::error::DispatchError;

/// A physical stop. Any integer is a floor; which ones are served is decided by [FloorRange].
pub type Floor = i32;

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Direction of travel. `Stop` is the idle cabin with no committed direction.
pub enum Dirn {
    Down = -1,
    Stop = 0,
    Up = 1,
}

impl Dirn {
    /// The reverse direction. `Stop` stays `Stop`.
    pub fn opposite(self) -> Dirn {
        match self {
            Dirn::Up => Dirn::Down,
            Dirn::Down => Dirn::Up,
            Dirn::Stop => Dirn::Stop,
        }
    }

    /// Index of the hall button for this direction in a `[up, down]` pair.
    pub fn hall_index(self) -> Option<usize> {
        match self {
            Dirn::Up => Some(0),
            Dirn::Down => Some(1),
            Dirn::Stop => None,
        }
    }

    /// The floor one step away in this direction, `None` past the end of [Floor].
    pub fn step(self, floor: Floor) -> Option<Floor> {
        floor.checked_add(self as Floor)
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// What the dispatcher believes the cabin is doing
pub enum CabinBehaviour {
    Idle,
    MovingUp,
    MovingDown,
    DoorOpen,
}

impl CabinBehaviour {
    /// The motion behaviour for a direction. `Stop` maps to `Idle`.
    pub fn moving(dirn: Dirn) -> CabinBehaviour {
        match dirn {
            Dirn::Up => CabinBehaviour::MovingUp,
            Dirn::Down => CabinBehaviour::MovingDown,
            Dirn::Stop => CabinBehaviour::Idle,
        }
    }

    /// Direction of motion, `Stop` when not moving.
    pub fn dirn(self) -> Dirn {
        match self {
            CabinBehaviour::MovingUp => Dirn::Up,
            CabinBehaviour::MovingDown => Dirn::Down,
            CabinBehaviour::Idle | CabinBehaviour::DoorOpen => Dirn::Stop,
        }
    }
}

/// Closed interval of served floors, fixed at construction.
///
/// Holds at most [config::MAX_SHAFT_FLOORS] floors, since per-floor request storage is dense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFloorRange")]
pub struct FloorRange {
    min: Floor,
    max: Floor,
}

#[derive(Deserialize)]
struct RawFloorRange {
    min: Floor,
    max: Floor,
}

impl TryFrom<RawFloorRange> for FloorRange {
    type Error = DispatchError;

    fn try_from(raw: RawFloorRange) -> Result<Self, Self::Error> {
        FloorRange::new(raw.min, raw.max)
    }
}

impl FloorRange {
    /// Creates `[min, max]`. Fails if the interval is empty or wider than
    /// [config::MAX_SHAFT_FLOORS].
    pub fn new(min: Floor, max: Floor) -> Result<Self, DispatchError> {
        if min > max {
            return Err(DispatchError::InvalidConfig(format!(
                "min_floor {} is above max_floor {}",
                min, max
            )));
        }
        let span = i64::from(max) - i64::from(min) + 1;
        if span > config::MAX_SHAFT_FLOORS as i64 {
            return Err(DispatchError::InvalidConfig(format!(
                "[{}, {}] spans {} floors, at most {} supported",
                min, max, span, config::MAX_SHAFT_FLOORS
            )));
        }
        Ok(FloorRange { min, max })
    }

    /// Lowest served floor
    pub fn min(&self) -> Floor {
        self.min
    }

    /// Highest served floor
    pub fn max(&self) -> Floor {
        self.max
    }

    /// Number of served floors, never zero.
    pub(crate) fn len(&self) -> usize {
        (i64::from(self.max) - i64::from(self.min)) as usize + 1
    }

    /// `true` if `floor` is served
    pub fn contains(&self, floor: Floor) -> bool {
        self.min <= floor && floor <= self.max
    }

    /// Returns `floor` unchanged if it is served, otherwise [DispatchError::InvalidFloor].
    pub fn check(&self, floor: Floor) -> Result<Floor, DispatchError> {
        if self.contains(floor) {
            Ok(floor)
        } else {
            Err(DispatchError::InvalidFloor { floor, min: self.min, max: self.max })
        }
    }

    /// Zero-based position of a served floor, for indexing per-floor storage.
    pub(crate) fn index(&self, floor: Floor) -> usize {
        (i64::from(floor) - i64::from(self.min)) as usize
    }

    /// Iterates every served floor from bottom to top.
    pub fn floors(&self) -> impl DoubleEndedIterator<Item = Floor> {
        self.min..=self.max
    }
}

/// Physical state of the cabin.
///
/// Position comes from hardware reports only. `direction` is set when a move command is
/// issued and cleared when the doors open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabinState {
    /// Floor the cabin is at, or the last floor it was about to pass.
    pub current_floor: Floor,

    /// Direction of motion. Always [Dirn::Stop] while `doors_open` is set.
    pub direction: Dirn,

    /// Doors are open (the cabin is stationary).
    pub doors_open: bool,
}

impl CabinState {
    /// A stationary cabin with closed doors at `floor`.
    pub fn parked(floor: Floor) -> Self {
        CabinState { current_floor: floor, direction: Dirn::Stop, doors_open: false }
    }
}
