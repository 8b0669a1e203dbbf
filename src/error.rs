//! Error taxonomy for the dispatcher.
//!
//! None of these are fatal. The event loop in [crate::elevator_logic] logs them and
//! carries on; the handlers return them so callers and tests can see what was rejected.

use thiserror::Error;

use crate::cabin::{CabinBehaviour, Dirn, Floor};

/// Reasons an event or request was rejected without touching dispatcher state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A request or hardware event referenced a floor outside the shaft.
    #[error("floor {floor} outside [{min}, {max}]")]
    InvalidFloor {
        /// The offending floor
        floor: Floor,
        /// Lowest valid floor
        min: Floor,
        /// Highest valid floor
        max: Floor,
    },

    /// A hardware event arrived that makes no sense in the current state.
    #[error("{event} ignored while {behaviour:?}")]
    InvalidStateTransition {
        /// Name of the ignored event
        event: &'static str,
        /// Behaviour the dispatcher was in when it arrived
        behaviour: CabinBehaviour,
    },

    /// A hall call or approaching-floor event carried no travel direction.
    #[error("{event} at floor {floor} has no direction ({dirn:?})")]
    MissingDirection {
        /// Name of the rejected event
        event: &'static str,
        /// Floor the event referred to
        floor: Floor,
        /// The direction that was given
        dirn: Dirn,
    },

    /// Construction parameters were inconsistent.
    #[error("invalid dispatcher config: {0}")]
    InvalidConfig(String),
}

impl DispatchError {
    /// `true` for errors caused by hardware reporting something unexpected,
    /// `false` for rejected passenger input and bad configuration.
    pub fn is_hardware_inconsistency(&self) -> bool {
        matches!(self, DispatchError::InvalidStateTransition { .. })
    }
}
