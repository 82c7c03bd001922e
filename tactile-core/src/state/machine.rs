//! Driver state definition
//!
//! The state is explicit and ordered: each state implies every state
//! below it (a powered-on driver is also open and probed).

use super::ops::Operation;
use crate::error::DriverError;

/// Driver lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// No private state allocated
    #[default]
    Uninitialized,
    /// Private state allocated, no hardware claimed
    Probed,
    /// Buttons initialized, interrupts masked
    Open,
    /// Button interrupts enabled
    PoweredOn,
}

impl DriverState {
    /// Check if the device is open (powered or not)
    pub fn is_open(&self) -> bool {
        *self >= DriverState::Open
    }

    /// Check if button interrupts are enabled
    pub fn is_powered(&self) -> bool {
        *self == DriverState::PoweredOn
    }

    /// Require an open device for report and callback operations
    pub fn require_open(&self) -> Result<(), DriverError> {
        match self {
            DriverState::Uninitialized => Err(DriverError::InvalidArgument),
            DriverState::Probed => Err(DriverError::NotOpen),
            DriverState::Open | DriverState::PoweredOn => Ok(()),
        }
    }

    /// Validate an operation and return the state it leads to
    ///
    /// Composite teardown is folded in: closing a powered device and
    /// removing an open one both land directly on the final state; the
    /// driver performs the intermediate steps.
    pub fn transition(self, op: Operation) -> Result<Self, DriverError> {
        use DriverState as S;
        use Operation as Op;

        match (self, op) {
            (S::Uninitialized, Op::Probe) => Ok(S::Probed),
            (_, Op::Probe) => Err(DriverError::AlreadyProbed),

            (S::Probed, Op::Open) => Ok(S::Open),
            (S::Uninitialized, Op::Open) => Err(DriverError::NotProbed),
            (S::Open | S::PoweredOn, Op::Open) => Err(DriverError::AlreadyOpen),

            (S::Open, Op::PowerOn) => Ok(S::PoweredOn),
            (S::PoweredOn, Op::PowerOn) => Err(DriverError::AlreadyPowered),
            (S::Uninitialized, Op::PowerOn) => Err(DriverError::InvalidArgument),
            (S::Probed, Op::PowerOn) => Err(DriverError::NotOpen),

            // Powering off an unpowered open device is a no-op
            (S::Open | S::PoweredOn, Op::PowerOff) => Ok(S::Open),
            (S::Uninitialized, Op::PowerOff) => Err(DriverError::InvalidArgument),
            (S::Probed, Op::PowerOff) => Err(DriverError::NotOpen),

            (S::Open | S::PoweredOn, Op::Close) => Ok(S::Probed),
            (S::Uninitialized, Op::Close) => Err(DriverError::InvalidArgument),
            (S::Probed, Op::Close) => Err(DriverError::NotOpen),

            (S::Probed | S::Open | S::PoweredOn, Op::Remove) => Ok(S::Uninitialized),
            (S::Uninitialized, Op::Remove) => Err(DriverError::NotProbed),
        }
    }
}
