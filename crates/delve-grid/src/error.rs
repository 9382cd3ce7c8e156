//! Grid error types.

use std::error::Error;
use std::fmt;

use delve_core::{
    BorderId, ConfigError, CoupleError, Direction, EnvironmentError, SquareId, Temperature,
};

/// Why a square's set of border kinds is not acceptable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderConstraintViolation {
    /// More than [`MAX_DOORS`](crate::square::MAX_DOORS) doors.
    TooManyDoors {
        /// Number of doors the square would have.
        count: usize,
    },
    /// A door in the floor.
    DoorInFloor,
}

impl fmt::Display for BorderConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyDoors { count } => write!(f, "{count} doors, at most 3 allowed"),
            Self::DoorInFloor => write!(f, "the floor cannot be a door"),
        }
    }
}

/// Errors from grid operations.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// No square with this id was ever created.
    UnknownSquare {
        /// The offending id.
        square: SquareId,
    },
    /// The square has been terminated.
    SquareTerminated {
        /// The offending id.
        square: SquareId,
    },
    /// No border with this id was ever created.
    UnknownBorder {
        /// The offending id.
        border: BorderId,
    },
    /// The border has been terminated.
    BorderTerminated {
        /// The offending id.
        border: BorderId,
    },
    /// Invalid merge: a border is already shared, or both borders already
    /// touch a common square.
    BorderMerge {
        /// Border the merge was invoked on.
        first: BorderId,
        /// Border it was asked to merge with.
        second: BorderId,
    },
    /// The resulting borders of a square would violate its constraints.
    BorderConstraints {
        /// The affected square, if it already exists.
        square: Option<SquareId>,
        /// The constraint that failed.
        violation: BorderConstraintViolation,
    },
    /// Equilibrating two squares would push the shared temperature outside
    /// one square's bounds.
    MergingTemperaturesViolatesLimits {
        /// The square whose bounds would be violated.
        square: SquareId,
        /// The temperature the merge would have produced.
        temperature: Temperature,
    },
    /// The border at this position is not a door.
    NotADoor {
        /// The square asked about.
        square: SquareId,
        /// The direction asked about.
        direction: Direction,
    },
    /// `commit` or `rollback` without a matching `begin`.
    NoTransaction,
    /// The arena ran out of 32-bit ids.
    CapacityExceeded,
    /// Invalid temperature or humidity.
    Environment(EnvironmentError),
    /// Invalid environment configuration.
    Config(ConfigError),
    /// Couple bookkeeping failed.
    Couple(CoupleError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSquare { square } => write!(f, "unknown square: {square}"),
            Self::SquareTerminated { square } => write!(f, "{square} is terminated"),
            Self::UnknownBorder { border } => write!(f, "unknown border: {border}"),
            Self::BorderTerminated { border } => write!(f, "{border} is terminated"),
            Self::BorderMerge { first, second } => {
                write!(f, "cannot merge {first} with {second}")
            }
            Self::BorderConstraints { square, violation } => match square {
                Some(square) => write!(f, "border constraints of {square} violated: {violation}"),
                None => write!(f, "border constraints violated: {violation}"),
            },
            Self::MergingTemperaturesViolatesLimits {
                square,
                temperature,
            } => write!(
                f,
                "merged temperature {temperature} outside the limits of {square}"
            ),
            Self::NotADoor { square, direction } => {
                write!(f, "the {direction} border of {square} is not a door")
            }
            Self::NoTransaction => write!(f, "no open transaction"),
            Self::CapacityExceeded => write!(f, "grid capacity exceeded"),
            Self::Environment(e) => write!(f, "environment: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Couple(e) => write!(f, "couple: {e}"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Environment(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Couple(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EnvironmentError> for GridError {
    fn from(e: EnvironmentError) -> Self {
        Self::Environment(e)
    }
}

impl From<ConfigError> for GridError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CoupleError> for GridError {
    fn from(e: CoupleError) -> Self {
        Self::Couple(e)
    }
}
