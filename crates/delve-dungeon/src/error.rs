//! Dungeon error types.

use std::error::Error;
use std::fmt;

use delve_core::{ConfigError, CoordError, Coordinate, CoordinateSystem, DungeonId, SquareId};
use delve_grid::GridError;

/// Errors from dungeon operations.
///
/// Argument and occupancy errors are raised before anything is mutated.
/// Constraint errors are raised after the tentative change has been
/// rolled back.
#[derive(Clone, Debug, PartialEq)]
pub enum DungeonError {
    /// No dungeon with this id was ever created.
    UnknownDungeon {
        /// The offending id.
        dungeon: DungeonId,
    },
    /// The dungeon has been terminated.
    DungeonTerminated {
        /// The offending id.
        dungeon: DungeonId,
    },
    /// The operation needs a leaf dungeon.
    NotALeaf {
        /// The offending id.
        dungeon: DungeonId,
    },
    /// The operation needs a composite dungeon.
    NotAComposite {
        /// The offending id.
        dungeon: DungeonId,
    },
    /// The leaf cannot hold this square at this coordinate.
    InvalidSquareCoordinate {
        /// The leaf.
        dungeon: DungeonId,
        /// The rejected coordinate.
        coord: Coordinate,
    },
    /// The square already belongs to a dungeon.
    SquareAlreadyPlaced {
        /// The square.
        square: SquareId,
        /// The leaf that holds it.
        dungeon: DungeonId,
    },
    /// Another square already sits at this coordinate.
    CoordinateOccupied {
        /// The leaf.
        dungeon: DungeonId,
        /// The occupied coordinate.
        coord: Coordinate,
    },
    /// No square sits at this coordinate.
    CoordinateNotOccupied {
        /// The dungeon searched.
        dungeon: DungeonId,
        /// The empty coordinate.
        coord: Coordinate,
    },
    /// The change would break the leaf's structural constraint.
    DungeonConstraints {
        /// The leaf.
        dungeon: DungeonId,
    },
    /// After translation a square would sit at an invalid coordinate.
    CoordinateConstraints {
        /// The leaf holding the square.
        dungeon: DungeonId,
        /// The invalid coordinate after translation.
        coord: Coordinate,
    },
    /// The sub-dungeon already has a parent.
    DungeonAlreadyAssociated {
        /// The sub-dungeon.
        dungeon: DungeonId,
        /// Its current parent.
        parent: DungeonId,
    },
    /// The sub-dungeon falls outside the composite or overlaps a sibling.
    SubDungeonDoesNotFit {
        /// The composite.
        composite: DungeonId,
        /// The sub-dungeon.
        sub: DungeonId,
    },
    /// The composite is the sub-dungeon itself or one of its descendants.
    CyclicComposition {
        /// The composite.
        composite: DungeonId,
        /// The sub-dungeon.
        sub: DungeonId,
    },
    /// Only root dungeons can be translated.
    AttachedTranslation {
        /// The dungeon.
        dungeon: DungeonId,
        /// Its parent.
        parent: DungeonId,
    },
    /// The coordinate system does not have the shape the leaf needs.
    InvalidLeafShape {
        /// The rejected system.
        system: CoordinateSystem,
    },
    /// A level or shaft extent outside `1..=i32::MAX`.
    InvalidExtent {
        /// The rejected extent.
        extent: u32,
    },
    /// The arena ran out of 32-bit ids.
    CapacityExceeded,
    /// Coordinate arithmetic failed.
    Coord(CoordError),
    /// A grid operation failed.
    Grid(GridError),
    /// Invalid world configuration.
    Config(ConfigError),
}

impl fmt::Display for DungeonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDungeon { dungeon } => write!(f, "unknown dungeon: {dungeon}"),
            Self::DungeonTerminated { dungeon } => write!(f, "{dungeon} is terminated"),
            Self::NotALeaf { dungeon } => write!(f, "{dungeon} is not a leaf dungeon"),
            Self::NotAComposite { dungeon } => write!(f, "{dungeon} is not a composite dungeon"),
            Self::InvalidSquareCoordinate { dungeon, coord } => {
                write!(f, "{dungeon} cannot hold a square at {coord}")
            }
            Self::SquareAlreadyPlaced { square, dungeon } => {
                write!(f, "{square} already belongs to {dungeon}")
            }
            Self::CoordinateOccupied { dungeon, coord } => {
                write!(f, "{coord} in {dungeon} is occupied")
            }
            Self::CoordinateNotOccupied { dungeon, coord } => {
                write!(f, "no square at {coord} in {dungeon}")
            }
            Self::DungeonConstraints { dungeon } => {
                write!(f, "structural constraints of {dungeon} violated")
            }
            Self::CoordinateConstraints { dungeon, coord } => {
                write!(f, "translation would move a square of {dungeon} to invalid {coord}")
            }
            Self::DungeonAlreadyAssociated { dungeon, parent } => {
                write!(f, "{dungeon} already belongs to {parent}")
            }
            Self::SubDungeonDoesNotFit { composite, sub } => {
                write!(f, "{sub} does not fit in {composite}")
            }
            Self::CyclicComposition { composite, sub } => {
                write!(f, "{composite} lies inside {sub}")
            }
            Self::AttachedTranslation { dungeon, parent } => {
                write!(f, "{dungeon} is attached to {parent} and cannot be translated")
            }
            Self::InvalidLeafShape { system } => {
                write!(f, "{system} has the wrong shape for this leaf")
            }
            Self::InvalidExtent { extent } => {
                write!(f, "extent {extent} outside 1..={}", i32::MAX)
            }
            Self::CapacityExceeded => write!(f, "dungeon capacity exceeded"),
            Self::Coord(e) => write!(f, "coordinate: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for DungeonError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Coord(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoordError> for DungeonError {
    fn from(e: CoordError) -> Self {
        Self::Coord(e)
    }
}

impl From<GridError> for DungeonError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ConfigError> for DungeonError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
