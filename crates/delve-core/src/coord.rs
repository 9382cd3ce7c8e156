//! Integer lattice coordinates and the six axis directions.

use std::fmt;
use std::ops::{Add, Neg};

use crate::error::CoordError;

/// An immutable integer point `(x, y, z)` in world space.
///
/// Ordered lexicographically by `x`, then `y`, then `z`, so it can be used
/// as a map key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coordinate {
    /// East-west component (east is positive).
    pub x: i32,
    /// North-south component (north is positive).
    pub y: i32,
    /// Vertical component (up is positive).
    pub z: i32,
}

impl Coordinate {
    /// The point `(0, 0, 0)`.
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0, z: 0 };

    /// Create a coordinate from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum, or `None` on `i32` overflow.
    pub fn checked_add(self, offset: Coordinate) -> Option<Coordinate> {
        Some(Coordinate {
            x: self.x.checked_add(offset.x)?,
            y: self.y.checked_add(offset.y)?,
            z: self.z.checked_add(offset.z)?,
        })
    }

    /// Component-wise sum, reported as a [`CoordError::Overflow`] on failure.
    pub fn try_add(self, offset: Coordinate) -> Result<Coordinate, CoordError> {
        self.checked_add(offset).ok_or(CoordError::Overflow {
            coord: self,
            offset,
        })
    }

    /// The coordinate reflected through the origin.
    ///
    /// Panics on overflow in debug builds, like `Add`; use
    /// [`Coordinate::checked_mirror`] where a component may be `i32::MIN`.
    pub fn mirror(self) -> Coordinate {
        Coordinate::new(-self.x, -self.y, -self.z)
    }

    /// The coordinate reflected through the origin, or `None` if a
    /// component is `i32::MIN`.
    pub fn checked_mirror(self) -> Option<Coordinate> {
        Some(Coordinate {
            x: self.x.checked_neg()?,
            y: self.y.checked_neg()?,
            z: self.z.checked_neg()?,
        })
    }

    /// The neighbouring coordinate one step in `direction`.
    pub fn step(self, direction: Direction) -> Option<Coordinate> {
        self.checked_add(direction.offset())
    }

    /// `true` when `self <= other` in every axis.
    pub fn le_all(self, other: Coordinate) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }

    /// Component-wise minimum.
    pub fn min_all(self, other: Coordinate) -> Coordinate {
        Coordinate::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum.
    pub fn max_all(self, other: Coordinate) -> Coordinate {
        Coordinate::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// `true` when all three components are equal, e.g. `(2, 2, 2)`.
    ///
    /// Such diagonal points are never valid square positions.
    pub fn is_diagonal(self) -> bool {
        self.x == self.y && self.y == self.z
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    /// Component-wise sum. Panics on overflow in debug builds; use
    /// [`Coordinate::checked_add`] where the operands are caller input.
    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Neg for Coordinate {
    type Output = Coordinate;

    fn neg(self) -> Coordinate {
        self.mirror()
    }
}

impl From<(i32, i32, i32)> for Coordinate {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six faces of a unit square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards increasing `y`.
    North,
    /// Towards decreasing `y`.
    South,
    /// Towards increasing `x`.
    East,
    /// Towards decreasing `x`.
    West,
    /// Towards increasing `z`.
    Up,
    /// Towards decreasing `z`.
    Down,
}

impl Direction {
    /// All directions in canonical order. `ALL[d.index()] == d`.
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Position of this direction in [`Direction::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::East => 2,
            Self::West => 3,
            Self::Up => 4,
            Self::Down => 5,
        }
    }

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Direction {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Unit offset of a single step in this direction.
    pub const fn offset(self) -> Coordinate {
        match self {
            Self::North => Coordinate::new(0, 1, 0),
            Self::South => Coordinate::new(0, -1, 0),
            Self::East => Coordinate::new(1, 0, 0),
            Self::West => Coordinate::new(-1, 0, 0),
            Self::Up => Coordinate::new(0, 0, 1),
            Self::Down => Coordinate::new(0, 0, -1),
        }
    }

    /// `true` for [`Direction::Up`] and [`Direction::Down`].
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        };
        f.write_str(name)
    }
}
