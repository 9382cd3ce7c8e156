//! Border variants and border state.

use std::fmt;

use delve_core::{Couple, SquareId};

/// The closed set of border variants.
///
/// Variants are ordered by openness: a wall is less open than a door, which
/// is less open than an open border. When two borders merge, the less open
/// one survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BorderKind {
    /// A solid wall.
    Wall {
        /// Whether the wall surface is slippery.
        slippery: bool,
    },
    /// A door that can be opened and closed.
    Door {
        /// Whether the door is currently open.
        open: bool,
    },
    /// No physical separation.
    Open,
}

impl BorderKind {
    /// A plain, non-slippery wall.
    pub const WALL: BorderKind = BorderKind::Wall { slippery: false };
    /// A closed door.
    pub const DOOR: BorderKind = BorderKind::Door { open: false };

    /// Openness rank: wall 0, door 1, open 2.
    pub fn openness(self) -> u8 {
        match self {
            Self::Wall { .. } => 0,
            Self::Door { .. } => 1,
            Self::Open => 2,
        }
    }

    /// Whether something can pass through right now.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::Door { open: true })
    }

    /// Whether this is a door, open or closed.
    pub fn is_door(self) -> bool {
        matches!(self, Self::Door { .. })
    }

    /// Whether this is a wall.
    pub fn is_wall(self) -> bool {
        matches!(self, Self::Wall { .. })
    }

    /// Only slippery walls are slippery.
    pub fn is_slippery(self) -> bool {
        matches!(self, Self::Wall { slippery: true })
    }

    /// One-character map symbol.
    pub fn symbol(self) -> char {
        match self {
            Self::Wall { .. } => '#',
            Self::Door { open: true } => 'd',
            Self::Door { open: false } => 'D',
            Self::Open => '.',
        }
    }
}

impl Default for BorderKind {
    fn default() -> Self {
        Self::WALL
    }
}

impl fmt::Display for BorderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A border slot in the grid arena.
///
/// A live border touches one or two squares. A terminated border touches
/// none and is never revived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub(crate) kind: BorderKind,
    pub(crate) squares: Option<Couple<SquareId>>,
}

impl Border {
    pub(crate) fn new(kind: BorderKind, square: SquareId) -> Self {
        Self {
            kind,
            squares: Some(Couple::new(square)),
        }
    }

    /// The border variant.
    pub fn kind(&self) -> BorderKind {
        self.kind
    }

    /// The squares this border touches, or `None` once terminated.
    pub fn squares(&self) -> Option<Couple<SquareId>> {
        self.squares
    }

    /// Whether the border has been terminated.
    pub fn is_terminated(&self) -> bool {
        self.squares.is_none()
    }

    /// Whether the border separates two squares.
    pub fn is_shared(&self) -> bool {
        self.squares.is_some_and(|c| c.is_pair())
    }

    /// Whether `square` is one of the squares this border touches.
    pub fn borders_on(&self, square: SquareId) -> bool {
        self.squares.is_some_and(|c| c.contains(square))
    }
}
