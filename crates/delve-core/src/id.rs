//! Strongly-typed arena handles.
//!
//! Squares, borders and dungeons live in append-only arenas and are
//! addressed by index. Slots are never reused: a terminated entity keeps
//! its slot as a tombstone, so a handle never silently starts pointing at
//! a different entity.

use std::fmt;

/// Identifies a square within a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareId(pub u32);

impl SquareId {
    /// Slot index of this square in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "square#{}", self.0)
    }
}

impl From<u32> for SquareId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a border within a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BorderId(pub u32);

impl BorderId {
    /// Slot index of this border in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BorderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "border#{}", self.0)
    }
}

impl From<u32> for BorderId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a dungeon (leaf or composite) within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DungeonId(pub u32);

impl DungeonId {
    /// Slot index of this dungeon in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DungeonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dungeon#{}", self.0)
    }
}

impl From<u32> for DungeonId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
