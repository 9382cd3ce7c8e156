//! Dungeon nodes: leaves hold squares, composites hold dungeons.

use delve_core::{Coordinate, CoordinateSystem, Direction, DungeonId, SquareId};
use indexmap::{IndexMap, IndexSet};

/// The shape rule of a leaf dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafShape {
    /// A flat leaf, one square thick along z.
    Level,
    /// A straight line of squares.
    Shaft {
        /// Positive direction of the shaft's axis: east, north or up.
        axis: Direction,
    },
}

impl LeafShape {
    /// Whether `system` has the extent this shape requires.
    pub fn fits(self, system: &CoordinateSystem) -> bool {
        match self {
            Self::Level => system.is_flat(),
            Self::Shaft { axis } => {
                let (x, y, z) = system.extent();
                match axis {
                    Direction::East | Direction::West => y == 1 && z == 1,
                    Direction::North | Direction::South => x == 1 && z == 1,
                    Direction::Up | Direction::Down => x == 1 && y == 1,
                }
            }
        }
    }
}

/// A dungeon that stores squares directly.
#[derive(Clone, Debug)]
pub struct LeafDungeon {
    pub(crate) shape: LeafShape,
    pub(crate) squares: IndexMap<Coordinate, SquareId>,
}

impl LeafDungeon {
    pub(crate) fn new(shape: LeafShape) -> Self {
        Self {
            shape,
            squares: IndexMap::new(),
        }
    }

    /// The shape rule.
    pub fn shape(&self) -> LeafShape {
        self.shape
    }

    /// Number of squares.
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// Whether the leaf holds no squares.
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// The square at `coord`, if any.
    pub fn get(&self, coord: Coordinate) -> Option<SquareId> {
        self.squares.get(&coord).copied()
    }

    /// Positions and squares in placement order.
    pub fn positions_and_squares(&self) -> impl Iterator<Item = (Coordinate, SquareId)> + '_ {
        self.squares.iter().map(|(&c, &s)| (c, s))
    }
}

/// A dungeon that groups other dungeons.
#[derive(Clone, Debug, Default)]
pub struct CompositeDungeon {
    pub(crate) children: IndexSet<DungeonId>,
}

impl CompositeDungeon {
    /// Direct children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = DungeonId> + '_ {
        self.children.iter().copied()
    }

    /// Whether `dungeon` is a direct child.
    pub fn has_child(&self, dungeon: DungeonId) -> bool {
        self.children.contains(&dungeon)
    }
}

/// The two kinds of dungeon.
#[derive(Clone, Debug)]
pub enum DungeonKind {
    /// Holds squares.
    Leaf(LeafDungeon),
    /// Holds dungeons.
    Composite(CompositeDungeon),
}

/// A dungeon slot in the world arena.
///
/// The parent link is a relation only: the parent lists the child, the
/// child names the parent, and both sides are updated together.
#[derive(Clone, Debug)]
pub struct Dungeon {
    pub(crate) system: CoordinateSystem,
    pub(crate) parent: Option<DungeonId>,
    pub(crate) terminated: bool,
    pub(crate) kind: DungeonKind,
}

impl Dungeon {
    pub(crate) fn new(system: CoordinateSystem, kind: DungeonKind) -> Self {
        Self {
            system,
            parent: None,
            terminated: false,
            kind,
        }
    }

    /// The dungeon's bounds in world coordinates.
    pub fn system(&self) -> &CoordinateSystem {
        &self.system
    }

    /// The composite this dungeon belongs to.
    pub fn parent(&self) -> Option<DungeonId> {
        self.parent
    }

    /// Whether the dungeon has been terminated.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Leaf or composite contents.
    pub fn kind(&self) -> &DungeonKind {
        &self.kind
    }

    /// The leaf contents, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&LeafDungeon> {
        match &self.kind {
            DungeonKind::Leaf(leaf) => Some(leaf),
            DungeonKind::Composite(_) => None,
        }
    }

    /// The composite contents, if this is a composite.
    pub fn as_composite(&self) -> Option<&CompositeDungeon> {
        match &self.kind {
            DungeonKind::Composite(composite) => Some(composite),
            DungeonKind::Leaf(_) => None,
        }
    }
}
