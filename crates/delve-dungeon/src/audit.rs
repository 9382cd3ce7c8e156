//! Consistency audit of the dungeon tree.

use std::fmt;

use delve_core::{Coordinate, Direction, DungeonId, SquareId};
use delve_grid::GridViolation;

use crate::dungeon::DungeonKind;
use crate::world::World;

/// A broken world invariant found by [`World::audit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DungeonViolation {
    /// The square/border graph is inconsistent.
    Grid(GridViolation),
    /// A parent link without the matching child entry, or the reverse.
    ParentMismatch {
        /// The child side of the link.
        child: DungeonId,
        /// The parent side of the link.
        parent: DungeonId,
    },
    /// A child's bounds reach outside its composite.
    ChildOutOfBounds {
        /// The composite.
        composite: DungeonId,
        /// The child.
        child: DungeonId,
    },
    /// Two children of one composite overlap.
    OverlappingChildren {
        /// The composite.
        composite: DungeonId,
        /// First child.
        first: DungeonId,
        /// Second child.
        second: DungeonId,
    },
    /// A leaf holds a terminated square.
    DeadSquare {
        /// The leaf.
        dungeon: DungeonId,
        /// Where the square sits.
        coord: Coordinate,
        /// The square.
        square: SquareId,
    },
    /// A leaf holds a square its placement rules would refuse.
    SquareMisplaced {
        /// The leaf.
        dungeon: DungeonId,
        /// Where the square sits.
        coord: Coordinate,
        /// The square.
        square: SquareId,
    },
    /// A square's recorded leaf disagrees with the leaf that holds it.
    HomeMismatch {
        /// The square.
        square: SquareId,
    },
    /// A leaf's squares break its structural constraint.
    DungeonConstraints {
        /// The leaf.
        dungeon: DungeonId,
    },
    /// A terminated dungeon still has links or squares.
    TerminatedNotEmpty {
        /// The dungeon.
        dungeon: DungeonId,
    },
    /// Two squares touch in world space but share no border.
    MissingAdjacency {
        /// The first square.
        square: SquareId,
        /// Direction from `square` to `neighbour`.
        direction: Direction,
        /// The square it should be joined to.
        neighbour: SquareId,
    },
}

impl fmt::Display for DungeonViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(v) => write!(f, "grid: {v}"),
            Self::ParentMismatch { child, parent } => {
                write!(f, "link between {child} and {parent} is one-sided")
            }
            Self::ChildOutOfBounds { composite, child } => {
                write!(f, "{child} extends outside {composite}")
            }
            Self::OverlappingChildren {
                composite,
                first,
                second,
            } => write!(f, "{first} and {second} overlap in {composite}"),
            Self::DeadSquare {
                dungeon,
                coord,
                square,
            } => write!(f, "{dungeon} holds terminated {square} at {coord}"),
            Self::SquareMisplaced {
                dungeon,
                coord,
                square,
            } => write!(f, "{dungeon} cannot hold {square} at {coord}"),
            Self::HomeMismatch { square } => write!(f, "recorded leaf of {square} is wrong"),
            Self::DungeonConstraints { dungeon } => {
                write!(f, "structural constraints of {dungeon} violated")
            }
            Self::TerminatedNotEmpty { dungeon } => {
                write!(f, "terminated {dungeon} still has links or squares")
            }
            Self::MissingAdjacency {
                square,
                direction,
                neighbour,
            } => write!(f, "{square} touches {neighbour} ({direction}) without sharing a border"),
        }
    }
}

impl World {
    /// Check the grid, the dungeon tree and world adjacency.
    ///
    /// Returns an empty list for a consistent world.
    pub fn audit(&self) -> Vec<DungeonViolation> {
        let mut out: Vec<DungeonViolation> = self
            .grid
            .audit()
            .into_iter()
            .map(DungeonViolation::Grid)
            .collect();

        for (index, node) in self.dungeons.iter().enumerate() {
            let id = DungeonId(index as u32);
            if node.terminated {
                let empty = node.parent.is_none()
                    && match &node.kind {
                        DungeonKind::Leaf(l) => l.is_empty(),
                        DungeonKind::Composite(c) => c.children.is_empty(),
                    };
                if !empty {
                    out.push(DungeonViolation::TerminatedNotEmpty { dungeon: id });
                }
                continue;
            }
            if let Some(parent) = node.parent {
                let listed = self
                    .dungeons
                    .get(parent.index())
                    .and_then(|p| p.as_composite())
                    .is_some_and(|c| c.has_child(id));
                if !listed {
                    out.push(DungeonViolation::ParentMismatch { child: id, parent });
                }
            }
            match &node.kind {
                DungeonKind::Composite(c) => self.audit_composite(id, c.children(), &mut out),
                DungeonKind::Leaf(_) => self.audit_leaf(id, &mut out),
            }
        }
        out
    }

    fn audit_composite(
        &self,
        id: DungeonId,
        children: impl Iterator<Item = DungeonId>,
        out: &mut Vec<DungeonViolation>,
    ) {
        let bounds = self.dungeons[id.index()].system;
        let children: Vec<DungeonId> = children.collect();
        for (i, &child) in children.iter().enumerate() {
            let Some(node) = self.dungeons.get(child.index()) else {
                out.push(DungeonViolation::ParentMismatch { child, parent: id });
                continue;
            };
            if node.parent != Some(id) || node.terminated {
                out.push(DungeonViolation::ParentMismatch { child, parent: id });
            }
            if !bounds.contains_system(&node.system) {
                out.push(DungeonViolation::ChildOutOfBounds {
                    composite: id,
                    child,
                });
            }
            for &other in &children[i + 1..] {
                let overlap = self
                    .dungeons
                    .get(other.index())
                    .is_some_and(|o| o.system.overlaps(&node.system));
                if overlap {
                    out.push(DungeonViolation::OverlappingChildren {
                        composite: id,
                        first: child,
                        second: other,
                    });
                }
            }
        }
    }

    fn audit_leaf(&self, id: DungeonId, out: &mut Vec<DungeonViolation>) {
        let node = &self.dungeons[id.index()];
        let Some(leaf) = node.as_leaf() else { return };
        let root = self.audit_root(id);

        for (coord, square) in leaf.positions_and_squares() {
            if !self.grid.is_live(square) {
                out.push(DungeonViolation::DeadSquare {
                    dungeon: id,
                    coord,
                    square,
                });
                continue;
            }
            if !self.placement_allowed(&node.system, leaf.shape, coord, square) {
                out.push(DungeonViolation::SquareMisplaced {
                    dungeon: id,
                    coord,
                    square,
                });
            }
            if self.homes.get(&square) != Some(&id) {
                out.push(DungeonViolation::HomeMismatch { square });
            }
            let Some(root) = root else { continue };
            for (direction, coord) in self.dungeons[root.index()].system.neighbours_of(coord) {
                let Some(neighbour) = self.find_square(root, coord) else {
                    continue;
                };
                if self.grid.neighbour(square, direction) != Ok(Some(neighbour)) {
                    out.push(DungeonViolation::MissingAdjacency {
                        square,
                        direction,
                        neighbour,
                    });
                }
            }
        }
        if !self.structure_allows(leaf.shape, leaf.squares.values().copied()) {
            out.push(DungeonViolation::DungeonConstraints { dungeon: id });
        }
    }

    /// Root of `id`, or `None` if the parent chain is broken or cyclic.
    fn audit_root(&self, id: DungeonId) -> Option<DungeonId> {
        let mut current = id;
        for _ in 0..=self.dungeons.len() {
            match self.dungeons.get(current.index())?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use delve_core::CoordinateSystem;
    use delve_grid::{BorderKind, SquareBuilder};

    use super::*;

    fn c(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(x, y, z)
    }

    #[test]
    fn fresh_world_is_clean() {
        let mut w = World::default();
        let comp = w
            .create_composite(CoordinateSystem::new(c(0, 0, 0), c(4, 4, 4)).unwrap())
            .unwrap();
        let level = w.create_level(3, 3).unwrap();
        let s = w.insert_square(SquareBuilder::new()).unwrap();
        w.add_square_at(level, c(1, 0, 0), s).unwrap();
        w.add_sub_dungeon_at(comp, Coordinate::ORIGIN, level).unwrap();
        assert!(w.audit().is_empty());
    }

    #[test]
    fn reports_door_added_to_shaft_axis() {
        let mut w = World::default();
        let shaft = w.create_shaft(c(0, 1, 1), 3, Direction::Up).unwrap();
        let s = w.insert_square(SquareBuilder::new()).unwrap();
        w.add_square_at(shaft, c(0, 1, 2), s).unwrap();
        w.grid_mut()
            .set_border_kind(s, Direction::Up, BorderKind::DOOR)
            .unwrap();
        assert_eq!(
            w.audit(),
            vec![DungeonViolation::SquareMisplaced {
                dungeon: shaft,
                coord: c(0, 1, 2),
                square: s,
            }]
        );
    }

    #[test]
    fn reports_square_terminated_behind_the_world() {
        let mut w = World::default();
        let level = w.create_level(2, 2).unwrap();
        let s = w.insert_square(SquareBuilder::new()).unwrap();
        w.add_square_at(level, c(1, 0, 0), s).unwrap();
        w.grid_mut().terminate_square(s).unwrap();
        assert!(w.audit().contains(&DungeonViolation::DeadSquare {
            dungeon: level,
            coord: c(1, 0, 0),
            square: s,
        }));
    }

    #[test]
    fn reports_tightened_slippery_share() {
        let mut w = World::default();
        let level = w.create_level(6, 1).unwrap();
        for x in 1..5 {
            let s = w.insert_square(SquareBuilder::new()).unwrap();
            w.add_square_at(level, c(x, 0, 0), s).unwrap();
        }
        let slippery = w.insert_square(SquareBuilder::new().slippery_floor(true)).unwrap();
        w.add_square_at(level, c(5, 0, 0), slippery).unwrap();
        assert!(w.audit().is_empty());

        let mut config = *w.config();
        config.max_slippery_fraction = 0.0;
        w.set_config(config).unwrap();
        assert_eq!(w.audit(), vec![DungeonViolation::DungeonConstraints { dungeon: level }]);
    }
}
