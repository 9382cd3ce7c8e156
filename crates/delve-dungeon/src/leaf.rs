//! Square placement in leaf dungeons.

use delve_core::{Coordinate, CoordinateSystem, Direction, DungeonId, SquareId};
use delve_grid::{Grid, GridError};
use tracing::debug;

use crate::dungeon::LeafShape;
use crate::error::DungeonError;
use crate::world::World;

impl World {
    /// Whether `square` may sit at `coord` in a leaf with this bounds and
    /// shape: the square is live, the coordinate lies inside the bounds
    /// and is not diagonal, and a shaft square has no door along the axis.
    pub(crate) fn placement_allowed(
        &self,
        system: &CoordinateSystem,
        shape: LeafShape,
        coord: Coordinate,
        square: SquareId,
    ) -> bool {
        if !self.grid.is_live(square) || !system.contains(coord) || coord.is_diagonal() {
            return false;
        }
        match shape {
            LeafShape::Level => true,
            LeafShape::Shaft { axis } => !door_along(&self.grid, square, axis),
        }
    }

    /// The shaft holding `square` and its axis, if `square` sits in a shaft.
    pub(crate) fn shaft_guard(&self, square: SquareId) -> Option<(DungeonId, SquareId, Direction)> {
        let home = *self.homes.get(&square)?;
        match self.dungeons.get(home.index())?.as_leaf()?.shape {
            LeafShape::Shaft { axis } => Some((home, square, axis)),
            LeafShape::Level => None,
        }
    }

    /// Whether a leaf of this shape may hold exactly these squares.
    ///
    /// A level allows a bounded share of slippery floors; a shaft allows
    /// none.
    pub(crate) fn structure_allows(
        &self,
        shape: LeafShape,
        squares: impl IntoIterator<Item = SquareId>,
    ) -> bool {
        let (mut total, mut slippery) = (0usize, 0usize);
        for s in squares {
            total += 1;
            if self.grid.square(s).is_ok_and(|sq| sq.has_slippery_floor()) {
                slippery += 1;
            }
        }
        match shape {
            LeafShape::Level => slippery as f64 <= self.config().max_slippery_fraction * total as f64,
            LeafShape::Shaft { .. } => slippery == 0,
        }
    }

    /// Whether `leaf` could hold `square` at `coord`, ignoring occupancy.
    pub fn can_have_as_square_at(
        &self,
        leaf: DungeonId,
        coord: Coordinate,
        square: SquareId,
    ) -> Result<bool, DungeonError> {
        let shape = self.leaf(leaf)?.shape;
        let system = self.live(leaf)?.system;
        Ok(self.placement_allowed(&system, shape, coord, square))
    }

    /// Place `square` at `coord` in `leaf` and join it to every square
    /// that touches `coord` in world space.
    ///
    /// Neighbours are looked up from the root of `leaf`'s tree, so squares
    /// owned by sibling dungeons are joined too. On any failure the leaf
    /// and the grid are left as they were.
    pub fn add_square_at(
        &mut self,
        leaf: DungeonId,
        coord: Coordinate,
        square: SquareId,
    ) -> Result<(), DungeonError> {
        let shape = self.leaf(leaf)?.shape;
        let system = self.live(leaf)?.system;
        if self.grid.square(square)?.is_terminated() {
            return Err(GridError::SquareTerminated { square }.into());
        }
        if let Some(dungeon) = self.leaf_of(square) {
            return Err(DungeonError::SquareAlreadyPlaced { square, dungeon });
        }
        if !self.placement_allowed(&system, shape, coord, square) {
            return Err(DungeonError::InvalidSquareCoordinate {
                dungeon: leaf,
                coord,
            });
        }
        if self.leaf(leaf)?.squares.contains_key(&coord) {
            return Err(DungeonError::CoordinateOccupied {
                dungeon: leaf,
                coord,
            });
        }

        self.leaf_mut(leaf)?.squares.insert(coord, square);
        let holds = self.structure_allows(shape, self.leaf(leaf)?.squares.values().copied());
        if !holds {
            self.leaf_mut(leaf)?.squares.pop();
            return Err(DungeonError::DungeonConstraints { dungeon: leaf });
        }

        let root = self.root_of(leaf)?;
        let neighbours = self.directions_and_neighbours_of(root, coord)?;
        let mut guards: Vec<_> = neighbours
            .iter()
            .filter_map(|&(_, n)| self.shaft_guard(n))
            .collect();
        if let LeafShape::Shaft { axis } = shape {
            guards.push((leaf, square, axis));
        }
        let merged = self.grid.transaction(|g| {
            for &(d, n) in &neighbours {
                g.merge_squares(square, n, d)?;
            }
            check_shaft_axes(g, &guards)
        });
        if let Err(e) = merged {
            self.leaf_mut(leaf)?.squares.pop();
            debug!(%leaf, %coord, error = %e, "placement rolled back");
            return Err(e);
        }

        self.homes.insert(square, leaf);
        debug!(%leaf, %coord, %square, neighbours = neighbours.len(), "square placed");
        Ok(())
    }

    /// Remove and terminate the square at `coord` in `leaf`.
    ///
    /// Refused with [`DungeonError::DungeonConstraints`] if the remaining
    /// squares would break the leaf's structural constraint.
    pub fn delete_square_at(
        &mut self,
        leaf: DungeonId,
        coord: Coordinate,
    ) -> Result<SquareId, DungeonError> {
        let l = self.leaf(leaf)?;
        let shape = l.shape;
        let square = l
            .get(coord)
            .ok_or(DungeonError::CoordinateNotOccupied {
                dungeon: leaf,
                coord,
            })?;
        let rest = l.squares.values().copied().filter(|&s| s != square);
        if !self.structure_allows(shape, rest) {
            return Err(DungeonError::DungeonConstraints { dungeon: leaf });
        }

        self.grid.terminate_square(square)?;
        self.leaf_mut(leaf)?.squares.shift_remove(&coord);
        self.homes.swap_remove(&square);
        debug!(%leaf, %coord, %square, "square deleted");
        Ok(square)
    }
}

/// Whether `square` has a door on either side along `axis`.
fn door_along(grid: &Grid, square: SquareId, axis: Direction) -> bool {
    [axis, axis.opposite()].into_iter().any(|d| {
        grid.border_kind_at(square, d)
            .is_ok_and(|kind| kind.is_door())
    })
}

/// Refuse merges that left a door on the axis of a shaft square.
///
/// A merge keeps the less open border, so a door facing a shaft can
/// replace the shaft square's own open border.
pub(crate) fn check_shaft_axes(
    grid: &Grid,
    guards: &[(DungeonId, SquareId, Direction)],
) -> Result<(), DungeonError> {
    match guards
        .iter()
        .find(|&&(_, square, axis)| door_along(grid, square, axis))
    {
        Some(&(dungeon, ..)) => Err(DungeonError::DungeonConstraints { dungeon }),
        None => Ok(()),
    }
}
