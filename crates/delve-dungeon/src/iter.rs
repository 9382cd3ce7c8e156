//! Lazy filtered iteration over the squares of a dungeon tree.

use std::fmt;

use delve_core::{Coordinate, DungeonId, SquareId};
use delve_grid::Square;
use indexmap::map::Values;

use crate::dungeon::{Dungeon, DungeonKind};
use crate::error::DungeonError;
use crate::world::World;

/// Squares at or below a dungeon that pass a filter.
///
/// Leaves are visited depth-first in child insertion order, and a leaf is
/// only opened once the previous one is exhausted. The filter sees the
/// holding leaf's id, the leaf itself, and the square.
///
/// Returned by [`World::filtered_squares`].
pub struct FilteredSquares<'w, F> {
    world: &'w World,
    pending: Vec<DungeonId>,
    current: Option<(DungeonId, &'w Dungeon, Values<'w, Coordinate, SquareId>)>,
    filter: F,
}

impl<F> fmt::Debug for FilteredSquares<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredSquares")
            .field("pending", &self.pending)
            .field("current", &self.current.as_ref().map(|(id, _, _)| *id))
            .finish_non_exhaustive()
    }
}

impl<'w, F> FilteredSquares<'w, F> {
    /// Open the next leaf from the pending stack. Returns `false` when
    /// the tree is exhausted.
    fn advance(&mut self) -> bool {
        while let Some(id) = self.pending.pop() {
            let Some(node) = self.world.dungeons.get(id.index()) else {
                continue;
            };
            match &node.kind {
                DungeonKind::Leaf(leaf) => {
                    self.current = Some((id, node, leaf.squares.values()));
                    return true;
                }
                DungeonKind::Composite(c) => self.pending.extend(c.children.iter().rev().copied()),
            }
        }
        self.current = None;
        false
    }
}

impl<'w, F> Iterator for FilteredSquares<'w, F>
where
    F: FnMut(DungeonId, &Dungeon, &Square) -> bool,
{
    type Item = SquareId;

    fn next(&mut self) -> Option<SquareId> {
        loop {
            if let Some((id, node, values)) = &mut self.current {
                let (id, node) = (*id, *node);
                for &square in values.by_ref() {
                    let passes = self
                        .world
                        .grid
                        .square(square)
                        .is_ok_and(|sq| (self.filter)(id, node, sq));
                    if passes {
                        return Some(square);
                    }
                }
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

impl World {
    /// Squares at or below `dungeon` for which `filter` returns true.
    pub fn filtered_squares<F>(
        &self,
        dungeon: DungeonId,
        filter: F,
    ) -> Result<FilteredSquares<'_, F>, DungeonError>
    where
        F: FnMut(DungeonId, &Dungeon, &Square) -> bool,
    {
        self.live(dungeon)?;
        Ok(FilteredSquares {
            world: self,
            pending: vec![dungeon],
            current: None,
            filter,
        })
    }

    /// Every square at or below `dungeon`.
    pub fn squares(
        &self,
        dungeon: DungeonId,
    ) -> Result<impl Iterator<Item = SquareId> + '_, DungeonError> {
        self.filtered_squares(dungeon, |_, _, _| true)
    }
}
